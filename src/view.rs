//! Plain-text rendering of the store for the terminal front end.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write as _;

use crate::model::{JobApplication, PaginationMetadata, RequestStatus};
use crate::store::JobApplicationsState;

const HEADERS: [&str; 5] = ["ID", "Company Name", "Position", "Status", "Date Applied"];

/// Render a timestamp as `YYYY-MM-DD HH:MM`, or the raw text if it doesn't parse.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

pub fn render_table(applications: &[JobApplication]) -> String {
    if applications.is_empty() {
        return "No job applications found.\n".to_string();
    }

    let rows: Vec<[String; 5]> = applications
        .iter()
        .map(|app| {
            [
                app.id.to_string(),
                app.company_name.clone(),
                app.position.clone(),
                app.status.display_name().to_string(),
                format_date(&app.date_applied),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

/// "Showing a - b of n (page p/t)".
pub fn render_pagination(pagination: &PaginationMetadata, shown: usize) -> String {
    let page = u64::from(pagination.page_number.max(1));
    let size = u64::from(pagination.page_size);
    let first = if shown > 0 { (page - 1) * size + 1 } else { 0 };
    let last = (page * size).min(pagination.total_count);
    format!(
        "Showing {first} - {last} of {} (page {}/{})",
        pagination.total_count, pagination.page_number, pagination.total_pages
    )
}

pub fn render_state(state: &JobApplicationsState) -> String {
    if let (RequestStatus::Error, Some(error)) = (state.status, state.error.as_deref()) {
        return format!("Error: {error}\n");
    }
    if matches!(state.status, RequestStatus::Idle | RequestStatus::Loading) {
        return "Loading job applications...\n".to_string();
    }

    let mut out = format!("No of Job Applications ({})\n\n", state.applications.len());
    out.push_str(&render_table(&state.applications));
    if let Some(pagination) = &state.pagination {
        out.push('\n');
        out.push_str(&render_pagination(pagination, state.applications.len()));
        out.push('\n');
    }
    // Mutation errors are shown inline; the list stays visible.
    if let Some(error) = &state.error {
        let _ = writeln!(out, "\nLast operation failed: {error}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ApplicationStatus;

    fn app(id: i64, company: &str, status: ApplicationStatus) -> JobApplication {
        JobApplication {
            id,
            company_name: company.into(),
            position: "Developer".into(),
            status,
            date_applied: "2024-01-01T09:30:00Z".into(),
            created_at: "2024-01-01T09:30:00Z".into(),
            updated_at: None,
        }
    }

    #[test]
    fn formats_common_timestamps() {
        assert_eq!(format_date("2024-01-01T09:30:00Z"), "2024-01-01 09:30");
        assert_eq!(format_date("2024-01-01T09:30:00.1234567"), "2024-01-01 09:30");
        assert_eq!(format_date("2024-01-01"), "2024-01-01");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn empty_table_message() {
        assert_eq!(render_table(&[]), "No job applications found.\n");
    }

    #[test]
    fn table_uses_display_names() {
        let out = render_table(&[
            app(1, "Company A", ApplicationStatus::Offer),
            app(2, "B", ApplicationStatus::Rejected),
        ]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID | Company Name | Position"));
        assert!(lines[2].contains("Offer Received"));
        assert!(lines[3].contains("Application Rejected"));
        assert!(lines[2].contains("2024-01-01 09:30"));
    }

    #[test]
    fn pagination_summary() {
        let meta = PaginationMetadata {
            page_number: 2,
            page_size: 5,
            total_count: 7,
            total_pages: 2,
        };
        assert_eq!(render_pagination(&meta, 2), "Showing 6 - 7 of 7 (page 2/2)");

        let empty = PaginationMetadata {
            page_number: 1,
            page_size: 5,
            total_count: 0,
            total_pages: 0,
        };
        assert_eq!(render_pagination(&empty, 0), "Showing 0 - 0 of 0 (page 1/0)");
    }

    #[test]
    fn list_error_replaces_view() {
        let state = JobApplicationsState {
            applications: vec![app(1, "Company A", ApplicationStatus::Applied)],
            status: RequestStatus::Error,
            error: Some("Network error".into()),
            pagination: None,
        };
        assert_eq!(render_state(&state), "Error: Network error\n");
    }

    #[test]
    fn mutation_error_is_inline() {
        let state = JobApplicationsState {
            applications: vec![app(1, "Company A", ApplicationStatus::Applied)],
            status: RequestStatus::Finished,
            error: Some("Delete failed".into()),
            pagination: None,
        };
        let out = render_state(&state);
        assert!(out.contains("Company A"));
        assert!(out.ends_with("Last operation failed: Delete failed\n"));
    }

    #[test]
    fn loading_notice() {
        assert_eq!(
            render_state(&JobApplicationsState::default()),
            "Loading job applications...\n"
        );
    }
}
