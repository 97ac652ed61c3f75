//! Reconciles the list endpoint's response shapes into one canonical form.

use tracing::warn;

use crate::api::model::{ListShape, PageFields, WireJobApplication};
use crate::model::{JobApplication, JobApplicationPatch, ListPayload, PaginationMetadata};

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Records carried by a list response. Unrecognized shapes degrade to empty.
pub fn extract_data_array(shape: ListShape) -> (Vec<WireJobApplication>, PageFields) {
    match shape {
        ListShape::Paged { records, page } => (records, page),
        ListShape::Bare(records) => (records, PageFields::default()),
        ListShape::Empty => (Vec::new(), PageFields::default()),
        ListShape::Unrecognized(value) => {
            warn!(response = %value, "response data structure is invalid; expected a data array");
            (Vec::new(), PageFields::default())
        }
    }
}

pub fn normalize_job_application(record: WireJobApplication) -> JobApplication {
    JobApplication {
        id: record.id,
        status: record.status.to_status(),
        company_name: record.company_name,
        position: record.position,
        date_applied: record.date_applied.unwrap_or_default(),
        created_at: record.created_at.unwrap_or_default(),
        updated_at: record.updated_at.flatten(),
    }
}

/// Patch carrying only the fields an update response actually contained.
/// `id` comes from the request path, not the body.
pub fn normalize_update_response(id: i64, record: WireJobApplication) -> JobApplicationPatch {
    JobApplicationPatch {
        id,
        status: Some(record.status.to_status()),
        company_name: Some(record.company_name),
        position: Some(record.position),
        date_applied: record.date_applied,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub fn normalize_job_applications(records: Vec<WireJobApplication>) -> Vec<JobApplication> {
    records.into_iter().map(normalize_job_application).collect()
}

/// Fill missing pagination fields from the request and the data itself.
pub fn extract_pagination_metadata(
    page: &PageFields,
    requested_page_size: Option<u32>,
    data_len: usize,
) -> PaginationMetadata {
    let page_size = page
        .page_size
        .or(requested_page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let total_count = page.total_count.unwrap_or(data_len as u64);
    let total_pages = page
        .total_pages
        .unwrap_or_else(|| total_count.div_ceil(u64::from(page_size.max(1))));

    PaginationMetadata {
        page_number: page.page_number.unwrap_or(1),
        page_size,
        total_count,
        total_pages,
    }
}

/// Full list pipeline: shape → records → UI records + pagination.
pub fn normalize_list(shape: ListShape, requested_page_size: Option<u32>) -> ListPayload {
    let (records, page) = extract_data_array(shape);
    let pagination = extract_pagination_metadata(&page, requested_page_size, records.len());
    ListPayload {
        applications: normalize_job_applications(records),
        pagination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::WireStatus;
    use crate::model::ApplicationStatus;
    use serde_json::json;

    fn wire(id: i64, status: WireStatus) -> WireJobApplication {
        WireJobApplication {
            id,
            company_name: format!("Company {id}"),
            position: "Developer".into(),
            status,
            date_applied: Some("2024-01-01".into()),
            created_at: Some("2024-01-01".into()),
            updated_at: Some(None),
        }
    }

    #[test]
    fn unrecognized_shape_yields_empty() {
        let (records, page) = extract_data_array(ListShape::Unrecognized(json!({ "items": [] })));
        assert!(records.is_empty());
        assert_eq!(page, PageFields::default());
    }

    #[test]
    fn statuses_are_mapped_with_fallback() {
        let apps = normalize_job_applications(vec![
            wire(1, WireStatus::Code(3)),
            wire(2, WireStatus::Code(42)),
            wire(3, WireStatus::Label("Rejected".into())),
        ]);
        assert_eq!(apps[0].status, ApplicationStatus::Offer);
        assert_eq!(apps[1].status, ApplicationStatus::Applied);
        assert_eq!(apps[2].status, ApplicationStatus::Rejected);
    }

    #[test]
    fn update_patch_uses_path_id_and_present_fields() {
        let record = WireJobApplication {
            id: 99,
            date_applied: None,
            created_at: None,
            updated_at: None,
            ..wire(99, WireStatus::Code(2))
        };
        let patch = normalize_update_response(1, record);
        assert_eq!(patch.id, 1);
        assert_eq!(patch.status, Some(ApplicationStatus::Interview));
        assert_eq!(patch.created_at, None);
        assert_eq!(patch.date_applied, None);
        assert_eq!(patch.updated_at, None);
    }

    #[test]
    fn missing_total_count_is_derived_from_data() {
        let page = PageFields {
            page_size: Some(2),
            ..Default::default()
        };
        let meta = extract_pagination_metadata(&page, None, 5);
        assert_eq!(meta.total_count, 5);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.page_number, 1);
    }

    #[test]
    fn page_size_falls_back_to_request_then_default() {
        let meta = extract_pagination_metadata(&PageFields::default(), Some(10), 0);
        assert_eq!(meta.page_size, 10);
        assert_eq!(meta.total_pages, 0);

        let meta = extract_pagination_metadata(&PageFields::default(), None, 7);
        assert_eq!(meta.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(meta.total_pages, 2);
    }

    #[test]
    fn server_values_win() {
        let page = PageFields {
            page_number: Some(3),
            page_size: Some(10),
            total_count: Some(42),
            total_pages: Some(5),
        };
        let meta = extract_pagination_metadata(&page, Some(20), 10);
        assert_eq!(
            meta,
            PaginationMetadata {
                page_number: 3,
                page_size: 10,
                total_count: 42,
                total_pages: 5,
            }
        );
    }

    #[test]
    fn zero_page_size_does_not_divide_by_zero() {
        let page = PageFields {
            page_size: Some(0),
            ..Default::default()
        };
        let meta = extract_pagination_metadata(&page, None, 3);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn bare_array_pipeline() {
        let payload = normalize_list(
            ListShape::Bare(vec![wire(1, WireStatus::Code(1)), wire(2, WireStatus::Code(2))]),
            Some(1),
        );
        assert_eq!(payload.applications.len(), 2);
        assert_eq!(payload.pagination.total_count, 2);
        assert_eq!(payload.pagination.total_pages, 2);
    }
}
