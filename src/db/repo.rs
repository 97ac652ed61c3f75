use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, instrument};

use super::model::PreferencesRow;
use crate::preferences::PreferencesState;

pub type Pool = SqlitePool;

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let url = prepare_sqlite_url(database_url);
    let options = SqliteConnectOptions::from_str(&url)
        .with_context(|| format!("invalid database URL: {url}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open {url}"))?;
    Ok(pool)
}

/// Expand a leading `~/` in a file-backed SQLite URL and make sure the parent
/// directory exists. In-memory and non-sqlite URLs pass through.
fn prepare_sqlite_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return url.to_string();
    };
    if rest.starts_with(":memory") {
        return url.to_string();
    }
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let (path, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path.is_empty() {
        return url.to_string();
    }

    let path = match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(tail), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), tail),
        _ => path.to_string(),
    };
    if let Some(parent) = Path::new(&path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    match query {
        Some(q) => format!("sqlite://{path}?{q}"),
        None => format!("sqlite://{path}"),
    }
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn load_preferences_row(pool: &Pool) -> Result<Option<PreferencesRow>> {
    let row = sqlx::query(
        "SELECT page_size, sidebar_open, current_page, updated_at FROM preferences WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| PreferencesRow {
        page_size: r.get::<i64, _>("page_size"),
        sidebar_open: r.get::<bool, _>("sidebar_open"),
        current_page: r.get::<i64, _>("current_page"),
        updated_at: r.get::<DateTime<Utc>, _>("updated_at"),
    }))
}

/// Stored preferences, or the defaults when nothing was saved yet.
pub async fn load_preferences(pool: &Pool) -> Result<PreferencesState> {
    let prefs = load_preferences_row(pool)
        .await?
        .map(PreferencesRow::into_state)
        .unwrap_or_default();
    debug!(?prefs, "loaded preferences");
    Ok(prefs)
}

#[instrument(skip_all)]
pub async fn save_preferences(pool: &Pool, prefs: &PreferencesState) -> Result<()> {
    sqlx::query(
        "INSERT INTO preferences (id, page_size, sidebar_open, current_page, updated_at) \
         VALUES (1, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
           page_size = excluded.page_size, \
           sidebar_open = excluded.sidebar_open, \
           current_page = excluded.current_page, \
           updated_at = excluded.updated_at",
    )
    .bind(i64::from(prefs.page_size))
    .bind(prefs.sidebar_open)
    .bind(i64::from(prefs.current_page))
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("failed to save preferences")?;
    debug!(?prefs, "saved preferences");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_urls_pass_through() {
        assert_eq!(prepare_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            prepare_sqlite_url("postgres://localhost/db"),
            "postgres://localhost/db"
        );
    }

    #[test]
    fn file_urls_are_normalized() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("nested").join("job-tracker.db");
        let url = prepare_sqlite_url(&format!("sqlite:{}?mode=rwc", path.display()));
        assert_eq!(url, format!("sqlite://{}?mode=rwc", path.display()));
        assert!(path.parent().unwrap().exists());
    }
}
