//! Durable local storage for UI preferences.
//!
//! - `model`: the stored row and its conversion into `PreferencesState`.
//! - `repo`: pool setup, migrations and the SQL that reads/writes the row.
//!
//! The job-application cache is never written here; it is always fetched fresh.

pub mod model;
pub mod repo;

pub use repo::*;

pub use model::PreferencesRow;
