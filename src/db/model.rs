//! Row types returned by the repository.

use chrono::{DateTime, Utc};

use crate::preferences::PreferencesState;

/// The single `preferences` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesRow {
    pub page_size: i64,
    pub sidebar_open: bool,
    pub current_page: i64,
    pub updated_at: DateTime<Utc>,
}

impl PreferencesRow {
    /// Out-of-range values fall back to the defaults rather than failing the load.
    pub fn into_state(self) -> PreferencesState {
        let defaults = PreferencesState::default();
        PreferencesState {
            page_size: u32::try_from(self.page_size)
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(defaults.page_size),
            sidebar_open: self.sidebar_open,
            current_page: u32::try_from(self.current_page)
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(defaults.current_page),
        }
    }
}
