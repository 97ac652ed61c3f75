//! Local UI preferences. Never sent to the server.

use serde::{Deserialize, Serialize};

use crate::model::PageQuery;

pub const DEFAULT_PAGE_SIZE: u32 = crate::normalize::DEFAULT_PAGE_SIZE;
pub const DEFAULT_SIDEBAR_OPEN: bool = true;
pub const DEFAULT_CURRENT_PAGE: u32 = 1;

/// Page sizes offered by the pagination control.
pub const PAGE_SIZE_CHOICES: [u32; 4] = [5, 10, 20, 50];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesState {
    pub page_size: u32,
    pub sidebar_open: bool,
    pub current_page: u32,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sidebar_open: DEFAULT_SIDEBAR_OPEN,
            current_page: DEFAULT_CURRENT_PAGE,
        }
    }
}

impl PreferencesState {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.current_page, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencesAction {
    /// Also moves back to the first page.
    SetPageSize(u32),
    SetSidebarOpen(bool),
    SetCurrentPage(u32),
    Reset,
}

pub fn reduce(mut state: PreferencesState, action: PreferencesAction) -> PreferencesState {
    match action {
        PreferencesAction::SetPageSize(size) => {
            state.page_size = size;
            state.current_page = DEFAULT_CURRENT_PAGE;
        }
        PreferencesAction::SetSidebarOpen(open) => state.sidebar_open = open,
        PreferencesAction::SetCurrentPage(page) => state.current_page = page,
        PreferencesAction::Reset => state = PreferencesState::default(),
    }
    state
}
