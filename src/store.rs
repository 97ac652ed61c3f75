//! Client-side cache of job applications.
//!
//! State changes only through [`reduce`], a pure function from an owned
//! snapshot and an [`Action`] to the next snapshot. [`Store`] owns the current
//! snapshot and lets views subscribe to changes.

use tokio::sync::watch;

use crate::model::{
    ApplicationStatus, JobApplication, JobApplicationPatch, ListPayload, PaginationMetadata,
    RequestStatus,
};

pub const FETCH_FALLBACK_MESSAGE: &str = "Failed to fetch job applications";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobApplicationsState {
    pub applications: Vec<JobApplication>,
    pub status: RequestStatus,
    pub error: Option<String>,
    pub pagination: Option<PaginationMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FetchPending,
    FetchFulfilled(ListPayload),
    FetchRejected(Option<String>),
    RefreshFulfilled(ListPayload),
    RefreshRejected(Option<String>),
    CreateFulfilled(JobApplication),
    CreateRejected(String),
    UpdateFulfilled(JobApplicationPatch),
    UpdateRejected(String),
    DeleteFulfilled(i64),
    DeleteRejected(String),
    Clear,
}

pub fn reduce(mut state: JobApplicationsState, action: Action) -> JobApplicationsState {
    match action {
        Action::FetchPending => {
            state.status = RequestStatus::Loading;
            state.error = None;
        }
        Action::FetchFulfilled(payload) | Action::RefreshFulfilled(payload) => {
            state.status = RequestStatus::Finished;
            state.applications = payload.applications;
            state.pagination = Some(payload.pagination);
            state.error = None;
        }
        Action::FetchRejected(message) => {
            state.status = RequestStatus::Error;
            state.error = Some(message.unwrap_or_else(|| FETCH_FALLBACK_MESSAGE.to_string()));
        }
        Action::RefreshRejected(message) => {
            state.error = Some(message.unwrap_or_else(|| FETCH_FALLBACK_MESSAGE.to_string()));
        }
        Action::CreateFulfilled(record) => {
            state.applications.push(record);
            state.error = None;
        }
        Action::UpdateFulfilled(patch) => {
            if let Some(existing) = state.applications.iter_mut().find(|a| a.id == patch.id) {
                patch.apply_to(existing);
            }
            state.error = None;
        }
        Action::DeleteFulfilled(id) => {
            state.applications.retain(|a| a.id != id);
            state.error = None;
        }
        Action::CreateRejected(message)
        | Action::UpdateRejected(message)
        | Action::DeleteRejected(message) => {
            state.error = Some(message);
        }
        Action::Clear => {
            state.applications.clear();
            state.status = RequestStatus::Idle;
            state.error = None;
        }
    }
    state
}

/// Owner of the current snapshot.
#[derive(Debug)]
pub struct Store {
    tx: watch::Sender<JobApplicationsState>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(JobApplicationsState::default());
        Self { tx }
    }

    pub fn dispatch(&self, action: Action) {
        self.tx.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, action);
        });
    }

    pub fn snapshot(&self) -> JobApplicationsState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<JobApplicationsState> {
        self.tx.subscribe()
    }
}

pub fn application_by_id(state: &JobApplicationsState, id: i64) -> Option<&JobApplication> {
    state.applications.iter().find(|a| a.id == id)
}

pub fn applications_by_status(
    state: &JobApplicationsState,
    status: ApplicationStatus,
) -> Vec<&JobApplication> {
    state
        .applications
        .iter()
        .filter(|a| a.status == status)
        .collect()
}

/// Nothing has been shown yet, or a fetch is in flight.
pub fn is_loading(state: &JobApplicationsState) -> bool {
    matches!(state.status, RequestStatus::Idle | RequestStatus::Loading)
}

pub fn has_error(state: &JobApplicationsState) -> bool {
    state.error.is_some()
}
