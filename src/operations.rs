//! Fetch and mutate operations. Each one runs the request, translates between
//! wire and UI forms, and feeds the outcome into the store.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::api::model::JobApplicationBody;
use crate::api::{ApiError, JobApplicationsApi};
use crate::model::{
    JobApplication, JobApplicationPatch, JobApplicationUpdate, ListPayload, NewJobApplication,
    PageQuery,
};
use crate::normalize::{normalize_job_application, normalize_list, normalize_update_response};
use crate::store::{Action, JobApplicationsState, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Refresh,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Message used when neither the server nor the transport gave one.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Fetch | Operation::Refresh => "Failed to fetch job applications",
            Operation::Create => "Failed to create job application",
            Operation::Update => "Failed to update job application",
            Operation::Delete => "Failed to delete job application",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Fetch => "fetch",
            Operation::Refresh => "refresh",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Rejection value of an operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct OperationError {
    pub operation: Operation,
    pub message: String,
}

/// Pick the user-facing message: server message, then transport message,
/// then the operation's generic fallback.
pub fn rejection_message(err: &ApiError, operation: Operation) -> String {
    if let Some(message) = err.server_message() {
        return message.to_string();
    }
    let transport = err.to_string();
    if transport.trim().is_empty() {
        operation.fallback_message().to_string()
    } else {
        transport
    }
}

/// Owns the store and the API handle; the single entry point for views.
pub struct Tracker {
    api: Arc<dyn JobApplicationsApi>,
    store: Store,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Tracker {
    pub fn new(api: Arc<dyn JobApplicationsApi>) -> Self {
        Self {
            api,
            store: Store::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> JobApplicationsState {
        self.store.snapshot()
    }

    pub fn clear(&self) {
        self.store.dispatch(Action::Clear);
    }

    fn reject(&self, err: ApiError, operation: Operation) -> OperationError {
        let message = rejection_message(&err, operation);
        error!(%operation, %message, "job application request failed");
        OperationError { operation, message }
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self, query: PageQuery) -> Result<ListPayload, OperationError> {
        self.store.dispatch(Action::FetchPending);
        match self.api.list(query).await {
            Ok(shape) => {
                let payload = normalize_list(shape, query.page_size);
                info!(count = payload.applications.len(), "fetched job applications");
                self.store.dispatch(Action::FetchFulfilled(payload.clone()));
                Ok(payload)
            }
            Err(err) => {
                let rejection = self.reject(err, Operation::Fetch);
                self.store
                    .dispatch(Action::FetchRejected(Some(rejection.message.clone())));
                Err(rejection)
            }
        }
    }

    /// Like [`Tracker::fetch_all`] but without the loading transition.
    #[instrument(skip(self))]
    pub async fn refresh(&self, query: PageQuery) -> Result<ListPayload, OperationError> {
        match self.api.list(query).await {
            Ok(shape) => {
                let payload = normalize_list(shape, query.page_size);
                self.store.dispatch(Action::RefreshFulfilled(payload.clone()));
                Ok(payload)
            }
            Err(err) => {
                let rejection = self.reject(err, Operation::Refresh);
                self.store
                    .dispatch(Action::RefreshRejected(Some(rejection.message.clone())));
                Err(rejection)
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn create(&self, req: NewJobApplication) -> Result<JobApplication, OperationError> {
        let body = JobApplicationBody::from(&req);
        match self.api.create(&body).await {
            Ok(record) => {
                let record = normalize_job_application(record);
                info!(id = record.id, "created job application");
                self.store.dispatch(Action::CreateFulfilled(record.clone()));
                Ok(record)
            }
            Err(err) => {
                let rejection = self.reject(err, Operation::Create);
                self.store
                    .dispatch(Action::CreateRejected(rejection.message.clone()));
                Err(rejection)
            }
        }
    }

    #[instrument(skip(self, req))]
    pub async fn update(
        &self,
        id: i64,
        req: JobApplicationUpdate,
    ) -> Result<JobApplicationPatch, OperationError> {
        let body = JobApplicationBody::from(&req);
        match self.api.update(id, &body).await {
            Ok(response) => {
                let patch = match response {
                    Some(record) => normalize_update_response(id, record),
                    None => JobApplicationPatch::from_submitted(id, &req),
                };
                info!(id, "updated job application");
                self.store.dispatch(Action::UpdateFulfilled(patch.clone()));
                Ok(patch)
            }
            Err(err) => {
                let rejection = self.reject(err, Operation::Update);
                self.store
                    .dispatch(Action::UpdateRejected(rejection.message.clone()));
                Err(rejection)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<i64, OperationError> {
        match self.api.delete(id).await {
            Ok(()) => {
                info!(id, "deleted job application");
                self.store.dispatch(Action::DeleteFulfilled(id));
                Ok(id)
            }
            Err(err) => {
                let rejection = self.reject(err, Operation::Delete);
                self.store
                    .dispatch(Action::DeleteRejected(rejection.message.clone()));
                Err(rejection)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn server_message_wins() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: Some("Company name is required".into()),
        };
        assert_eq!(
            rejection_message(&err, Operation::Create),
            "Company name is required"
        );
    }

    #[test]
    fn transport_message_is_next() {
        let err = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(
            rejection_message(&err, Operation::Delete),
            "request failed with status code 500"
        );
        assert_eq!(
            rejection_message(&ApiError::EmptyBody, Operation::Create),
            "server returned an empty body"
        );
    }

    #[test]
    fn fallbacks_name_the_operation() {
        assert_eq!(
            Operation::Update.fallback_message(),
            "Failed to update job application"
        );
        assert_eq!(
            Operation::Refresh.fallback_message(),
            "Failed to fetch job applications"
        );
    }
}
