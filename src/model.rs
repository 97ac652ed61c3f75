use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Application status as shown in the UI. The backend speaks integers 1–5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
    Accepted,
}

/// Presentational tone for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Default,
    Info,
    Success,
    Error,
}

impl ApplicationStatus {
    /// All statuses in wire order.
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Accepted",
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            ApplicationStatus::Applied => 1,
            ApplicationStatus::Interview => 2,
            ApplicationStatus::Offer => 3,
            ApplicationStatus::Rejected => 4,
            ApplicationStatus::Accepted => 5,
        }
    }

    /// Strict lookup of a wire integer.
    pub fn try_from_wire(code: i64) -> Option<Self> {
        match code {
            1 => Some(ApplicationStatus::Applied),
            2 => Some(ApplicationStatus::Interview),
            3 => Some(ApplicationStatus::Offer),
            4 => Some(ApplicationStatus::Rejected),
            5 => Some(ApplicationStatus::Accepted),
            _ => None,
        }
    }

    /// Lenient lookup: unmapped codes render as `Applied`.
    // NOTE: a status added on the backend silently shows up as Applied here.
    pub fn from_wire(code: i64) -> Self {
        Self::try_from_wire(code).unwrap_or_else(|| {
            debug!(code, "unmapped wire status; falling back to Applied");
            ApplicationStatus::Applied
        })
    }

    /// Strict lookup of a UI label.
    pub fn try_from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == label)
    }

    /// Lenient lookup: unknown labels render as `Applied`.
    pub fn from_label(label: &str) -> Self {
        Self::try_from_label(label).unwrap_or_else(|| {
            debug!(label, "unknown status label; falling back to Applied");
            ApplicationStatus::Applied
        })
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Application Submitted",
            ApplicationStatus::Interview => "Interview Scheduled",
            ApplicationStatus::Offer => "Offer Received",
            ApplicationStatus::Accepted => "Offer Accepted",
            ApplicationStatus::Rejected => "Application Rejected",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            ApplicationStatus::Applied => StatusTone::Default,
            ApplicationStatus::Interview => StatusTone::Info,
            ApplicationStatus::Offer | ApplicationStatus::Accepted => StatusTone::Success,
            ApplicationStatus::Rejected => StatusTone::Error,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request lifecycle flag kept in the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Finished,
    Error,
}

/// A job application in its UI form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: i64,
    pub company_name: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub date_applied: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

/// Query parameters for the list endpoint. `None` fields are omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
    }
}

/// Result of a successful list or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPayload {
    pub applications: Vec<JobApplication>,
    pub pagination: PaginationMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobApplication {
    pub company_name: String,
    pub position: String,
    pub status: ApplicationStatus,
}

/// Fields accepted by an update. `date_applied` is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplicationUpdate {
    pub company_name: String,
    pub position: String,
    pub status: ApplicationStatus,
}

/// Partial record merged over the stored one when an update succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobApplicationPatch {
    pub id: i64,
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub date_applied: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<Option<String>>,
}

impl JobApplicationPatch {
    /// Patch echoing the submitted fields, used when the server replies with no body.
    pub fn from_submitted(id: i64, update: &JobApplicationUpdate) -> Self {
        Self {
            id,
            company_name: Some(update.company_name.clone()),
            position: Some(update.position.clone()),
            status: Some(update.status),
            ..Default::default()
        }
    }

    pub fn apply_to(self, target: &mut JobApplication) {
        if let Some(v) = self.company_name {
            target.company_name = v;
        }
        if let Some(v) = self.position {
            target.position = v;
        }
        if let Some(v) = self.status {
            target.status = v;
        }
        if let Some(v) = self.date_applied {
            target.date_applied = v;
        }
        if let Some(v) = self.created_at {
            target.created_at = v;
        }
        if let Some(v) = self.updated_at {
            target.updated_at = v;
        }
    }
}
