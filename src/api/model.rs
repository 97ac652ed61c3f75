//! Wire representation of the job-applications REST resource.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::model::{ApplicationStatus, JobApplicationUpdate, NewJobApplication};

/// Status as found on the wire. The backend sends integers, but labels are
/// tolerated so already-normalized records pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireStatus {
    Code(i64),
    Label(String),
}

impl WireStatus {
    pub fn to_status(&self) -> ApplicationStatus {
        match self {
            WireStatus::Code(code) => ApplicationStatus::from_wire(*code),
            WireStatus::Label(label) => ApplicationStatus::from_label(label),
        }
    }
}

/// A record as the server sends it. Timestamp fields stay `None` when the
/// server leaves them out, so a partial update response never overwrites them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireJobApplication {
    pub id: i64,
    pub company_name: String,
    pub position: String,
    pub status: WireStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_applied: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Outer `None`: field absent. `Some(None)`: explicit `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Body of `POST /job-applications` and `PUT /job-applications/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationBody {
    pub company_name: String,
    pub position: String,
    pub status: u8,
}

impl From<&NewJobApplication> for JobApplicationBody {
    fn from(req: &NewJobApplication) -> Self {
        Self {
            company_name: req.company_name.clone(),
            position: req.position.clone(),
            status: req.status.to_wire(),
        }
    }
}

impl From<&JobApplicationUpdate> for JobApplicationBody {
    fn from(req: &JobApplicationUpdate) -> Self {
        Self {
            company_name: req.company_name.clone(),
            position: req.position.clone(),
            status: req.status.to_wire(),
        }
    }
}

/// Pagination fields of a wrapped list response, each optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFields {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub total_count: Option<u64>,
    pub total_pages: Option<u64>,
}

/// The shapes a list response may take.
#[derive(Debug, Clone, PartialEq)]
pub enum ListShape {
    /// `{ "data": [...], "pageNumber": .., ... }`
    Paged {
        records: Vec<WireJobApplication>,
        page: PageFields,
    },
    /// A bare JSON array.
    Bare(Vec<WireJobApplication>),
    /// No body, or JSON `null`.
    Empty,
    /// Anything else; kept for logging.
    Unrecognized(Value),
}

impl ListShape {
    pub fn parse(value: Value) -> Self {
        match value {
            Value::Null => ListShape::Empty,
            Value::Array(items) => ListShape::Bare(decode_records(items)),
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => {
                    let page = serde_json::from_value(Value::Object(map)).unwrap_or_else(|err| {
                        warn!(%err, "ignoring malformed pagination fields");
                        PageFields::default()
                    });
                    ListShape::Paged {
                        records: decode_records(items),
                        page,
                    }
                }
                Some(other) => {
                    map.insert("data".to_string(), other);
                    ListShape::Unrecognized(Value::Object(map))
                }
                None => ListShape::Unrecognized(Value::Object(map)),
            },
            other => ListShape::Unrecognized(other),
        }
    }
}

fn decode_records(items: Vec<Value>) -> Vec<WireJobApplication> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<WireJobApplication>(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%err, "skipping malformed job application record");
                None
            }
        })
        .collect()
}

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
