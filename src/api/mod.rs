use async_trait::async_trait;
use reqwest::{header, Client, Method, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use crate::config::Config;
use crate::model::PageQuery;

pub mod model;

use model::{ErrorBody, JobApplicationBody, ListShape, WireJobApplication};

pub const DEFAULT_BASE_URL: &str = "https://localhost:7223/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const RESOURCE: &str = "job-applications";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("request failed with status code {}", .status.as_u16())]
    Status {
        status: StatusCode,
        /// `message` field of the error body, when the server supplied one.
        message: Option<String>,
    },
    #[error("invalid response JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server returned an empty body")]
    EmptyBody,
}

impl ApiError {
    /// Message supplied by the server in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m.as_str()),
            _ => None,
        }
    }
}

/// The REST surface the operations layer depends on.
#[async_trait]
pub trait JobApplicationsApi: Send + Sync {
    async fn list(&self, query: PageQuery) -> Result<ListShape, ApiError>;

    async fn create(&self, body: &JobApplicationBody) -> Result<WireJobApplication, ApiError>;

    /// `Ok(None)` when the server answers with no content.
    async fn update(
        &self,
        id: i64,
        body: &JobApplicationBody,
    ) -> Result<Option<WireJobApplication>, ApiError>;

    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .user_agent(concat!("job-tracker/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ApiError> {
        Self::new(&cfg.api.base_url, Duration::from_secs(cfg.api.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query: PageQuery,
        body: Option<&JobApplicationBody>,
    ) -> Result<reqwest::Request, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(n) = query.page_number {
            params.push(("pageNumber", n.to_string()));
        }
        if let Some(n) = query.page_size {
            params.push(("pageSize", n.to_string()));
        }

        let mut builder = self
            .http
            .request(method, self.endpoint(path)?)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");
        if !params.is_empty() {
            builder = builder.query(&params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.build()?)
    }

    /// Send a request and return its JSON body, `None` for an empty body.
    async fn execute(&self, request: reqwest::Request) -> Result<Option<Value>, ApiError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "api request");

        let res = match self.http.execute(request).await {
            Ok(res) => res,
            Err(err) => {
                error!(%method, %url, %err, "network error");
                return Err(err.into());
            }
        };

        let status = res.status();
        let text = res.text().await?;
        debug!(%method, %url, status = status.as_u16(), bytes = text.len(), "api response");

        if !status.is_success() {
            error!(%method, %url, status = status.as_u16(), body = %text, "api error");
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message);
            return Err(ApiError::Status { status, message });
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}

#[async_trait]
impl JobApplicationsApi for ApiClient {
    #[instrument(skip(self))]
    async fn list(&self, query: PageQuery) -> Result<ListShape, ApiError> {
        let request = self.build_request(Method::GET, RESOURCE, query, None)?;
        let body = self.execute(request).await?;
        Ok(ListShape::parse(body.unwrap_or(Value::Null)))
    }

    #[instrument(skip_all)]
    async fn create(&self, body: &JobApplicationBody) -> Result<WireJobApplication, ApiError> {
        let request =
            self.build_request(Method::POST, RESOURCE, PageQuery::default(), Some(body))?;
        match self.execute(request).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(ApiError::EmptyBody),
        }
    }

    #[instrument(skip(self, body))]
    async fn update(
        &self,
        id: i64,
        body: &JobApplicationBody,
    ) -> Result<Option<WireJobApplication>, ApiError> {
        let path = format!("{RESOURCE}/{id}");
        let request = self.build_request(Method::PUT, &path, PageQuery::default(), Some(body))?;
        match self.execute(request).await? {
            Some(value) => match serde_json::from_value(value) {
                Ok(record) => Ok(Some(record)),
                Err(err) => {
                    warn!(%err, id, "update response is not a record; echoing submitted data");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{RESOURCE}/{id}");
        let request = self.build_request(Method::DELETE, &path, PageQuery::default(), None)?;
        self.execute(request).await?;
        Ok(())
    }
}
