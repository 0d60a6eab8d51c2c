//! WonderChat API client.
//!
//! Every call is first built into an [`ApiCallRecord`] so the caller can show
//! it (debug mode) before it is sent. Chat calls are sent through the bounded
//! retry loop; page calls are sent exactly once.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use wonderchat_shared::{ApiCallRecord, Result, WonderchatError};

use crate::retry::{AttemptFailure, CallOutcome, RetryObserver, RetryPolicy};
use crate::wire::{ChatRequest, PageRequest};

/// Production API origin.
pub const DEFAULT_API_BASE: &str = "https://app.wonderchat.io";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the conversation endpoint.
pub const CHAT_PATH: &str = "/api/v1/chat";

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("wonderchat-cli/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Runtime client settings, assembled from CLI flags.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API origin; endpoint paths are joined onto it.
    pub api_base: Url,
    /// Timeout applied to each HTTP request.
    pub request_timeout: Duration,
    /// Retry budget for chat calls.
    pub retry: RetryPolicy,
}

impl ClientSettings {
    /// Settings for `api_base` with the standard timeout and retry policy.
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            request_timeout: REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// ---------------------------------------------------------------------------
// Page endpoints
// ---------------------------------------------------------------------------

/// The two page-mutation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEndpoint {
    AddPages,
    DeletePages,
}

impl PageEndpoint {
    /// Path relative to the API origin.
    pub fn path(&self) -> &'static str {
        match self {
            Self::AddPages => "/api/v1/add-pages",
            Self::DeletePages => "/api/v1/delete-pages",
        }
    }
}

/// Result of a single, non-retried page call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCallOutcome {
    /// HTTP 200.
    Accepted,
    /// Any other status, with the raw response body.
    Rejected { status: u16, body: String },
    /// No response at all (timeout, connection error).
    Unreachable(String),
}

impl PageCallOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Operator-facing failure detail: the raw body, or the transport error.
    pub fn failure_detail(&self) -> Option<&str> {
        match self {
            Self::Accepted => None,
            Self::Rejected { body, .. } => Some(body),
            Self::Unreachable(error) => Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP client bound to one API origin.
pub struct ApiClient {
    client: Client,
    settings: ClientSettings,
}

impl ApiClient {
    /// Create a client with the given settings.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| WonderchatError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.settings.api_base.join(path).map_err(|e| {
            WonderchatError::Network(format!(
                "invalid endpoint {path} for base {}: {e}",
                self.settings.api_base
            ))
        })
    }

    /// Build the record for a chat question. The token travels in the
    /// `Authorization` header, never in the body.
    pub fn chat_call(&self, api_token: &str, request: &ChatRequest) -> Result<ApiCallRecord> {
        let payload = serde_json::to_value(request).map_err(|e| {
            WonderchatError::Network(format!("failed to serialize chat request: {e}"))
        })?;

        Ok(ApiCallRecord {
            endpoint: self.endpoint(CHAT_PATH)?.to_string(),
            headers: vec![
                ("Content-Type".into(), "application/json".into()),
                ("Authorization".into(), format!("Bearer {api_token}")),
            ],
            payload,
        })
    }

    /// Build the record for a page mutation. The key travels in the body.
    pub fn page_call(&self, endpoint: PageEndpoint, request: &PageRequest) -> Result<ApiCallRecord> {
        let payload = serde_json::to_value(request).map_err(|e| {
            WonderchatError::Network(format!("failed to serialize page request: {e}"))
        })?;

        Ok(ApiCallRecord {
            endpoint: self.endpoint(endpoint.path())?.to_string(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            payload,
        })
    }

    async fn post(&self, call: &ApiCallRecord) -> reqwest::Result<reqwest::Response> {
        let mut request = self.client.post(call.endpoint.as_str());
        for (name, value) in &call.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request.body(call.payload.to_string()).send().await
    }

    /// One attempt: 200 with a body that parses into `T`, or a failure.
    async fn attempt<T: DeserializeOwned>(
        &self,
        call: &ApiCallRecord,
    ) -> std::result::Result<T, AttemptFailure> {
        let response = self
            .post(call)
            .await
            .map_err(|e| AttemptFailure::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptFailure::Transport(format!("body read failed: {e}")))?;

        if status != StatusCode::OK {
            return Err(AttemptFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AttemptFailure::Malformed(e.to_string()))
    }

    /// Send `call` until it succeeds or the retry budget runs out.
    ///
    /// Failed attempts are reported to `observer`, followed by a fixed sleep
    /// if another attempt remains. Never returns an error: exhaustion is
    /// [`CallOutcome::Exhausted`].
    #[instrument(skip_all, fields(endpoint = %call.endpoint))]
    pub async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        call: &ApiCallRecord,
        observer: &mut dyn RetryObserver,
    ) -> CallOutcome<T> {
        let RetryPolicy {
            max_attempts,
            backoff,
        } = self.settings.retry;

        for attempt in 1..=max_attempts {
            debug!(attempt, max_attempts, "sending request");

            match self.attempt::<T>(call).await {
                Ok(value) => {
                    info!(attempt, "request succeeded");
                    return CallOutcome::Success(value);
                }
                Err(failure) => {
                    debug!(attempt, max_attempts, %failure, "request attempt failed");
                    observer.attempt_failed(attempt, max_attempts, &failure);
                    if attempt < max_attempts {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        info!(attempts = max_attempts, "retry budget exhausted");
        observer.exhausted(max_attempts);
        CallOutcome::Exhausted {
            attempts: max_attempts,
        }
    }

    /// Send `call` exactly once. Used for page mutations, which are not
    /// retried.
    #[instrument(skip_all, fields(endpoint = %call.endpoint))]
    pub async fn send_once(&self, call: &ApiCallRecord) -> PageCallOutcome {
        let response = match self.post(call).await {
            Ok(response) => response,
            Err(e) => {
                info!(error = %e, "page call failed before a response");
                return PageCallOutcome::Unreachable(e.to_string());
            }
        };

        let status = response.status();
        if status == StatusCode::OK {
            info!("page call accepted");
            return PageCallOutcome::Accepted;
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
        info!(status = status.as_u16(), "page call rejected");
        PageCallOutcome::Rejected {
            status: status.as_u16(),
            body,
        }
    }
}
