use std::future::Future;
use std::pin::Pin;

use snafu::Snafu;
use tokio::sync::oneshot;

/// Fixed widget tag sent with every demo attempt.
pub const WIDGET_ID: &str = "default";

/// Base address used when the host configures no override.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Resolves the message endpoint from an optional base-address override.
///
/// Blank overrides fall back to [`DEFAULT_BASE_URL`], and a trailing slash on
/// the base never produces a doubled separator.
pub fn resolve_messages_endpoint(base_url: Option<&str>) -> String {
    let base = base_url
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);

    format!("{}/messages", base.trim_end_matches('/'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().to_string(),
        }
    }

    pub fn messages_endpoint(&self) -> String {
        resolve_messages_endpoint(Some(&self.base_url))
    }
}

/// One outbound message attempt: the visitor text plus the per-panel
/// correlation key, tagged with the fixed widget id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub message: String,
    pub customer_id: String,
    pub widget_id: &'static str,
}

impl SendRequest {
    pub fn new(message: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            customer_id: customer_id.into(),
            widget_id: WIDGET_ID,
        }
    }
}

pub type GatewayWorker = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Terminal result of one attempt: the raw response payload or a failure.
pub type SendOutcome = GatewayResult<serde_json::Value>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GatewayError {
    #[snafu(display("send request has an empty message"))]
    EmptyMessage { stage: &'static str },
    #[snafu(display("gateway base address is empty"))]
    EmptyBaseUrl { stage: &'static str },
    #[snafu(display("failed to build http client on `{stage}`: {source}"))]
    BuildClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("request to {endpoint} failed: {source}"))]
    RequestFailed {
        stage: &'static str,
        endpoint: String,
        source: reqwest::Error,
    },
    #[snafu(display("{endpoint} returned status {status}: {body}"))]
    UnexpectedStatus {
        stage: &'static str,
        endpoint: String,
        status: u16,
        body: String,
    },
    #[snafu(display("failed to decode response body: {source}"))]
    DecodeResponse {
        stage: &'static str,
        source: reqwest::Error,
    },
}

/// Receiver side of one attempt.
///
/// Yields the outcome at most once; a worker dropped before settling yields
/// `None`, which callers must treat as a failed attempt.
pub struct AttemptOutcome {
    outcome_rx: oneshot::Receiver<SendOutcome>,
}

impl AttemptOutcome {
    pub(crate) fn new(outcome_rx: oneshot::Receiver<SendOutcome>) -> Self {
        Self { outcome_rx }
    }

    pub async fn recv(self) -> Option<SendOutcome> {
        self.outcome_rx.await.ok()
    }
}

/// Pairs the attempt worker with its outcome receiver. The caller runs the
/// worker on its async runtime and awaits the outcome separately.
pub struct SendAttemptHandle {
    pub outcome: AttemptOutcome,
    pub worker: GatewayWorker,
}

/// The externally supplied send capability.
///
/// The demo panel treats implementations as opaque: it hands over the text
/// and customer id, then reconciles exactly one outcome per attempt.
pub trait MessageGateway: Send + Sync {
    fn id(&self) -> &str;
    /// Resolved target address, used for request/response log lines.
    fn endpoint(&self) -> String;
    fn send_message(&self, request: SendRequest) -> GatewayResult<SendAttemptHandle>;
}

pub(crate) fn make_attempt_channel() -> (oneshot::Sender<SendOutcome>, AttemptOutcome) {
    let (outcome_tx, outcome_rx) = oneshot::channel();
    (outcome_tx, AttemptOutcome::new(outcome_rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_falls_back_to_default_base() {
        assert_eq!(
            resolve_messages_endpoint(None),
            "http://localhost:8080/api/v1/messages"
        );
        assert_eq!(
            resolve_messages_endpoint(Some("   ")),
            "http://localhost:8080/api/v1/messages"
        );
    }

    #[test]
    fn endpoint_respects_override_and_trailing_slash() {
        assert_eq!(
            resolve_messages_endpoint(Some("https://api.example.com/v2/")),
            "https://api.example.com/v2/messages"
        );
    }

    #[test]
    fn send_request_carries_fixed_widget_tag() {
        let request = SendRequest::new("Hi", "cust_42");
        assert_eq!(request.widget_id, WIDGET_ID);
        assert_eq!(request.customer_id, "cust_42");
    }

    #[tokio::test]
    async fn dropped_worker_yields_no_outcome() {
        let (outcome_tx, outcome) = make_attempt_channel();
        drop(outcome_tx);
        assert!(outcome.recv().await.is_none());
    }
}
