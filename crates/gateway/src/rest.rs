use serde_json::json;
use snafu::{ResultExt, ensure};
use tokio::sync::oneshot;

use super::capability::{
    BuildClientSnafu, DecodeResponseSnafu, EmptyBaseUrlSnafu, EmptyMessageSnafu, GatewayConfig,
    GatewayResult, GatewayWorker, MessageGateway, RequestFailedSnafu, SendAttemptHandle,
    SendOutcome, SendRequest, UnexpectedStatusSnafu, make_attempt_channel,
};

pub const REST_GATEWAY_ID: &str = "rest";

/// REST implementation of the send capability.
///
/// Posts the widget wire body to `{base}/messages` and reports the decoded
/// JSON response as the raw attempt payload. One attempt maps to exactly one
/// HTTP round trip; there is no retry and no timeout.
pub struct RestGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl RestGateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        ensure!(
            !config.base_url.is_empty(),
            EmptyBaseUrlSnafu {
                stage: "rest-gateway-new",
            }
        );

        let client = reqwest::Client::builder().build().context(BuildClientSnafu {
            stage: "build-client",
        })?;

        Ok(Self { config, client })
    }

    /// Wire body sent to the widget backend. Field names echo the widget's
    /// camelCase format so the demo log mirrors real traffic.
    fn body_json(request: &SendRequest) -> serde_json::Value {
        json!({
            "message": request.message,
            "customerId": request.customer_id,
            "widgetId": request.widget_id,
        })
    }

    async fn perform_send(
        client: reqwest::Client,
        endpoint: String,
        request: SendRequest,
    ) -> SendOutcome {
        let response = client
            .post(&endpoint)
            .json(&Self::body_json(&request))
            .send()
            .await
            .context(RequestFailedSnafu {
                stage: "send-message",
                endpoint: endpoint.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return UnexpectedStatusSnafu {
                stage: "message-http-status",
                endpoint,
                status: status.as_u16(),
                body,
            }
            .fail();
        }

        response
            .json::<serde_json::Value>()
            .await
            .context(DecodeResponseSnafu {
                stage: "decode-message-response",
            })
    }

    async fn run_send_worker(
        client: reqwest::Client,
        endpoint: String,
        request: SendRequest,
        outcome_tx: oneshot::Sender<SendOutcome>,
    ) {
        let outcome = Self::perform_send(client, endpoint, request).await;

        if let Err(error) = &outcome {
            tracing::warn!(gateway = REST_GATEWAY_ID, error = %error, "send attempt failed");
        }

        // The panel may have been torn down; a closed receiver is not an error.
        let _ = outcome_tx.send(outcome);
    }
}

impl MessageGateway for RestGateway {
    fn id(&self) -> &str {
        REST_GATEWAY_ID
    }

    fn endpoint(&self) -> String {
        self.config.messages_endpoint()
    }

    fn send_message(&self, request: SendRequest) -> GatewayResult<SendAttemptHandle> {
        ensure!(
            !request.message.trim().is_empty(),
            EmptyMessageSnafu {
                stage: "send-message",
            }
        );

        let (outcome_tx, outcome) = make_attempt_channel();
        let worker: GatewayWorker = Box::pin(Self::run_send_worker(
            self.client.clone(),
            self.config.messages_endpoint(),
            request,
            outcome_tx,
        ));

        Ok(SendAttemptHandle { outcome, worker })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::GatewayError;

    #[test]
    fn construction_rejects_blank_base_url() {
        let error = RestGateway::new(GatewayConfig::new("  ")).err().unwrap();
        assert!(matches!(error, GatewayError::EmptyBaseUrl { .. }));
    }

    #[test]
    fn endpoint_reflects_configured_base() {
        let gateway = RestGateway::new(GatewayConfig::new("http://10.0.0.5:9000/api/v1")).unwrap();
        assert_eq!(gateway.endpoint(), "http://10.0.0.5:9000/api/v1/messages");
    }

    #[test]
    fn body_uses_widget_wire_field_names() {
        let body = RestGateway::body_json(&SendRequest::new("Hi", "cust_7"));
        assert_eq!(body["message"], "Hi");
        assert_eq!(body["customerId"], "cust_7");
        assert_eq!(body["widgetId"], "default");
    }

    #[test]
    fn empty_message_is_rejected_before_any_io() {
        let gateway = RestGateway::new(GatewayConfig::new("http://localhost:8080/api/v1")).unwrap();
        let error = gateway.send_message(SendRequest::new("   ", "cust_7")).err();
        assert!(matches!(error, Some(GatewayError::EmptyMessage { .. })));
    }
}
