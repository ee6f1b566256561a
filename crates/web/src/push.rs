//! Delivery of push payloads through an external push gateway.
//!
//! The gateway owns VAPID signing and payload encryption; this side only
//! hands it the subscription and the payload, and learns whether the
//! subscription is still alive.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use storage::models::PushSubscription;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Error)]
pub enum PushError {
    /// The push service no longer knows the endpoint; the subscription is dead.
    #[error("Subscription is gone")]
    Gone,

    #[error("Push gateway rejected the message with status {0}")]
    Rejected(u16),

    #[error("Push gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, subscription: &PushSubscription, payload: &PushPayload)
    -> Result<(), PushError>;
}

#[derive(Serialize)]
struct GatewayKeys<'a> {
    p256dh: &'a str,
    auth: &'a str,
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    endpoint: &'a str,
    keys: GatewayKeys<'a>,
    payload: &'a PushPayload,
}

/// Posts messages as JSON to the configured push gateway.
pub struct GatewayPushTransport {
    client: reqwest::Client,
    gateway_url: String,
}

impl GatewayPushTransport {
    pub fn new(gateway_url: impl Into<String>) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            gateway_url: gateway_url.into(),
        })
    }
}

/// 404 and 410 from the push service mean the subscription expired or was
/// revoked.
pub fn outcome_for_status(status: StatusCode) -> Result<(), PushError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::GONE || status == StatusCode::NOT_FOUND {
        Err(PushError::Gone)
    } else {
        Err(PushError::Rejected(status.as_u16()))
    }
}

#[async_trait]
impl PushTransport for GatewayPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushError> {
        let request = GatewayRequest {
            endpoint: &subscription.endpoint,
            keys: GatewayKeys {
                p256dh: &subscription.p256dh,
                auth: &subscription.auth,
            },
            payload,
        };

        let response = self
            .client
            .post(&self.gateway_url)
            .json(&request)
            .send()
            .await?;

        outcome_for_status(response.status())
    }
}

/// Used when no gateway is configured: logs instead of delivering.
pub struct LogPushTransport;

#[async_trait]
impl PushTransport for LogPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> Result<(), PushError> {
        tracing::info!(
            subscription_id = %subscription.subscription_id,
            title = %payload.title,
            "No push gateway configured, dropping notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses() {
        assert!(outcome_for_status(StatusCode::CREATED).is_ok());
        assert!(outcome_for_status(StatusCode::OK).is_ok());
    }

    #[test]
    fn test_gone_statuses() {
        assert!(matches!(
            outcome_for_status(StatusCode::GONE),
            Err(PushError::Gone)
        ));
        assert!(matches!(
            outcome_for_status(StatusCode::NOT_FOUND),
            Err(PushError::Gone)
        ));
    }

    #[test]
    fn test_other_failures_are_rejections() {
        assert!(matches!(
            outcome_for_status(StatusCode::TOO_MANY_REQUESTS),
            Err(PushError::Rejected(429))
        ));
    }

    #[test]
    fn test_gateway_request_shape() {
        let payload = PushPayload {
            title: "Rest over".to_string(),
            body: "Next set!".to_string(),
            url: None,
        };
        let request = GatewayRequest {
            endpoint: "https://push.example.com/abc",
            keys: GatewayKeys {
                p256dh: "pk",
                auth: "secret",
            },
            payload: &payload,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["keys"]["auth"], "secret");
        assert_eq!(json["payload"]["title"], "Rest over");
        assert!(json["payload"].get("url").is_none());
    }
}
