use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubscriptionKeys {
    #[validate(length(min = 1, max = 512))]
    pub p256dh: String,

    #[validate(length(min = 1, max = 512))]
    pub auth: String,
}

/// Mirrors the browser's `PushSubscription.toJSON()` shape.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubscribeRequest {
    #[validate(url)]
    #[validate(length(max = 2048))]
    pub endpoint: String,

    #[validate(nested)]
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UnsubscribeRequest {
    #[validate(length(min = 1, max = 2048))]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(min = 1, max = 500))]
    pub body: String,

    #[validate(length(max = 2048))]
    pub url: Option<String>,
}

/// Outcome of sending one payload to every active subscription of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DispatchReport {
    pub delivered: u32,
    /// Subscriptions deleted because the push service reported them gone
    pub removed: u32,
    pub failed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_requires_url_endpoint() {
        let req = SubscribeRequest {
            endpoint: "not a url".to_string(),
            keys: SubscriptionKeys {
                p256dh: "key".to_string(),
                auth: "secret".to_string(),
            },
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_subscribe_validates_nested_keys() {
        let req = SubscribeRequest {
            endpoint: "https://push.example.com/send/abc".to_string(),
            keys: SubscriptionKeys {
                p256dh: String::new(),
                auth: "secret".to_string(),
            },
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_subscribe_from_browser_json() {
        let json = r#"{
            "endpoint": "https://push.example.com/send/abc",
            "keys": { "p256dh": "BNc...", "auth": "tBH..." }
        }"#;
        let req: SubscribeRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.keys.auth, "tBH...");
    }
}
