use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// How far a webhook timestamp may drift from our clock, in seconds.
const TIMESTAMP_TOLERANCE_SECS: u64 = 300;
const SECRET_PREFIX: &str = "whsec_";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Webhook secret is not valid base64")]
    InvalidSecret,
    #[error("Webhook timestamp is malformed")]
    InvalidTimestamp,
    #[error("Webhook timestamp is outside the tolerance window")]
    StaleTimestamp,
    #[error("No matching webhook signature")]
    SignatureMismatch,
}

/// Verifies identity-provider webhooks signed with HMAC-SHA256 over
/// `"{id}.{timestamp}.{body}"`.
pub struct WebhookVerifier {
    mac: HmacSha256,
}

impl WebhookVerifier {
    pub fn from_secret(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded.trim())
            .map_err(|_| WebhookError::InvalidSecret)?;
        let mac = HmacSha256::new_from_slice(&key).map_err(|_| WebhookError::InvalidSecret)?;

        Ok(Self { mac })
    }

    fn mac(&self, msg_id: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac
    }

    /// Base64 signature for a message, as the sender would produce it.
    pub fn sign(&self, msg_id: &str, timestamp: &str, body: &[u8]) -> String {
        STANDARD.encode(self.mac(msg_id, timestamp, body).finalize().into_bytes())
    }

    /// Checks the timestamp window and that at least one `v1,<sig>` entry of
    /// the space-separated signature header matches.
    pub fn verify(
        &self,
        msg_id: &str,
        timestamp: &str,
        body: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<(), WebhookError> {
        let sent_at: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp)?;

        if now.abs_diff(sent_at) > TIMESTAMP_TOLERANCE_SECS {
            return Err(WebhookError::StaleTimestamp);
        }

        let matched = signature_header
            .split_whitespace()
            .filter_map(|entry| entry.strip_prefix("v1,"))
            .filter_map(|sig| STANDARD.decode(sig).ok())
            .any(|sig| self.mac(msg_id, timestamp, body).verify_slice(&sig).is_ok());

        if matched {
            Ok(())
        } else {
            Err(WebhookError::SignatureMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
    const NOW: i64 = 1_700_000_000;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::from_secret(SECRET).unwrap()
    }

    #[test]
    fn test_valid_signature() {
        let v = verifier();
        let body = br#"{"type":"user.created"}"#;
        let ts = NOW.to_string();
        let header = format!("v1,{}", v.sign("msg_1", &ts, body));

        assert_eq!(v.verify("msg_1", &ts, body, &header, NOW), Ok(()));
    }

    #[test]
    fn test_any_listed_signature_may_match() {
        let v = verifier();
        let body = b"{}";
        let ts = NOW.to_string();
        let header = format!("v1,bm90LWl0 v1,{}", v.sign("msg_1", &ts, body));

        assert_eq!(v.verify("msg_1", &ts, body, &header, NOW + 10), Ok(()));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let v = verifier();
        let ts = NOW.to_string();
        let header = format!("v1,{}", v.sign("msg_1", &ts, b"original"));

        assert_eq!(
            v.verify("msg_1", &ts, b"tampered", &header, NOW),
            Err(WebhookError::SignatureMismatch)
        );
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let v = verifier();
        let ts = (NOW - 301).to_string();
        let header = format!("v1,{}", v.sign("msg_1", &ts, b"{}"));

        assert_eq!(
            v.verify("msg_1", &ts, b"{}", &header, NOW),
            Err(WebhookError::StaleTimestamp)
        );
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(WebhookVerifier::from_secret("whsec_***").is_err());
        assert_eq!(
            verifier().verify("msg_1", "yesterday", b"{}", "v1,abc", NOW),
            Err(WebhookError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_extreme_timestamps_are_stale() {
        let v = verifier();
        for ts in [i64::MIN.to_string(), i64::MAX.to_string()] {
            let header = format!("v1,{}", v.sign("msg_1", &ts, b"{}"));
            assert_eq!(
                v.verify("msg_1", &ts, b"{}", &header, NOW),
                Err(WebhookError::StaleTimestamp)
            );
        }
    }
}
