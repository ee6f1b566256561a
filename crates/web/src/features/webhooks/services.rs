use serde::Deserialize;
use sqlx::PgPool;
use storage::{dto::user::IdentityProfile, error::Result, repository::user::UserRepository};

const FALLBACK_DISPLAY_NAME: &str = "Athlete";

#[derive(Debug, Deserialize)]
pub struct RawIdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    id: String,
    email_address: String,
}

/// User object as sent with `user.created` / `user.updated`.
#[derive(Debug, Deserialize)]
struct IdentityUser {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
    image_url: Option<String>,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    primary_email_address_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeletedUser {
    id: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum IdentityEvent {
    Upsert(IdentityProfile),
    Delete(String),
    Ignored(String),
}

impl IdentityUser {
    fn primary_email(&self) -> Option<String> {
        let primary = self.primary_email_address_id.as_deref();
        self.email_addresses
            .iter()
            .find(|e| Some(e.id.as_str()) == primary)
            .or_else(|| self.email_addresses.first())
            .map(|e| e.email_address.clone())
    }

    fn display_name(&self) -> String {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full_name.is_empty() {
            return full_name;
        }

        self.username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from)
            .or_else(|| self.primary_email())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string())
    }

    fn into_profile(self) -> IdentityProfile {
        IdentityProfile {
            display_name: self.display_name(),
            email: self.primary_email(),
            image_url: self.image_url.filter(|url| !url.is_empty()),
            external_id: self.id,
        }
    }
}

pub fn parse_event(raw: RawIdentityEvent) -> serde_json::Result<IdentityEvent> {
    match raw.event_type.as_str() {
        "user.created" | "user.updated" => {
            let user: IdentityUser = serde_json::from_value(raw.data)?;
            Ok(IdentityEvent::Upsert(user.into_profile()))
        }
        "user.deleted" => {
            let deleted: DeletedUser = serde_json::from_value(raw.data)?;
            Ok(match deleted.id {
                Some(id) => IdentityEvent::Delete(id),
                None => IdentityEvent::Ignored(raw.event_type),
            })
        }
        _ => Ok(IdentityEvent::Ignored(raw.event_type)),
    }
}

/// Applies a parsed identity event to the users table.
pub async fn apply_event(pool: &PgPool, event: IdentityEvent) -> Result<()> {
    let repo = UserRepository::new(pool);

    match event {
        IdentityEvent::Upsert(profile) => {
            let user = repo.upsert_from_identity(&profile).await?;
            tracing::info!(user_id = %user.user_id, "User synced from identity provider");
        }
        IdentityEvent::Delete(external_id) => {
            if repo.delete_by_external_id(&external_id).await? {
                tracing::info!(subject = %external_id, "User deleted by identity provider");
            } else {
                tracing::debug!(subject = %external_id, "Delete event for unknown user");
            }
        }
        IdentityEvent::Ignored(event_type) => {
            tracing::debug!(event_type = %event_type, "Ignoring identity event");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(event_type: &str, data: serde_json::Value) -> RawIdentityEvent {
        RawIdentityEvent {
            event_type: event_type.to_string(),
            data,
        }
    }

    #[test]
    fn test_user_created_maps_profile() {
        let event = parse_event(raw(
            "user.created",
            json!({
                "id": "user_29w83sxmDNGwOuEthce5gg56FcC",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "username": null,
                "image_url": "https://img.example.com/ada.png",
                "email_addresses": [
                    { "id": "idn_1", "email_address": "old@example.com" },
                    { "id": "idn_2", "email_address": "ada@example.com" }
                ],
                "primary_email_address_id": "idn_2"
            }),
        ))
        .unwrap();

        assert_eq!(
            event,
            IdentityEvent::Upsert(IdentityProfile {
                external_id: "user_29w83sxmDNGwOuEthce5gg56FcC".to_string(),
                display_name: "Ada Lovelace".to_string(),
                email: Some("ada@example.com".to_string()),
                image_url: Some("https://img.example.com/ada.png".to_string()),
            })
        );
    }

    #[test]
    fn test_display_name_fallbacks() {
        let event = parse_event(raw(
            "user.updated",
            json!({ "id": "user_1", "username": "lifter42" }),
        ))
        .unwrap();
        let IdentityEvent::Upsert(profile) = event else {
            panic!("expected upsert");
        };
        assert_eq!(profile.display_name, "lifter42");

        let event = parse_event(raw(
            "user.updated",
            json!({
                "id": "user_1",
                "email_addresses": [{ "id": "idn_1", "email_address": "a@example.com" }]
            }),
        ))
        .unwrap();
        let IdentityEvent::Upsert(profile) = event else {
            panic!("expected upsert");
        };
        assert_eq!(profile.display_name, "a@example.com");

        let event = parse_event(raw("user.created", json!({ "id": "user_1" }))).unwrap();
        let IdentityEvent::Upsert(profile) = event else {
            panic!("expected upsert");
        };
        assert_eq!(profile.display_name, "Athlete");
    }

    #[test]
    fn test_user_deleted() {
        let event = parse_event(raw(
            "user.deleted",
            json!({ "id": "user_1", "deleted": true, "object": "user" }),
        ))
        .unwrap();
        assert_eq!(event, IdentityEvent::Delete("user_1".to_string()));
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let event = parse_event(raw("session.created", json!({ "id": "sess_1" }))).unwrap();
        assert_eq!(event, IdentityEvent::Ignored("session.created".to_string()));
    }

    #[test]
    fn test_malformed_user_payload_is_an_error() {
        assert!(parse_event(raw("user.created", json!({ "first_name": "NoId" }))).is_err());
    }
}
