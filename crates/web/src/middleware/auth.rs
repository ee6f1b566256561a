use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use storage::{error::StorageError, models::User, repository::user::UserRepository};

use crate::{error::WebError, state::AppState};

/// Claims we rely on from the identity provider's session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// External subject, matched against `users.external_id`
    pub sub: String,
    pub exp: u64,
}

/// Verifies HS256 session tokens issued by the identity provider.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, WebError> {
        decode::<SessionClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {}", e);
                WebError::Unauthorized
            })
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The internal user behind the request, inserted by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(req.headers()).ok_or(WebError::Unauthorized)?;
    let claims = state.sessions.verify(token)?;

    let user = match UserRepository::new(state.db.pool())
        .find_by_external_id(&claims.sub)
        .await
    {
        Ok(user) => user,
        Err(StorageError::NotFound) => {
            tracing::warn!(subject = %claims.sub, "Valid token for a user that has not been synced");
            return Err(WebError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-session-secret";

    fn token(sub: &str, exp: u64, secret: &str) -> String {
        let claims = SessionClaims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> u64 {
        (chrono::Utc::now().timestamp() + 3600) as u64
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let verifier = SessionVerifier::from_secret(SECRET);
        let claims = verifier
            .verify(&token("user_2abc", in_one_hour(), SECRET))
            .unwrap();
        assert_eq!(claims.sub, "user_2abc");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = SessionVerifier::from_secret(SECRET);
        let result = verifier.verify(&token("user_2abc", in_one_hour(), "other-secret"));
        assert!(matches!(result, Err(WebError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = SessionVerifier::from_secret(SECRET);
        let expired = (chrono::Utc::now().timestamp() - 3600) as u64;
        assert!(verifier.verify(&token("user_2abc", expired, SECRET)).is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
