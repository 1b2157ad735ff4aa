//! Session verification.
//!
//! Identities are issued by the external identity provider. This service only
//! verifies the provider's HS256 session token and extracts the caller's email,
//! which scopes every user-owned row.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// Cookie set by the identity provider's frontend SDK.
pub const SESSION_COOKIE: &str = "__session";

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: usize,
}

/// Verifies session tokens against the identity provider's shared secret.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // A token is dead the second `exp` passes.
        validation.leeway = 0;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let mut claims = decode::<SessionClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected session token: {e}");
                AppError::Unauthorized
            })?;

        claims.email = claims.email.trim().to_lowercase();
        if claims.email.is_empty() {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }
}

/// The authenticated caller. Extracting this from a request enforces a valid session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub name: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = session_token(parts).ok_or(AppError::Unauthorized)?;
        let claims = state.sessions.verify(&token)?;
        Ok(AuthUser {
            email: claims.email,
            name: claims.name,
        })
    }
}

/// Bearer header wins over the session cookie.
fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub(crate) const TEST_SECRET: &str = "test-session-secret-at-least-32-bytes";

    pub(crate) fn sign(email: &str, exp_offset_secs: i64) -> String {
        let claims = SessionClaims {
            sub: "user_123".to_string(),
            email: email.to_string(),
            name: Some("Asha".to_string()),
            exp: (chrono::Utc::now().timestamp() + exp_offset_secs) as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_lowercases_email() {
        let verifier = SessionVerifier::new(TEST_SECRET);
        let claims = verifier.verify(&sign("Asha@Example.COM", 3600)).unwrap();
        assert_eq!(claims.email, "asha@example.com");
        assert_eq!(claims.name.as_deref(), Some("Asha"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = SessionVerifier::new(TEST_SECRET);
        let result = verifier.verify(&sign("asha@example.com", -3600));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_token_rejected_just_past_expiry() {
        let verifier = SessionVerifier::new(TEST_SECRET);
        for offset in [-1, -30, -60] {
            let result = verifier.verify(&sign("asha@example.com", offset));
            assert!(
                matches!(result, Err(AppError::Unauthorized)),
                "token {offset}s past exp accepted"
            );
        }
    }

    #[test]
    fn test_token_accepted_before_expiry() {
        let verifier = SessionVerifier::new(TEST_SECRET);
        assert!(verifier.verify(&sign("asha@example.com", 5)).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = SessionVerifier::new("a-completely-different-secret-value");
        let result = verifier.verify(&sign("asha@example.com", 3600));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_blank_email_rejected() {
        let verifier = SessionVerifier::new(TEST_SECRET);
        let result = verifier.verify(&sign("   ", 3600));
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_token_from_bearer_header() {
        let (parts, _) = Request::builder()
            .header("Authorization", "Bearer abc.def.ghi")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(session_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_from_session_cookie() {
        let (parts, _) = Request::builder()
            .header("Cookie", "theme=dark; __session=tok123")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(session_token(&parts).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_missing_token() {
        let (parts, _) = Request::builder()
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap()
            .into_parts();
        assert!(session_token(&parts).is_none());
    }
}
