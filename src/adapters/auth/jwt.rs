//! HS256 JWT session validator.
//!
//! Tokens carry the user under a `user` claim:
//!
//! ```json
//! { "user": { "id": "64f0c...", "username": "alice" }, "iat": 1700000000, "exp": 1700003600 }
//! ```
//!
//! The same adapter issues tokens, which keeps signing and verification on
//! one shared secret.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// User section of the token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Full token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user: TokenUser,
    pub iat: u64,
    pub exp: u64,
}

/// Validates (and issues) HS256-signed tokens with a shared secret.
pub struct JwtSessionValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl JwtSessionValidator {
    /// Create a validator from a raw secret.
    pub fn new(secret: &[u8], leeway_secs: u64, token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl,
        }
    }

    /// Create a validator from the `auth` configuration section.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.expose_secret().as_bytes(),
            config.leeway_secs,
            config.token_ttl(),
        )
    }

    /// Sign a token for `user` valid for the configured TTL.
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        let now = unix_now();
        let claims = TokenClaims {
            user: TokenUser {
                id: user.id.as_str().to_string(),
                username: Some(user.display_name.clone()),
            },
            iat: now,
            exp: now + self.token_ttl.as_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            AuthError::service_unavailable("token signing failed")
        })
    }

    fn decode_claims(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidSignature => {
                        tracing::warn!("Invalid token signature");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::debug!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.decode_claims(token)?;
        let id = UserId::new(claims.user.id).map_err(|_| AuthError::InvalidToken)?;
        let display_name = claims
            .user
            .username
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| id.as_str().to_string());

        Ok(AuthenticatedUser::new(id, display_name))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("leeway", &self.validation.leeway)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-with-at-least-32-bytes!!";

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(SECRET, 0, Duration::from_secs(3600))
    }

    fn alice() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-a").unwrap(), "Alice")
    }

    fn sign(claims: &TokenClaims, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn issued_token_validates_to_same_user() {
        let v = validator();
        let token = v.issue(&alice()).unwrap();

        let user = v.validate(&token).await.unwrap();
        assert_eq!(user, alice());
    }

    #[tokio::test]
    async fn username_falls_back_to_id() {
        let now = unix_now();
        let claims = TokenClaims {
            user: TokenUser {
                id: "user-z".to_string(),
                username: None,
            },
            iat: now,
            exp: now + 60,
        };

        let user = validator().validate(&sign(&claims, SECRET)).await.unwrap();
        assert_eq!(user.display_name, "user-z");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let claims = TokenClaims {
            user: TokenUser {
                id: "user-a".to_string(),
                username: None,
            },
            iat: 1_000,
            exp: 2_000,
        };

        let result = validator().validate(&sign(&claims, SECRET)).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let other = JwtSessionValidator::new(
            b"another-secret-with-at-least-32-bytes",
            0,
            Duration::from_secs(60),
        );
        let token = other.issue(&alice()).unwrap();

        let result = validator().validate(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_and_empty_tokens_are_rejected() {
        let v = validator();
        assert!(matches!(
            v.validate("not.a.jwt").await,
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(v.validate("").await, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn empty_user_id_is_invalid() {
        let now = unix_now();
        let claims = TokenClaims {
            user: TokenUser {
                id: String::new(),
                username: Some("Ghost".to_string()),
            },
            iat: now,
            exp: now + 60,
        };

        let result = validator().validate(&sign(&claims, SECRET)).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn debug_output_omits_keys() {
        let debug = format!("{:?}", validator());
        assert!(!debug.contains("test-secret"));
    }
}
