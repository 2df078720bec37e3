/**
 * Session Tokens
 *
 * JWT access tokens issued by the auth layer at login. The relay never
 * trusts a raw user id from a client: the `register` event and the HTTP
 * API both resolve the caller's identity from a token verified here.
 */
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::UserId;

/// Default token lifetime: 30 days
const TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username (optional)
    #[serde(default)]
    pub username: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("token carries no user id")]
    MissingSubject,
}

/// The account behind a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    /// Display name from the `username` claim, if the token carries one
    pub username: Option<String>,
}

/// Resolves the account behind an access token
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Identity, SessionError>;
}

/// Signing and verification keys derived from the shared secret
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl SessionKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    /// Create a JWT token for a user
    pub fn create_token(
        &self,
        user_id: &UserId,
        username: Option<String>,
    ) -> Result<String, SessionError> {
        let now = unix_now();
        let claims = Claims {
            sub: user_id.to_string(),
            username,
            exp: now + self.ttl_secs,
            iat: now,
        };
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, SessionError> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Verify and decode a JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, SessionError> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}

impl IdentityResolver for SessionKeys {
    fn resolve(&self, token: &str) -> Result<Identity, SessionError> {
        let claims = self.verify_token(token)?;
        let user_id = UserId::new(claims.sub);
        if user_id.is_blank() {
            return Err(SessionError::MissingSubject);
        }
        Ok(Identity {
            user_id,
            username: claims.username.filter(|name| !name.trim().is_empty()),
        })
    }
}

fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
