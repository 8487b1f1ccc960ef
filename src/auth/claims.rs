//! Token payloads and the identity they are minted from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::AuthConfig, error::SigningError};

/// Value of the `typ` claim carried by access tokens.
pub const TOKEN_TYPE: &str = "JWT";

/// Minimal identity handed over by the login collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl UserIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Access token claims.
///
/// Fields are declared in key order so the payload serialises as
/// `aud, exp, iat, iss, jti, name, sub, typ`, the same bytes a map-based JWT
/// library emits for these claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Audience
    #[serde(rename = "aud")]
    pub audience: String,

    /// Expiration (unix seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Issued at (unix seconds)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Issuer
    #[serde(rename = "iss")]
    pub issuer: String,

    /// JWT ID (unique token identifier). Always written on issuance, optional on
    /// verification since other HS256 issuers may omit it.
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,

    /// Display name, "<first> <last>"
    pub name: String,

    /// Subject (user ID)
    #[serde(rename = "sub")]
    pub subject: String,

    #[serde(rename = "typ")]
    pub token_type: String,
}

impl Claims {
    pub(crate) fn for_access(
        identity: &UserIdentity,
        config: &AuthConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, SigningError> {
        Ok(Self {
            audience: config.audience.clone(),
            expires_at: expiry(now, config.access_ttl(), config.access_token_ttl_secs)?,
            issued_at: now.timestamp(),
            issuer: config.issuer.clone(),
            token_id: Some(Uuid::new_v4().to_string()),
            name: identity.full_name(),
            subject: identity.id.to_string(),
            token_type: TOKEN_TYPE.to_string(),
        })
    }
}

/// Refresh token claims: subject and timing only, no name, issuer, audience or type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(rename = "exp")]
    pub expires_at: i64,

    #[serde(rename = "iat")]
    pub issued_at: i64,

    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,

    #[serde(rename = "sub")]
    pub subject: String,
}

impl RefreshClaims {
    pub(crate) fn for_refresh(
        identity: &UserIdentity,
        config: &AuthConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, SigningError> {
        Ok(Self {
            expires_at: expiry(now, config.refresh_ttl(), config.refresh_token_ttl_secs)?,
            issued_at: now.timestamp(),
            token_id: Some(Uuid::new_v4().to_string()),
            subject: identity.id.to_string(),
        })
    }
}

/// `now + ttl` as unix seconds, or an error when it cannot be represented.
fn expiry(now: DateTime<Utc>, ttl: Option<chrono::Duration>, secs: u64) -> Result<i64, SigningError> {
    ttl.and_then(|ttl| now.checked_add_signed(ttl))
        .map(|at| at.timestamp())
        .ok_or(SigningError::LifetimeOutOfRange(secs))
}

/// Token pair response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Verified caller, attached to request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub name: String,
    pub expires_at: i64,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.subject,
            name: claims.name,
            expires_at: claims.expires_at,
        }
    }
}
