//! Access + refresh token issuance (HS256, shared secret)

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use super::claims::{Claims, RefreshClaims, TokenPair, UserIdentity};
use crate::{config::AuthConfig, error::SigningError};

/// Signing algorithm used for every token this crate issues.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Generate an access/refresh token pair for `identity`.
///
/// Both tokens are signed with the same secret but carry independent claim
/// sets: the refresh token only knows the subject and its own lifetime.
pub fn generate_token_pair(
    identity: &UserIdentity,
    config: &AuthConfig,
) -> Result<TokenPair, SigningError> {
    let now = Utc::now();
    let key = EncodingKey::from_secret(config.secret_bytes());

    let access_claims = Claims::for_access(identity, config, now).map_err(|e| {
        tracing::error!("Failed to build access token claims: {}", e);
        e
    })?;
    let access_token = sign(&access_claims, &key, "access")?;

    let refresh_claims = RefreshClaims::for_refresh(identity, config, now).map_err(|e| {
        tracing::error!("Failed to build refresh token claims: {}", e);
        e
    })?;
    let refresh_token = sign(&refresh_claims, &key, "refresh")?;

    tracing::debug!(
        subject = %access_claims.subject,
        access_expires_at = access_claims.expires_at,
        refresh_expires_at = refresh_claims.expires_at,
        "Issued token pair"
    );

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn sign<T: Serialize>(claims: &T, key: &EncodingKey, kind: &str) -> Result<String, SigningError> {
    encode(&Header::new(SIGNING_ALGORITHM), claims, key).map_err(|e| {
        tracing::error!("Failed to encode {} token: {:?}", kind, e);
        SigningError::from(e)
    })
}
