//! Bearer token extraction and access-token verification.
//!
//! Verification is stateless: a token is trusted purely on its HMAC signature,
//! its embedded expiry and its issuer. There is no server-side revocation list.

use axum::http::{header, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::claims::Claims;
use crate::{config::AuthConfig, error::AuthError};

pub const BEARER_SCHEME: &str = "Bearer";

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Append `Vary: Authorization` so caches key responses on the credential.
pub fn vary_on_authorization(headers: &mut HeaderMap) {
    headers.append(header::VARY, HeaderValue::from_static("Authorization"));
}

/// Verify the `Authorization` header of an inbound request.
///
/// `Vary: Authorization` is written to `response_headers` before the request
/// header is looked at, so it is present on success and on every failure.
pub fn verify_request(
    request_headers: &HeaderMap,
    response_headers: &mut HeaderMap,
    config: &AuthConfig,
) -> Result<Claims, AuthError> {
    vary_on_authorization(response_headers);

    let value = match request_headers.get(header::AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| AuthError::MalformedHeader)?,
        None => "",
    };

    verify_access_token(value, config)
}

/// Validate a raw `Authorization` header value of the form `Bearer <token>`.
pub fn verify_access_token(header_value: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    if header_value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let parts: Vec<&str> = header_value.split(' ').collect();
    if parts.len() != 2 || parts[0] != BEARER_SCHEME {
        return Err(AuthError::MalformedHeader);
    }
    let token = parts[1];

    let algorithm = hmac_algorithm(token)?;

    let mut validation = Validation::new(algorithm);
    validation.leeway = 0;
    validation.validate_aud = false;

    // 先按通用 JSON 校验签名与过期，再转成 Claims，过期判断不依赖载荷结构
    let payload = decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(config.secret_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Token validation failed: {:?}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAlgorithm => {
                AuthError::UnexpectedSigningMethod(format!("{:?}", algorithm))
            }
            _ => AuthError::InvalidToken,
        }
    })?
    .claims;

    // exp 必须严格晚于当前时间
    let now = Utc::now().timestamp();
    if payload
        .get("exp")
        .and_then(serde_json::Value::as_i64)
        .is_some_and(|exp| exp <= now)
    {
        return Err(AuthError::TokenExpired);
    }

    let claims: Claims = serde_json::from_value(payload).map_err(|e| {
        tracing::debug!("Token claims malformed: {}", e);
        AuthError::InvalidToken
    })?;

    if claims.issued_at > now {
        tracing::debug!(issued_at = claims.issued_at, "Token used before issued");
        return Err(AuthError::InvalidToken);
    }

    if claims.issuer != config.issuer {
        tracing::debug!(issuer = %claims.issuer, "Token issuer mismatch");
        return Err(AuthError::InvalidIssuer);
    }

    Ok(claims)
}

/// Read the `alg` the token asserts and accept only the HMAC family.
///
/// Done on the raw header so that asymmetric algorithms and `none` are turned
/// away before any key is chosen.
fn hmac_algorithm(token: &str) -> Result<Algorithm, AuthError> {
    let segment = token.split('.').next().unwrap_or_default();
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::InvalidToken)?;
    let raw: RawHeader = serde_json::from_slice(&bytes).map_err(|_| AuthError::InvalidToken)?;

    match raw.alg.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => {
            tracing::debug!(alg = %other, "Rejected token with non-HMAC signing method");
            Err(AuthError::UnexpectedSigningMethod(other.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_config() -> AuthConfig {
        AuthConfig {
            issuer: "example.com".to_string(),
            audience: "example.com".to_string(),
            secret: Secret::new("verysecret".to_string()),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 86400,
            cookie_name: "refresh_token".to_string(),
            cookie_path: "/".to_string(),
            cookie_domain: "localhost".to_string(),
        }
    }

    #[test]
    fn test_empty_header_is_missing() {
        assert_eq!(verify_access_token("", &test_config()), Err(AuthError::MissingHeader));
    }

    #[test]
    fn test_wrong_scheme_is_malformed() {
        assert_eq!(
            verify_access_token("Token abc.def.ghi", &test_config()),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(
            verify_access_token("bearer abc.def.ghi", &test_config()),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn test_wrong_part_count_is_malformed() {
        assert_eq!(
            verify_access_token("Bearer abc.def.ghi Bearer", &test_config()),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(verify_access_token("Bearer", &test_config()), Err(AuthError::MalformedHeader));
        assert_eq!(
            verify_access_token("Bearer  abc.def.ghi", &test_config()),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(
            verify_access_token("Bearer abc.def.ghi", &test_config()),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(verify_access_token("Bearer ", &test_config()), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_non_hmac_header_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let token = format!("{}.e30.c2ln", header);
        assert_eq!(hmac_algorithm(&token), Err(AuthError::UnexpectedSigningMethod("RS256".to_string())));

        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let token = format!("{}.e30.", header);
        assert_eq!(hmac_algorithm(&token), Err(AuthError::UnexpectedSigningMethod("none".to_string())));
    }

    #[test]
    fn test_hmac_family_accepted() {
        for (alg, expected) in [
            ("HS256", Algorithm::HS256),
            ("HS384", Algorithm::HS384),
            ("HS512", Algorithm::HS512),
        ] {
            let header = URL_SAFE_NO_PAD.encode(format!(r#"{{"alg":"{}","typ":"JWT"}}"#, alg));
            let token = format!("{}.e30.sig", header);
            assert_eq!(hmac_algorithm(&token), Ok(expected));
        }
    }

    #[test]
    fn test_vary_emitted_even_without_header() {
        let request = HeaderMap::new();
        let mut response = HeaderMap::new();

        let result = verify_request(&request, &mut response, &test_config());

        assert_eq!(result, Err(AuthError::MissingHeader));
        assert_eq!(response.get(header::VARY).unwrap(), "Authorization");
    }

    #[test]
    fn test_non_visible_ascii_header_is_malformed() {
        let mut request = HeaderMap::new();
        request.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        let mut response = HeaderMap::new();

        let result = verify_request(&request, &mut response, &test_config());

        assert_eq!(result, Err(AuthError::MalformedHeader));
        assert_eq!(response.get(header::VARY).unwrap(), "Authorization");
    }

    #[test]
    fn test_vary_appends_to_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));

        vary_on_authorization(&mut headers);

        let values: Vec<_> = headers.get_all(header::VARY).iter().collect();
        assert_eq!(values, vec!["Accept-Encoding", "Authorization"]);
    }
}
