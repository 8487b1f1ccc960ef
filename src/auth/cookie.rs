//! Refresh token cookie: issue on login, expire on logout

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Date, Duration, OffsetDateTime};

use crate::config::AuthConfig;

/// Cookie carrying `refresh_token`, valid for the configured refresh lifetime.
///
/// Lifetimes past what a date can hold saturate at the last representable day.
pub fn issue_refresh_cookie(refresh_token: &str, config: &AuthConfig) -> Cookie<'static> {
    let ttl = Duration::seconds(i64::try_from(config.refresh_token_ttl_secs).unwrap_or(i64::MAX));
    let expires = OffsetDateTime::now_utc()
        .checked_add(ttl)
        .unwrap_or_else(|| Date::MAX.midnight().assume_utc());

    build_cookie(config, refresh_token.to_string(), expires, ttl)
}

/// Empty cookie with the same name/path/domain, expired at the unix epoch and
/// `Max-Age=-1`, instructing the client to drop it immediately.
pub fn revoke_refresh_cookie(config: &AuthConfig) -> Cookie<'static> {
    build_cookie(
        config,
        String::new(),
        OffsetDateTime::UNIX_EPOCH,
        Duration::seconds(-1),
    )
}

fn build_cookie(
    config: &AuthConfig,
    value: String,
    expires: OffsetDateTime,
    max_age: Duration,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((config.cookie_name.clone(), value))
        .path(config.cookie_path.clone())
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .expires(expires)
        .max_age(max_age)
        .build();

    if !config.cookie_domain.is_empty() {
        cookie.set_domain(config.cookie_domain.clone());
    }

    cookie
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
    fn test_issue_cookie_attributes() {
        let before = OffsetDateTime::now_utc();
        let cookie = issue_refresh_cookie("header.payload.sig", &test_config());

        assert_eq!(cookie.name(), "refresh_token");
        assert_eq!(cookie.value(), "header.payload.sig");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("localhost"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(86400)));

        let expires = cookie.expires_datetime().unwrap();
        assert!(expires >= before + Duration::seconds(86400) - Duration::seconds(1));
        assert!(expires <= OffsetDateTime::now_utc() + Duration::seconds(86400));
    }

    #[test]
    fn test_revoke_cookie_attributes() {
        let cookie = revoke_refresh_cookie(&test_config());

        assert_eq!(cookie.name(), "refresh_token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("localhost"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(-1)));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let mut config = test_config();
        config.refresh_token_ttl_secs = u64::MAX / 2;

        let cookie = issue_refresh_cookie("t", &config);
        assert_eq!(cookie.max_age(), Some(Duration::seconds(i64::MAX)));
        assert!(cookie.expires_datetime().unwrap() > OffsetDateTime::now_utc());
        assert!(cookie.to_string().contains("Max-Age="));
    }

    #[test]
    fn test_empty_domain_is_omitted() {
        let mut config = test_config();
        config.cookie_name = "__Host-refresh_token".to_string();
        config.cookie_domain = String::new();

        let cookie = issue_refresh_cookie("t", &config);
        assert_eq!(cookie.domain(), None);
        assert!(!cookie.to_string().contains("Domain="));
    }
}
