//! 认证相关的 HTTP 处理器

use crate::{
    auth::{
        generate_token_pair, issue_refresh_cookie, revoke_refresh_cookie, AuthContext, TokenPair,
        UserIdentity,
    },
    config::AuthConfig,
    error::AppError,
    middleware::AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use serde_json::json;
use std::sync::Arc;

/// Login response for an identity the caller has already authenticated:
/// the token pair as JSON plus the refresh token as an HttpOnly cookie.
pub fn session_response(
    identity: &UserIdentity,
    config: &AuthConfig,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenPair>), AppError> {
    let pair = generate_token_pair(identity, config)?;
    let jar = jar.add(issue_refresh_cookie(&pair.refresh_token, config));

    tracing::info!(user_id = identity.id, "Session issued");

    Ok((jar, Json(pair)))
}

/// 登出：下发过期的刷新令牌 cookie
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    (jar.add(revoke_refresh_cookie(&state.config.auth)), StatusCode::ACCEPTED)
}

/// 获取当前用户信息
pub async fn get_current_user(auth_context: AuthContext) -> impl IntoResponse {
    Json(json!({
        "id": auth_context.user_id,
        "name": auth_context.name,
        "expires_at": auth_context.expires_at,
    }))
}
