//! JWT 认证中间件

use crate::{
    auth::{claims::AuthContext, verify::verify_request},
    error::AppError,
    middleware::AppState,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Internal)
    }
}

/// JWT 认证中间件 - 必须认证
///
/// 无论成功与否，响应都带有 `Vary: Authorization`
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let mut vary = HeaderMap::new();

    let mut response = match verify_request(req.headers(), &mut vary, &state.config.auth) {
        Ok(claims) => {
            tracing::debug!(subject = %claims.subject, "Access token accepted");
            req.extensions_mut().insert(AuthContext::from(claims));
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(reason = %e, "Access token rejected");
            AppError::from(e).into_response()
        }
    };

    for value in vary.get_all(header::VARY) {
        response.headers_mut().append(header::VARY, value.clone());
    }

    response
}
