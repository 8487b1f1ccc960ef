//! 统一错误模型
//! 认证错误、签名错误以及 HTTP 错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Reasons an inbound access token is rejected.
///
/// None of these are retryable. `TokenExpired` is kept apart from the other
/// cases because the client can recover by exchanging its refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No auth header found")]
    MissingHeader,

    #[error("Invalid auth header")]
    MalformedHeader,

    #[error("Unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// A token could not be produced. Internal fault, never a client error.
#[derive(Debug, Error)]
pub enum SigningError {
    /// HMAC 签名或序列化失败
    #[error("Failed to sign token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),

    /// 配置的有效期无法表示为时间戳
    #[error("Token lifetime of {0} seconds is out of range")]
    LifetimeOutOfRange(u64),
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Config(_) | AppError::Signing(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含令牌或签名细节）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(AuthError::TokenExpired) => "Token is expired".to_string(),
            AppError::Auth(_) => "Authentication failed".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Signing(_) | AppError::Internal => "Internal server error".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }
}

/// 错误响应 DTO
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
    pub request_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                message: self.user_message(),
                request_id,
            },
        };

        // 客户端错误记 warn，服务端错误记 error
        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Application error"
            );
        } else {
            tracing::warn!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}
