//! 状态与健康检查处理器

use axum::Json;
use serde::Serialize;

/// 首页状态响应
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// 存活探针响应
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn home() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active".to_string(),
        message: "Cinema is up and running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 存活探针
/// 快速响应，不检查依赖
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
