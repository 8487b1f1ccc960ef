//! 测试公共模块
//! 提供测试配置与令牌构造辅助函数

#![allow(dead_code)]

use cinema_auth::{
    auth::{Claims, UserIdentity},
    config::{AppConfig, AuthConfig, LoggingConfig, ServerConfig},
    middleware::AppState,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::Secret;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试认证配置
pub fn create_auth_config() -> AuthConfig {
    AuthConfig {
        issuer: "example.com".to_string(),
        audience: "example.com".to_string(),
        secret: Secret::new(TEST_SECRET.to_string()),
        access_token_ttl_secs: 900,
        refresh_token_ttl_secs: 86400,
        cookie_name: "refresh_token".to_string(),
        cookie_path: "/".to_string(),
        cookie_domain: "localhost".to_string(),
    }
}

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        auth: create_auth_config(),
    }
}

/// 创建测试应用状态
pub fn create_test_app_state() -> Arc<AppState> {
    Arc::new(AppState::new(create_test_config()))
}

pub fn test_identity() -> UserIdentity {
    UserIdentity {
        id: 7,
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
    }
}

/// 构造任意内容的访问令牌声明
pub fn claims_with(issuer: &str, issued_at: i64, expires_at: i64) -> Claims {
    Claims {
        audience: "example.com".to_string(),
        expires_at,
        issued_at,
        issuer: issuer.to_string(),
        token_id: Some(uuid::Uuid::new_v4().to_string()),
        name: "Ann Lee".to_string(),
        subject: "7".to_string(),
        token_type: "JWT".to_string(),
    }
}

/// 使用指定算法和密钥签名
pub fn sign_with<T: serde::Serialize>(claims: &T, algorithm: Algorithm, secret: &str) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Token signing should succeed")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
