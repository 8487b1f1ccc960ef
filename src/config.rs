//! 配置系统
//! 进程启动时从环境变量加载一次，之后只读；签名密钥使用 Secret 包装

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// Cookie name prefix that browsers only accept with `Path=/` and no `Domain`.
const HOST_COOKIE_PREFIX: &str = "__Host-";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:8080"
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

/// Token issuance and verification settings.
///
/// Built once at startup and shared read-only (usually behind an `Arc`) by
/// every request. The signing secret never leaves this struct except as HMAC
/// key material.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// `iss` claim written into access tokens and required on verification
    pub issuer: String,
    /// `aud` claim written into access tokens
    pub audience: String,
    /// HMAC 共享密钥（使用 Secret 包装，防止日志泄露）
    pub secret: Secret<String>,
    /// 访问令牌有效期（秒）
    pub access_token_ttl_secs: u64,
    /// 刷新令牌有效期（秒）
    pub refresh_token_ttl_secs: u64,
    pub cookie_name: String,
    pub cookie_path: String,
    /// Empty means the refresh cookie carries no `Domain` attribute.
    pub cookie_domain: String,
}

impl AuthConfig {
    /// 访问令牌有效期；超出 chrono 可表示范围时为 None
    pub fn access_ttl(&self) -> Option<chrono::Duration> {
        lifetime(self.access_token_ttl_secs)
    }

    /// 刷新令牌有效期；超出 chrono 可表示范围时为 None
    pub fn refresh_ttl(&self) -> Option<chrono::Duration> {
        lifetime(self.refresh_token_ttl_secs)
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    /// Check the settings a hand-built `AuthConfig` must satisfy.
    ///
    /// `AppConfig::from_env` runs this automatically.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Message("auth.issuer must not be empty".to_string()));
        }

        if self.secret.expose_secret().is_empty() {
            return Err(ConfigError::Message("auth.secret must not be empty".to_string()));
        }

        for (name, secs) in [
            ("access_token_ttl_secs", self.access_token_ttl_secs),
            ("refresh_token_ttl_secs", self.refresh_token_ttl_secs),
        ] {
            if secs == 0 || lifetime(secs).is_none() {
                return Err(ConfigError::Message(format!(
                    "auth.{} must be a positive number of seconds, got {}",
                    name, secs
                )));
            }
        }

        if self.cookie_name.is_empty() {
            return Err(ConfigError::Message("auth.cookie_name must not be empty".to_string()));
        }

        if !self.cookie_path.starts_with('/') {
            return Err(ConfigError::Message(format!(
                "auth.cookie_path must start with '/', got '{}'",
                self.cookie_path
            )));
        }

        if self.cookie_name.starts_with(HOST_COOKIE_PREFIX)
            && (self.cookie_path != "/" || !self.cookie_domain.is_empty())
        {
            return Err(ConfigError::Message(format!(
                "cookie '{}' uses the {} prefix and requires path '/' and an empty domain",
                self.cookie_name, HOST_COOKIE_PREFIX
            )));
        }

        Ok(())
    }
}

fn lifetime(secs: u64) -> Option<chrono::Duration> {
    i64::try_from(secs).ok().and_then(chrono::Duration::try_seconds)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:8080")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("auth.issuer", "example.com")?
            .set_default("auth.audience", "example.com")?
            .set_default("auth.secret", "change-this-secret-in-production-min-32-chars!")?
            .set_default("auth.access_token_ttl_secs", 900)?
            .set_default("auth.refresh_token_ttl_secs", 86400)?
            .set_default("auth.cookie_name", "__Host-refresh_token")?
            .set_default("auth.cookie_path", "/")?
            .set_default("auth.cookie_domain", "")?;

        // 从环境变量加载配置（前缀为 CINEMA_）
        settings = settings.add_source(
            Environment::with_prefix("CINEMA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        self.auth.validate()
    }
}
