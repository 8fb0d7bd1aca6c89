//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。
//!
//! 令牌里装的是客户端在 `POST /jwt` 提交的身份载荷 (至少包含 `email`)，
//! 服务端只追加 `iat` / `exp` 并用 HS256 签名。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const DEFAULT_EXPIRATION_MINUTES: i64 = 60;

/// JWT 配置
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 密钥
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
}

impl JwtConfig {
    /// 用指定密钥和默认有效期 (60 分钟) 构造
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
        }
    }

    /// 从 `ACCESS_TOKEN_SECRET` / `JWT_EXPIRATION_MINUTES` 加载
    ///
    /// debug 构建下缺失密钥时生成临时密钥 (重启后旧令牌全部失效)，
    /// release 构建下缺失密钥直接报错。
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = load_jwt_secret()?;
        let expiration_minutes = std::env::var("JWT_EXPIRATION_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|m: &i64| *m > 0)
            .unwrap_or(DEFAULT_EXPIRATION_MINUTES);

        Ok(Self {
            secret,
            expiration_minutes,
        })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("身份载荷缺少 email")]
    MissingEmail,

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的 JWT 密钥 (用于开发环境)
pub fn generate_printable_secret() -> Result<String, JwtError> {
    const ALLOWED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes)
        .map_err(|_| JwtError::ConfigError("Failed to generate random secret".to_string()))?;

    Ok(bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect())
}

fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("ACCESS_TOKEN_SECRET") {
        Ok(secret) if !secret.is_empty() => Ok(secret),
        _ => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "ACCESS_TOKEN_SECRET not set! Generating temporary key for development."
                );
                generate_printable_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "ACCESS_TOKEN_SECRET environment variable must be set in production!"
                        .to_string(),
                ))
            }
        }
    }
}

/// 客户端提交的身份载荷
///
/// `email` 必填，其余字段 (name, photoURL, ...) 原样写进令牌。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityPayload {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdentityPayload {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户邮箱 (身份主键)
    pub email: String,
    /// 载荷中的其它字段
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为身份载荷签发令牌
    pub fn generate_token(&self, payload: IdentityPayload) -> Result<String, JwtError> {
        if payload.email.trim().is_empty() {
            return Err(JwtError::MissingEmail);
        }

        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let IdentityPayload { email, mut extra } = payload;
        // Server-owned timing claims win over anything the client sent
        extra.remove("exp");
        extra.remove("iat");

        let claims = Claims {
            email,
            extra,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        // Expired means expired: no grace period past `exp`
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌 (scheme 大小写不敏感)
    pub fn extract_from_header(header: &str) -> Option<&str> {
        let (scheme, token) = header.trim_start().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("Bearer") {
            return None;
        }
        Some(token.trim()).filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证守卫创建并放入请求扩展，handler 用提取器取出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// 令牌中的邮箱
    pub email: String,
    /// 过期时间戳
    pub expires_at: i64,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::new("test-secret-for-unit-tests"))
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let mut payload = IdentityPayload::new("a@x.com");
        payload
            .extra
            .insert("name".to_string(), Value::String("Alice".to_string()));

        let token = service
            .generate_token(payload)
            .expect("Failed to generate test token");
        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.extra.get("name"), Some(&Value::from("Alice")));
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_client_cannot_extend_expiry() {
        let service = service();
        let mut payload = IdentityPayload::new("a@x.com");
        payload.extra.insert("exp".to_string(), Value::from(i64::MAX));

        let token = service.generate_token(payload).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert!(claims.exp < Utc::now().timestamp() + 2 * 60 * 60);
        assert!(!claims.extra.contains_key("exp"));
    }

    #[test]
    fn test_empty_email_rejected() {
        let err = service().generate_token(IdentityPayload::new("  ")).unwrap_err();
        assert!(matches!(err, JwtError::MissingEmail));
    }

    fn signed_with_exp(exp: i64) -> String {
        let claims = Claims {
            email: "a@x.com".to_string(),
            extra: Map::new(),
            exp,
            iat: exp - 3600,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-for-unit-tests"),
        )
        .unwrap()
    }

    #[test]
    fn test_expired_token() {
        let token = signed_with_exp(Utc::now().timestamp() - 3600);

        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_just_expired_token_has_no_grace_period() {
        let token = signed_with_exp(Utc::now().timestamp() - 30);

        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service()
            .generate_token(IdentityPayload::new("a@x.com"))
            .unwrap();
        let other = JwtService::with_config(JwtConfig::new("a-completely-different-secret"));

        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("BEARER  abc "), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
        assert_eq!(JwtService::extract_from_header("Bearerabc"), None);
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("abc"), None);
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_printable_secret().unwrap();
        let b = generate_printable_secret().unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_graphic()));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", service());
        assert!(!rendered.contains("test-secret-for-unit-tests"));
    }
}
