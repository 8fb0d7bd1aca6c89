use crate::auth::{JwtConfig, JwtError};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | PORT | 5000 | HTTP 服务端口 |
/// | DB_URL | mem:// | 数据库地址 (ws://, wss://, mem://) |
/// | DB_NS | bistro | 命名空间 |
/// | DB_NAME | bistroDb | 数据库名 |
/// | DB_USER / DB_PASS | - | root 凭据 (两者都设置时才登录) |
/// | ACCESS_TOKEN_SECRET | - | JWT 签名密钥 |
/// | JWT_EXPIRATION_MINUTES | 60 | 令牌有效期 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// 日志相关变量见 [`LogConfig`]。
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库连接配置
    pub db: DbConfig,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 只有 JWT 密钥缺失 (release 构建) 会失败，其余使用默认值
    pub fn from_env() -> Result<Self, JwtError> {
        Ok(Self {
            http_port: env_or("PORT", 5000),
            db: DbConfig::from_env(),
            jwt: JwtConfig::from_env()?,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        })
    }
}

/// 数据库连接配置
#[derive(Clone)]
pub struct DbConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl DbConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DB_URL").unwrap_or_else(|_| "mem://".into()),
            namespace: std::env::var("DB_NS").unwrap_or_else(|_| "bistro".into()),
            database: std::env::var("DB_NAME").unwrap_or_else(|_| "bistroDb".into()),
            username: std::env::var("DB_USER").ok(),
            password: std::env::var("DB_PASS").ok(),
        }
    }

    /// In-memory engine, no credentials
    pub fn memory() -> Self {
        Self {
            url: "mem://".into(),
            namespace: "bistro".into(),
            database: "bistroDb".into(),
            username: None,
            password: None,
        }
    }

    /// Root credentials, only when both halves are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url)
            .field("namespace", &self.namespace)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// 日志配置
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | LOG_LEVEL | info | `RUST_LOG` 未设置时的过滤级别 |
/// | LOG_JSON | false | 控制台输出 JSON |
/// | LOG_DIR | - | 设置后启用按天滚动的文件日志 |
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
    pub dir: Option<String>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            json: env_or("LOG_JSON", false),
            dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
