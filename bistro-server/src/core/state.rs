use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有请求共享的资源
///
/// 克隆成本极低：`Surreal<Any>` 内部是共享连接，JWT 服务用 Arc 包装。
/// 进程内只在启动时构造一次，然后注入到每个路由。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Any> | 数据库连接 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库连接 (SurrealDB)
    pub db: Surreal<Any>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 手动构造 (测试中常用)
    pub fn new(config: Config, db: Surreal<Any>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// 初始化服务器状态：连接数据库并准备 schema
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let service = DbService::connect(&config.db).await?;
        Ok(Self::new(config.clone(), service.db))
    }

    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
