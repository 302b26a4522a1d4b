use novatv_backend::config::AppConfig;

use crate::db::ConfigStore;

/// 进程级运行环境 / Process-wide runtime environment
#[derive(Debug, Clone)]
pub struct RuntimeEnv {
    /// 存储模式，"localstorage" 表示未配置持久存储
    pub storage_type: String,
    /// 站长用户名，越过用户名册的超级管理员 / Bootstrap owner, bypasses the roster
    pub owner_username: Option<String>,
}

impl RuntimeEnv {
    /// 环境变量优先于配置文件 / Env vars take precedence over config file
    pub fn resolve(config: &AppConfig) -> Self {
        Self {
            storage_type: std::env::var("STORAGE_TYPE")
                .unwrap_or_else(|_| config.storage.mode.clone()),
            owner_username: std::env::var("OWNER_USERNAME").ok(),
        }
    }
}

pub struct AppState {
    pub config_store: ConfigStore,
    pub env: RuntimeEnv,
}
