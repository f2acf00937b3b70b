use crate::auth::{
    jwt::JwtKeys,
    repo::{InMemoryUserStore, UserStore},
};
use crate::config::AppConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub keys: Arc<JwtKeys>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        lazy_static::initialize(&crate::auth::password::DUMMY_HASH);
        let users = Arc::new(InMemoryUserStore::new()) as Arc<dyn UserStore>;
        Ok(Self::from_parts(config, users))
    }

    pub fn from_parts(config: AppConfig, users: Arc<dyn UserStore>) -> Self {
        let keys = Arc::new(JwtKeys::from_config(&config.jwt));
        Self {
            config: Arc::new(config),
            users,
            keys,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                ttl_minutes: 30,
            },
        };
        Self::from_parts(config, Arc::new(InMemoryUserStore::new()))
    }
}
