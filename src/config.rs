use std::env;
use std::path::PathBuf;

use log::LevelFilter;
use thiserror::Error;

use crate::auth::GuardScope;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("缺少环境变量: {0}")]
    Missing(&'static str),

    #[error("环境变量 {name} 的值无效: {value}")]
    Invalid { name: &'static str, value: String },
}

/// 应用配置，全部来自环境变量（.env 由 dotenv 预先加载）
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub log_dir: PathBuf,
    pub log_level: LevelFilter,
    pub guard_scope: GuardScope,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080u16)?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let token_ttl_hours = parse_or(&lookup, "TOKEN_TTL_HOURS", 24i64)?;
        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let log_dir = PathBuf::from(lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()));
        let log_level = parse_or(&lookup, "LOG_LEVEL", LevelFilter::Debug)?;

        let guard_scope = match lookup("LOGIN_GUARD_SCOPE").as_deref() {
            None | Some("identifier") => GuardScope::PerIdentifier,
            Some("global") => GuardScope::Global,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOGIN_GUARD_SCOPE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            db_max_connections,
            token_ttl_hours,
            bcrypt_cost,
            log_dir,
            log_level,
            guard_scope,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => {
            let parsed = raw.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::Invalid { name, value: raw })
        }
    }
}
