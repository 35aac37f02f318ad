/*
 * Responsibility
 * - read settings from the environment (.env is honoured via dotenvy)
 * - validate them (startup fails when something is missing)
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // JSON seed for the in-memory user/token/repository store
    pub seed_path: PathBuf,

    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024 * 1024; // 1 GiB
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 300;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let seed_path = std::env::var("LFS_SEED_PATH")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::Missing("LFS_SEED_PATH"))?;

        let max_body_bytes = match std::env::var("LFS_MAX_BODY_BYTES") {
            Ok(v) => v
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("LFS_MAX_BODY_BYTES"))?,
            Err(_) => DEFAULT_MAX_BODY_BYTES,
        };

        let request_timeout = match std::env::var("LFS_REQUEST_TIMEOUT_SECONDS") {
            Ok(v) => v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("LFS_REQUEST_TIMEOUT_SECONDS"))?,
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        };

        Ok(Self {
            addr,
            app_env,
            seed_path,
            max_body_bytes,
            request_timeout,
        })
    }
}
