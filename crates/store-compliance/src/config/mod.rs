use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::compliance::radar::MAX_WINDOW_DAYS;
use crate::compliance::ScoringConfig;

/// Runtime stage the engine is deployed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: scoring_from_env()?,
        })
    }
}

fn scoring_from_env() -> Result<ScoringConfig, ConfigError> {
    let defaults = ScoringConfig::default();

    let orange_threshold_days = match env::var("COMPLIANCE_ORANGE_THRESHOLD_DAYS") {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|days| *days >= 0)
            .ok_or(ConfigError::InvalidThreshold { value: raw })?,
        Err(_) => defaults.orange_threshold_days,
    };

    let radar_window_days = match env::var("COMPLIANCE_RADAR_WINDOW_DAYS") {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|days| (1..=MAX_WINDOW_DAYS).contains(days))
            .ok_or(ConfigError::InvalidWindow { value: raw })?,
        Err(_) => defaults.radar_window_days,
    };

    let priority_limit = match env::var("COMPLIANCE_PRIORITY_LIMIT") {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or(ConfigError::InvalidLimit { value: raw })?,
        Err(_) => defaults.priority_limit,
    };

    Ok(ScoringConfig {
        orange_threshold_days,
        radar_window_days,
        priority_limit,
    })
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { value: String },
    InvalidWindow { value: String },
    InvalidLimit { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "COMPLIANCE_ORANGE_THRESHOLD_DAYS must be a whole number of days >= 0 (found '{}')",
                value
            ),
            ConfigError::InvalidWindow { value } => write!(
                f,
                "COMPLIANCE_RADAR_WINDOW_DAYS must be whole days between 1 and {} (found '{}')",
                MAX_WINDOW_DAYS, value
            ),
            ConfigError::InvalidLimit { value } => write!(
                f,
                "COMPLIANCE_PRIORITY_LIMIT must be a positive integer (found '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold { .. }
            | ConfigError::InvalidWindow { .. }
            | ConfigError::InvalidLimit { .. } => None,
        }
    }
}
