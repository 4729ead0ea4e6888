use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ESTIMATOR_HTTP_ADDR must be a socket address like 127.0.0.1:3000 (got '{value}')")]
    InvalidAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Settings for the binaries, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub telemetry: TelemetryConfig,
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_value =
            lookup("ESTIMATOR_HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = addr_value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: addr_value.clone(),
                source,
            })?;

        let log_level = lookup("ESTIMATOR_LOG_LEVEL")
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let database_path = lookup("ESTIMATOR_DB_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            http_addr,
            telemetry: TelemetryConfig { log_level },
            database_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_missing() {
        let config = AppConfig::from_lookup(lookup_from(&[])).expect("defaults load");
        assert_eq!(config.http_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ESTIMATOR_HTTP_ADDR", "0.0.0.0:8080"),
            ("ESTIMATOR_LOG_LEVEL", "debug"),
            ("ESTIMATOR_DB_PATH", "/tmp/estimates.db"),
        ]))
        .expect("config loads");
        assert_eq!(config.http_addr.port(), 8080);
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/estimates.db")));
    }

    #[test]
    fn rejects_bad_addr() {
        let err = AppConfig::from_lookup(lookup_from(&[("ESTIMATOR_HTTP_ADDR", "nowhere")]))
            .unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }
}
