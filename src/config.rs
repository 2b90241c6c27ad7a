use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::period::SchedulePeriod;

pub const CONFIG_PATH_ENV: &str = "ROSTER_SCHEDULER_CONFIG";
pub const HTTP_ADDR_ENV: &str = "ROSTER_SCHEDULER_HTTP_ADDR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpSection,
    pub logging: LoggingSection,
    pub storage: StorageSection,
    pub period: PeriodSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub addr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directive, e.g. `info,scheduler=debug`.
    pub filter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub sqlite_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodSection {
    /// First day of the two-week period; today when absent.
    pub start: Option<NaiveDate>,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("parse scheduler config")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&s)
    }

    /// Reads the file named by `ROSTER_SCHEDULER_CONFIG` when set, otherwise
    /// defaults. `ROSTER_SCHEDULER_HTTP_ADDR` overrides `http.addr`.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_from(Path::new(&path))?,
            None => Self::default(),
        };
        if let Ok(addr) = std::env::var(HTTP_ADDR_ENV) {
            config.http.addr = addr;
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize scheduler config")
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        self.http
            .addr
            .parse()
            .with_context(|| format!("invalid http address '{}'", self.http.addr))
    }

    pub fn schedule_period(&self) -> SchedulePeriod {
        self.period
            .start
            .map(SchedulePeriod::two_week)
            .unwrap_or_else(SchedulePeriod::current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config_with_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            filter = "debug,scheduler=trace"

            [period]
            start = "2025-03-03"
            "#,
        )
        .unwrap();
        assert_eq!(config.http.addr, "0.0.0.0:3000");
        assert_eq!(config.logging.filter, "debug,scheduler=trace");
        assert!(config.storage.sqlite_path.is_none());
        let period = config.schedule_period();
        assert_eq!(period.description(), "2025-03-03 to 2025-03-16");
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = AppConfig::default();
        config.storage.sqlite_path = Some(PathBuf::from("roster.db"));
        let text = config.to_toml_string().unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_bad_http_addr() {
        let mut config = AppConfig::default();
        assert!(config.http_addr().is_ok());
        config.http.addr = "not an address".into();
        assert!(config.http_addr().is_err());
    }
}
