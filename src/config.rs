// ⚙️ Dashboard Configuration
//
// Defaults suit a local run; every field can be overridden from the
// environment (a `.env` file is honoured by the binaries).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::repository::LoadOptions;

pub const ENV_HOST: &str = "DASHBOARD_HOST";
pub const ENV_PORT: &str = "DASHBOARD_PORT";
pub const ENV_DATA: &str = "DASHBOARD_DATA";
pub const ENV_STATIC_DIR: &str = "DASHBOARD_STATIC_DIR";
pub const ENV_LOG: &str = "DASHBOARD_LOG";
pub const ENV_STRICT: &str = "DASHBOARD_STRICT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Transaction document (JSON array or CSV)
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Optional directory of dashboard assets served at "/"
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Reject records with critical validation issues at load time
    #[serde(default)]
    pub strict: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/transactions.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            host: default_host(),
            port: default_port(),
            data_path: default_data_path(),
            static_dir: None,
            log_level: default_log_level(),
            strict: false,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DashboardConfig::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} must be a port number, got '{}'", ENV_PORT, port))?;
        }
        if let Some(path) = get(ENV_DATA) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(dir) = get(ENV_STATIC_DIR) {
            config.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = get(ENV_LOG) {
            config.log_level = level;
        }
        if let Some(strict) = get(ENV_STRICT) {
            config.strict = parse_bool(&strict)
                .with_context(|| format!("{} must be true or false, got '{}'", ENV_STRICT, strict))?;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            strict: self.strict,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("not a boolean: {}", other),
    }
}
