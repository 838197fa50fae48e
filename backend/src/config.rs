//! # Server Configuration
//!
//! Settings are read from an optional YAML file named by `WISHES_CONFIG`,
//! then overridden field by field from `WISHES_*` environment variables.
//!
//! ## YAML Format
//!
//! ```yaml
//! bind_address: "127.0.0.1:3000"
//! database_url: "sqlite:wishes.db"
//! allowed_origin: "http://localhost:8080"
//! static_dir: "../frontend/dist"
//! dispatch_order: "template-first"
//! log_filter: "info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::template_dispatch::DispatchOrder;

pub const CONFIG_PATH_VAR: &str = "WISHES_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub allowed_origin: String,
    /// Directory served for any non-API path, if set
    pub static_dir: Option<PathBuf>,
    pub dispatch_order: DispatchOrder,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: "sqlite:wishes.db".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
            static_dir: None,
            dispatch_order: DispatchOrder::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from `WISHES_CONFIG` (if set) and the process environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: ServerConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        info!("Loaded server config from {:?}", path);
        Ok(config)
    }

    /// Override fields from `WISHES_*` variables found through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("WISHES_BIND_ADDRESS") {
            self.bind_address = value
                .parse()
                .with_context(|| format!("Invalid WISHES_BIND_ADDRESS '{}'", value))?;
        }
        if let Some(value) = lookup("WISHES_DATABASE_URL") {
            self.database_url = value;
        }
        if let Some(value) = lookup("WISHES_ALLOWED_ORIGIN") {
            self.allowed_origin = value;
        }
        if let Some(value) = lookup("WISHES_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(value)).filter(|dir| !dir.as_os_str().is_empty());
        }
        if let Some(value) = lookup("WISHES_DISPATCH_ORDER") {
            self.dispatch_order = serde_yaml::from_str(&value)
                .with_context(|| format!("Invalid WISHES_DISPATCH_ORDER '{}'", value))?;
        }
        if let Some(value) = lookup("WISHES_LOG_FILTER") {
            self.log_filter = value;
        }
        debug!("Effective server config: {:?}", self);
        Ok(())
    }
}
