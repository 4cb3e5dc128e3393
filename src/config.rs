//! YAML configuration file handling.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CorpusError, Result};

/// Contents of the configuration file.
///
/// The file must load and parse in every mode. `api_ip` and `api_port`
/// are only required once server mode asks for a bind address, so batch
/// runs work with an empty file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Address the HTTP API binds to.
    #[serde(default)]
    pub api_ip: Option<String>,
    /// Port the HTTP API binds to.
    #[serde(default)]
    pub api_port: Option<u16>,
    /// Emit one log line per handled HTTP request.
    #[serde(default)]
    pub show_requests: bool,
}

impl Config {
    /// Load and parse the config file. Both failure kinds are fatal
    /// startup errors regardless of mode.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            CorpusError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    /// Bind address for server mode. Unset, empty, or zero values mean
    /// the config cannot support a server and startup must stop.
    pub fn bind_addr(&self) -> Result<String> {
        let ip = self
            .api_ip
            .as_deref()
            .filter(|ip| !ip.is_empty())
            .ok_or_else(|| CorpusError::Config("api_ip is not set in the config file".into()))?;
        let port = self
            .api_port
            .filter(|&port| port != 0)
            .ok_or_else(|| CorpusError::Config("api_port is not set in the config file".into()))?;
        Ok(format!("{}:{}", ip, port))
    }
}
