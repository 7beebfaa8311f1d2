//! Transport configuration

use std::path::PathBuf;

use crate::error::{OxoError, Result};

/// Default zenoh router port
pub const DEFAULT_PORT: u16 = 7447;

/// How to reach the pub/sub bus
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Router host; None lets zenoh scout for peers on its own
    pub host: Option<String>,

    /// Router port
    pub port: u16,

    /// Optional zenoh configuration file, applied before the other fields
    pub config_file: Option<PathBuf>,

    /// Zenoh session mode ("client" or "peer")
    pub mode: Option<String>,

    /// Whether multicast scouting is enabled
    pub multicast_scouting: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            config_file: None,
            mode: None,
            multicast_scouting: true,
        }
    }
}

impl TransportConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to a router at host:port in client mode
    pub fn router(host: impl Into<String>, port: u16) -> Self {
        Self::default()
            .with_host(host.into())
            .with_port(port)
            .with_mode("client".to_string())
    }

    /// Set the router host
    pub fn with_host(mut self, host: String) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the router port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Load a zenoh configuration file first
    pub fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Set the zenoh session mode
    pub fn with_mode(mut self, mode: String) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Enable or disable multicast scouting
    pub fn with_multicast_scouting(mut self, enabled: bool) -> Self {
        self.multicast_scouting = enabled;
        self
    }

    /// Endpoint string used for the connection, if a host is set
    pub fn endpoint(&self) -> Option<String> {
        self.host
            .as_ref()
            .map(|host| format!("tcp/{}:{}", host, self.port))
    }

    /// Build the zenoh configuration
    pub fn to_zenoh_config(&self) -> Result<zenoh::Config> {
        let mut config = match &self.config_file {
            Some(path) => zenoh::Config::from_file(path)
                .map_err(|e| OxoError::Config(format!("failed to load {}: {}", path.display(), e)))?,
            None => zenoh::Config::default(),
        };

        if let Some(mode) = &self.mode {
            insert(&mut config, "mode", &format!("\"{}\"", mode))?;
        }
        if let Some(endpoint) = self.endpoint() {
            insert(&mut config, "connect/endpoints", &format!("[\"{}\"]", endpoint))?;
        }
        insert(
            &mut config,
            "scouting/multicast/enabled",
            if self.multicast_scouting { "true" } else { "false" },
        )?;

        Ok(config)
    }
}

fn insert(config: &mut zenoh::Config, key: &str, value: &str) -> Result<()> {
    config
        .insert_json5(key, value)
        .map_err(|e| OxoError::Config(format!("{} = {}: {}", key, value, e)))
}
