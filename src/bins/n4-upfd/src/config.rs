//! UPF Configuration
//!
//! YAML configuration for the N4 endpoint:
//!
//! ```yaml
//! pfcp:
//!   bind: 0.0.0.0
//!   node_ip: 10.0.0.4
//!   port: 8805
//! ```
//!
//! Every key is optional. A missing file yields the defaults.

use n4_pfcp::types::{NodeId, PFCP_UDP_PORT};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Top-level UPF configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpfConfig {
    pub pfcp: PfcpConf,
}

/// `pfcp:` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PfcpConf {
    /// Address the N4 socket binds to
    pub bind: IpAddr,
    /// Address advertised in the Node ID IE
    pub node_ip: IpAddr,
    pub port: u16,
}

impl Default for PfcpConf {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            node_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: PFCP_UDP_PORT,
        }
    }
}

impl PfcpConf {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::from(self.node_ip)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_ip.is_unspecified() {
            return Err(ConfigError::ValidationError(format!(
                "pfcp.node_ip {} cannot be advertised as a Node ID",
                self.node_ip
            )));
        }
        Ok(())
    }
}

impl UpfConfig {
    /// Parse a YAML document
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load the configuration file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_yaml(&text)?;
                log::info!("Configuration loaded from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "Configuration file {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pfcp.validate()
    }
}
