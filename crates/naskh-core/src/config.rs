//! Configuration for Naskh
//!
//! A node's role, bind address, data directory, and replica endpoints are
//! fixed at startup from the environment. Only the replica list can change
//! afterwards, via the replicator's live reconfiguration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Role a node plays for its process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Primary,
    Replica,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Primary => write!(f, "primary"),
            NodeRole::Replica => write!(f, "replica"),
        }
    }
}

impl FromStr for NodeRole {
    type Err = std::convert::Infallible;

    /// Anything other than "primary" is a replica.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(NodeRole::Primary),
            _ => Ok(NodeRole::Replica),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Role of this node
    pub role: NodeRole,
    /// Address to bind the HTTP listener to
    pub bind_address: String,
    /// Port for the HTTP listener
    pub port: u16,
    /// Directory for persistent storage
    pub data_dir: PathBuf,
    /// Base URLs of replicas (used by the primary)
    pub replica_urls: Vec<String>,
    /// Base URL of the primary (used by replicas)
    pub primary_url: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            role: NodeRole::Replica,
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            replica_urls: Vec::new(),
            primary_url: None,
        }
    }
}

impl NodeConfig {
    /// Load configuration from `NASKH_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(role) = std::env::var("NASKH_ROLE") {
            config.role = role.parse().unwrap_or(NodeRole::Replica);
        }
        if let Ok(addr) = std::env::var("NASKH_BIND_ADDRESS") {
            config.bind_address = addr;
        }
        if let Ok(port) = std::env::var("NASKH_PORT") {
            if let Ok(p) = port.parse() {
                config.port = p;
            }
        }
        if let Ok(dir) = std::env::var("NASKH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(urls) = std::env::var("NASKH_REPLICA_URLS") {
            config.replica_urls = parse_url_list(&urls);
        }
        if let Ok(url) = std::env::var("NASKH_PRIMARY_URL") {
            if !url.is_empty() {
                config.primary_url = Some(url);
            }
        }

        config
    }

    pub fn is_primary(&self) -> bool {
        self.role == NodeRole::Primary
    }
}

/// Split a comma-separated URL list, trimming whitespace and dropping empties.
pub fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
