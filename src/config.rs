//! Configuration loading and types.
//!
//! Loaded from a TOML file at startup; every section has defaults so a
//! bare `[server]` block (or no file at all) yields a working server on
//! the standard port.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Group creation and delivery policy knobs.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Wire and queue limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Durable message journal (optional collaborator).
    #[serde(default)]
    pub journal: JournalConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity and listen address.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, used in logs only.
    #[serde(default = "default_name")]
    pub name: String,
    /// Address the gateway binds to.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            listen: default_listen(),
        }
    }
}

/// Policy knobs for the behaviors the protocol leaves configurable.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PolicyConfig {
    /// Minimum number of distinct, currently-connected members (besides
    /// the creator) a CREATE_GROUP must name. The default of 2 gives a
    /// minimum total group size of 3 including the creator; 0 makes
    /// creation lenient (unknown handles are silently pruned).
    #[serde(default = "default_min_members")]
    pub min_members_besides_creator: usize,
    /// Whether GROUP_MSG requires the sender to be a group member.
    #[serde(default = "default_true")]
    pub require_sender_membership: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_members_besides_creator: default_min_members(),
            require_sender_membership: default_true(),
        }
    }
}

/// Wire and queue limits.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted line length in bytes, terminator included.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Depth of each session's outbound notification queue. A recipient
    /// whose queue is full is skipped, never waited on.
    #[serde(default = "default_queue_depth")]
    pub outbound_queue_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            outbound_queue_depth: default_queue_depth(),
        }
    }
}

/// Journal backend selection. "none" wires the no-op sink.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_name() -> String {
    "chatwave".to_string()
}

fn default_listen() -> SocketAddr {
    "0.0.0.0:9090".parse().expect("static default address")
}

fn default_min_members() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_max_line_len() -> usize {
    chatwave_proto::DEFAULT_MAX_LINE_LEN
}

fn default_queue_depth() -> usize {
    64
}

fn default_backend() -> String {
    "none".to_string()
}
