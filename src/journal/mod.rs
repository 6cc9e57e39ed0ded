//! Durable message journal - the optional persistence collaborator.
//!
//! The core never stores messages; after a successful delivery it hands a
//! copy of the routed message to a [`MessageJournal`] and moves on. The
//! call is fire-and-forget: the router spawns it and a journal failure is
//! logged, never surfaced to either endpoint. The default backend is the
//! no-op sink.

pub mod noop;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Where a routed message was addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    User(String),
    Group(String),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(handle) => write!(f, "user:{handle}"),
            Self::Group(name) => write!(f, "group:{name}"),
        }
    }
}

/// A message that was delivered to at least one recipient. Exists only
/// for the duration of the routing call plus the journal write.
#[derive(Debug, Clone)]
pub struct RoutedMessage {
    pub sender: String,
    pub target: Target,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl RoutedMessage {
    pub fn new(sender: &str, target: Target, body: &str) -> Self {
        Self {
            sender: sender.to_string(),
            target,
            body: body.to_string(),
            sent_at: Utc::now(),
        }
    }
}

/// Sink for routed messages.
#[async_trait]
pub trait MessageJournal: Send + Sync {
    async fn record(&self, message: RoutedMessage) -> anyhow::Result<()>;
}

/// Build the journal backend named by the configuration. Unknown names
/// fall back to the no-op sink with a warning.
pub fn from_config(config: &crate::config::JournalConfig) -> Arc<dyn MessageJournal> {
    match config.backend.as_str() {
        "none" => Arc::new(noop::NoOpJournal),
        other => {
            tracing::warn!(backend = %other, "unknown journal backend, using no-op");
            Arc::new(noop::NoOpJournal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_display() {
        assert_eq!(Target::User("bob".into()).to_string(), "user:bob");
        assert_eq!(Target::Group("team".into()).to_string(), "group:team");
    }

    #[test]
    fn unknown_backend_falls_back_to_noop() {
        let config = crate::config::JournalConfig {
            backend: "postgres".to_string(),
        };
        // Must not panic; the returned sink accepts records.
        let journal = from_config(&config);
        let message = RoutedMessage::new("alice", Target::User("bob".into()), "hi");
        let result = tokio::runtime::Runtime::new()
            .expect("runtime")
            .block_on(journal.record(message));
        assert!(result.is_ok());
    }
}
