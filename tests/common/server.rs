//! Test server management.
//!
//! Runs the gateway in-process on an ephemeral port, so tests never race
//! over fixed port numbers and need no pre-built binary.

use chatwaved::config::{Config, PolicyConfig};
use chatwaved::journal;
use chatwaved::net::Gateway;
use chatwaved::state::Registry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server with default configuration.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with_policy(PolicyConfig::default()).await
    }

    /// Spawn a server with a specific policy.
    pub async fn spawn_with_policy(policy: PolicyConfig) -> anyhow::Result<Self> {
        let mut config = Config::default();
        config.server.listen = "127.0.0.1:0".parse()?;
        config.policy = policy;

        let registry = Arc::new(Registry::new(config.policy));
        let journal = journal::from_config(&config.journal);
        let gateway = Gateway::bind(&config, registry, journal).await?;
        let addr = gateway.local_addr()?;

        let task = tokio::spawn(async move {
            let _ = gateway.run().await;
        });

        Ok(Self { addr, task })
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Create a new test client connected to this server.
    #[allow(dead_code)]
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
