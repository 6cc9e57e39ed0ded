//! Gateway - TCP listener that accepts incoming connections.
//!
//! The gateway binds the listen socket and spawns one [`Connection`] task
//! per accepted client, wiring each to the shared registry and router.

use crate::config::{Config, LimitsConfig};
use crate::handlers::Dispatcher;
use crate::journal::MessageJournal;
use crate::net::Connection;
use crate::routing::Router;
use crate::state::Registry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

pub struct Gateway {
    listener: TcpListener,
    dispatcher: Dispatcher,
    registry: Arc<Registry>,
    limits: LimitsConfig,
}

impl Gateway {
    /// Bind the listen address and assemble the shared components.
    pub async fn bind(
        config: &Config,
        registry: Arc<Registry>,
        journal: Arc<dyn MessageJournal>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.server.listen).await?;
        info!(addr = %listener.local_addr()?, "listener bound");

        let router = Router::new(Arc::clone(&registry), journal, config.policy);
        let dispatcher = Dispatcher::new(Arc::clone(&registry), router);

        Ok(Self {
            listener,
            dispatcher,
            registry,
            limits: config.limits,
        })
    }

    /// The bound address. With port 0 in the config this is where the OS
    /// actually put us; tests rely on it.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the accept loop forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "connection accepted");

                    let connection = Connection::new(
                        stream,
                        addr,
                        self.dispatcher.clone(),
                        Arc::clone(&self.registry),
                        self.limits,
                    );
                    tokio::spawn(async move {
                        if let Err(e) = connection.run().await {
                            error!(%addr, error = %e, "connection error");
                        }
                        info!(%addr, "connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }
    }
}
