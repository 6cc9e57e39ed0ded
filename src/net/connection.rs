//! Connection - handles an individual client connection.
//!
//! Each connection runs in its own tokio task: a unified event loop
//! selecting between inbound lines from the socket and outbound lines
//! queued by other sessions' fan-outs. Commands are processed strictly
//! sequentially, which is what gives per-sender FIFO delivery; the
//! outbound queue decouples this session's pace from its senders.
//!
//! Every exit path - LOGOUT, EOF, read error, write error - runs the same
//! cleanup: unregister the handle (pruning group membership) and drop the
//! socket.

use crate::config::LimitsConfig;
use crate::handlers::{Context, Dispatcher};
use crate::state::Registry;
use chatwave_proto::{reply, LineCodec};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, instrument, warn};

pub struct Connection {
    stream: TcpStream,
    addr: SocketAddr,
    dispatcher: Dispatcher,
    registry: Arc<Registry>,
    limits: LimitsConfig,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        dispatcher: Dispatcher,
        registry: Arc<Registry>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            stream,
            addr,
            dispatcher,
            registry,
            limits,
        }
    }

    /// Run the connection's event loop until the session ends.
    #[instrument(skip(self), fields(addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let (read_half, write_half) = self.stream.into_split();
        let mut reader = FramedRead::new(
            read_half,
            LineCodec::with_max_len(self.limits.max_line_len),
        );
        let mut writer = FramedWrite::new(
            write_half,
            LineCodec::with_max_len(self.limits.max_line_len),
        );

        // Queue feeding this session's write path. The router holds the
        // sending side via the registered SessionHandle.
        let (outbound_tx, mut outbound_rx) =
            mpsc::channel::<String>(self.limits.outbound_queue_depth);

        writer.send(reply::welcome()).await?;

        // Authenticated handle; set once by a successful LOGIN.
        let mut handle: Option<String> = None;

        loop {
            tokio::select! {
                // Inbound: next command line from the peer.
                result = reader.next() => match result {
                    Some(Ok(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        debug!(raw = %line, "received line");

                        let mut ctx = Context {
                            outbound: &outbound_tx,
                            handle: &mut handle,
                        };
                        match self.dispatcher.dispatch_line(&mut ctx, &line) {
                            Ok(reply_line) => {
                                if let Err(e) = writer.send(reply_line).await {
                                    warn!(error = %e, "write error");
                                    break;
                                }
                            }
                            Err(e) => {
                                debug!(code = e.error_code(), error = %e, "command failed");
                                match e.to_reply() {
                                    Some(reply_line) => {
                                        if let Err(e) = writer.send(reply_line).await {
                                            warn!(error = %e, "write error");
                                            break;
                                        }
                                    }
                                    // LOGOUT: close without a reply.
                                    None => break,
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "read error");
                        break;
                    }
                    None => {
                        info!("client disconnected");
                        break;
                    }
                },

                // Outbound: notifications routed from other sessions.
                Some(line) = outbound_rx.recv() => {
                    if let Err(e) = writer.send(line).await {
                        warn!(error = %e, "write error");
                        break;
                    }
                }
            }
        }

        // Cleanup runs exactly once per connection; unregister is
        // idempotent so racing with anything else here is safe.
        if let Some(handle) = handle.take() {
            if let Some(session) = self.registry.unregister(&handle) {
                info!(%handle, connected_at = %session.connected_at(), "session closed");
            }
        }

        Ok(())
    }
}
