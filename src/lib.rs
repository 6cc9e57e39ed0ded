//! chatwaved - ChatWave Daemon.
//!
//! A real-time text chat server: clients connect over TCP, claim a unique
//! handle, and exchange private and group messages routed entirely
//! in-process. Exposed as a library so integration tests (and embedders)
//! can run the server in-process on an ephemeral port.

pub mod config;
pub mod error;
pub mod handlers;
pub mod journal;
pub mod net;
pub mod routing;
pub mod state;
