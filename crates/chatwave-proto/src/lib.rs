//! Wire protocol for the ChatWave chat server.
//!
//! The protocol is line-oriented text: clients send one command per
//! CRLF-terminated UTF-8 line, the server answers with one reply line per
//! command and pushes asynchronous notification lines for incoming
//! messages. This crate owns everything that touches the wire format:
//!
//! - [`line::LineCodec`]: a tokio codec framing the byte stream into lines.
//! - [`command`]: the client command grammar (`LOGIN`, `MSG`, ...).
//! - [`reply`]: formatting of server replies and push notifications.
//!
//! Server semantics (who is logged in, who is in which group) live in the
//! server crate; nothing here holds state.

pub mod command;
pub mod error;
pub mod line;
pub mod reply;

pub use command::{Command, CommandError};
pub use error::ProtocolError;
pub use line::LineCodec;

/// Default maximum accepted line length in bytes, terminator included.
pub const DEFAULT_MAX_LINE_LEN: usize = 512;
