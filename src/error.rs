//! Unified error handling for chatwaved.
//!
//! Command handling surfaces every user-facing failure as a `HandlerError`
//! that converts to a one-line wire reply. Errors that close the session
//! (LOGOUT, transport failure) convert to no reply at all.

use chatwave_proto::reply;
use thiserror::Error;

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    // AuthError: recovered locally, reply sent.
    #[error("login required")]
    LoginRequired,

    #[error("already logged in")]
    AlreadyLoggedIn,

    #[error("handle in use: {0}")]
    UsernameInUse(String),

    // RoutingError: recovered locally, reply sent, session unaffected.
    #[error("recipient offline: {0}")]
    RecipientOffline(String),

    #[error("group exists: {0}")]
    GroupExists(String),

    #[error("not enough valid members")]
    InvalidMembers,

    #[error("no such group: {0}")]
    NoSuchGroup(String),

    #[error("not a member of {0}")]
    NotAMember(String),

    // ProtocolError: recovered locally, reply sent.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    /// Session requested termination (LOGOUT). No reply; the connection
    /// unregisters and closes.
    #[error("session closed")]
    Quit,
}

impl HandlerError {
    /// Static error code for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoginRequired => "login_required",
            Self::AlreadyLoggedIn => "already_logged_in",
            Self::UsernameInUse(_) => "username_in_use",
            Self::RecipientOffline(_) => "recipient_offline",
            Self::GroupExists(_) => "group_exists",
            Self::InvalidMembers => "invalid_members",
            Self::NoSuchGroup(_) => "no_such_group",
            Self::NotAMember(_) => "not_a_member",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Usage(_) => "usage",
            Self::Quit => "quit",
        }
    }

    /// Convert to the wire error reply, or `None` for errors that close
    /// the session instead of answering.
    pub fn to_reply(&self) -> Option<String> {
        let line = match self {
            Self::LoginRequired => reply::err_login_required(),
            Self::AlreadyLoggedIn => reply::err_already_logged_in(),
            Self::UsernameInUse(_) => reply::err_username_in_use(),
            Self::RecipientOffline(_) => reply::err_recipient_offline(),
            Self::GroupExists(_) => reply::err_group_exists(),
            Self::InvalidMembers => reply::err_invalid_members(),
            Self::NoSuchGroup(_) => reply::err_no_such_group(),
            Self::NotAMember(_) => reply::err_not_a_member(),
            Self::UnknownCommand(_) => reply::err_unknown_command(),
            Self::Usage(usage) => reply::err_usage(usage),
            Self::Quit => return None,
        };
        Some(line)
    }
}

/// Result type for command handlers; `Ok` carries the success reply line.
pub type HandlerResult = Result<String, HandlerError>;
