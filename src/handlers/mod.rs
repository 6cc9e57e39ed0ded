//! Command dispatch.
//!
//! The dispatcher maps parsed commands onto registry and router
//! operations and produces exactly one reply line per command (or
//! [`HandlerError::Quit`] to close the session). It also owns the auth
//! state machine: a session is unauthenticated until a successful LOGIN,
//! and every verb except LOGIN and LOGOUT requires authentication.

use crate::error::{HandlerError, HandlerResult};
use crate::routing::{GroupOutcome, PrivateOutcome, Router};
use crate::state::{GroupCreateError, Registry, SessionHandle};
use chatwave_proto::{reply, Command, CommandError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

impl From<CommandError> for HandlerError {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::Unknown(verb) => Self::UnknownCommand(verb),
            CommandError::Usage(usage) => Self::Usage(usage),
        }
    }
}

/// Per-connection dispatch context.
pub struct Context<'a> {
    /// The connection's outbound queue; LOGIN clones it into the
    /// session handle it registers.
    pub outbound: &'a mpsc::Sender<String>,
    /// Authenticated handle. Set exactly once, on successful LOGIN.
    pub handle: &'a mut Option<String>,
}

/// Maps commands to registry/router operations.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    router: Router,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, router: Router) -> Self {
        Self { registry, router }
    }

    /// Parse and dispatch one input line.
    pub fn dispatch_line(&self, ctx: &mut Context<'_>, line: &str) -> HandlerResult {
        let command = Command::parse(line)?;
        self.dispatch(ctx, command)
    }

    /// Dispatch a parsed command, producing the reply line.
    pub fn dispatch(&self, ctx: &mut Context<'_>, command: Command) -> HandlerResult {
        match command {
            Command::Login { handle } => self.login(ctx, handle),
            Command::Logout => Err(HandlerError::Quit),
            Command::Msg { to, text } => {
                let from = authenticated(ctx)?;
                match self.router.send_private(&from, &to, &text) {
                    PrivateOutcome::Delivered => Ok(reply::sent_to(&to)),
                    PrivateOutcome::RecipientOffline => Err(HandlerError::RecipientOffline(to)),
                }
            }
            Command::CreateGroup { name, members } => {
                let from = authenticated(ctx)?;
                self.create_group(&from, name, &members)
            }
            Command::GroupMsg { group, text } => {
                let from = authenticated(ctx)?;
                match self.router.send_group(&from, &group, &text) {
                    GroupOutcome::Delivered(count) => Ok(reply::sent_group(&group, count)),
                    GroupOutcome::NoSuchGroup => Err(HandlerError::NoSuchGroup(group)),
                    GroupOutcome::NotAMember => Err(HandlerError::NotAMember(group)),
                }
            }
            Command::ListUsers => {
                authenticated(ctx)?;
                Ok(reply::users(&self.registry.all_handles()))
            }
            Command::ListGroups => {
                authenticated(ctx)?;
                Ok(reply::groups(&self.registry.all_group_names()))
            }
            Command::GroupMembers { group } => {
                authenticated(ctx)?;
                match self.registry.group_members(&group) {
                    Some(members) => {
                        let mut members: Vec<String> = members.into_iter().collect();
                        members.sort();
                        Ok(reply::members(&group, &members))
                    }
                    None => Err(HandlerError::NoSuchGroup(group)),
                }
            }
        }
    }

    fn create_group(&self, from: &str, name: String, members: &[String]) -> HandlerResult {
        match self.registry.create_group(&name, from, members) {
            Ok(created) => {
                info!(group = %name, creator = %from, size = created.len(), "group created");
                self.router.notify_group_created(from, &name, &created);
                Ok(reply::ok_group_created())
            }
            Err(GroupCreateError::NameTaken) => Err(HandlerError::GroupExists(name)),
            Err(GroupCreateError::NotEnoughMembers) => Err(HandlerError::InvalidMembers),
        }
    }

    fn login(&self, ctx: &mut Context<'_>, handle: String) -> HandlerResult {
        if ctx.handle.is_some() {
            return Err(HandlerError::AlreadyLoggedIn);
        }

        let session = Arc::new(SessionHandle::new(handle.clone(), ctx.outbound.clone()));
        if !self.registry.register(&handle, session) {
            return Err(HandlerError::UsernameInUse(handle));
        }

        info!(%handle, "logged in");
        *ctx.handle = Some(handle.clone());
        Ok(reply::ok_login(&handle))
    }
}

/// The session's authenticated handle, or `LoginRequired`.
fn authenticated(ctx: &Context<'_>) -> Result<String, HandlerError> {
    ctx.handle.clone().ok_or(HandlerError::LoginRequired)
}
