//! Client command grammar.
//!
//! A command line is the verb as first token (case-insensitive), then the
//! remainder split on single spaces into at most three tokens total, so a
//! message body may itself contain spaces. The whole line is trimmed
//! before parsing; empty lines are the caller's concern (connections skip
//! them without replying).

use thiserror::Error;

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `LOGIN <handle>` - claim a handle for this connection.
    Login { handle: String },
    /// `MSG <to> <text>` - private message to a connected handle.
    Msg { to: String, text: String },
    /// `CREATE_GROUP <name> <m1,m2,...>` - create a named group.
    CreateGroup { name: String, members: Vec<String> },
    /// `GROUP_MSG <group> <text>` - message every member of a group.
    GroupMsg { group: String, text: String },
    /// `LIST_USERS` - list connected handles.
    ListUsers,
    /// `LIST_GROUPS` - list group names.
    ListGroups,
    /// `GROUP_MEMBERS <group>` - list a group's member handles.
    GroupMembers { group: String },
    /// `LOGOUT` - release the handle and close the connection.
    Logout,
}

/// Command parse failures. Both are recoverable: the session replies with
/// an error line and keeps reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    /// Recognized verb with the wrong argument count. Carries the usage
    /// string for the error reply.
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Parse a single trimmed input line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let mut parts = line.splitn(3, ' ');
        let verb = parts.next().unwrap_or("");
        let arg1 = parts.next();
        let arg2 = parts.next();

        match verb.to_ascii_uppercase().as_str() {
            "LOGIN" => match (arg1, arg2) {
                (Some(handle), None) if is_valid_name(handle) => Ok(Self::Login {
                    handle: handle.to_string(),
                }),
                _ => Err(CommandError::Usage("LOGIN <handle>")),
            },
            "MSG" => match (arg1, arg2) {
                (Some(to), Some(text)) if is_valid_name(to) => Ok(Self::Msg {
                    to: to.to_string(),
                    text: text.to_string(),
                }),
                _ => Err(CommandError::Usage("MSG <to> <text>")),
            },
            "CREATE_GROUP" => match (arg1, arg2) {
                (Some(name), Some(csv)) if is_valid_name(name) => Ok(Self::CreateGroup {
                    name: name.to_string(),
                    members: split_csv(csv),
                }),
                _ => Err(CommandError::Usage("CREATE_GROUP <name> <m1,m2,...>")),
            },
            "GROUP_MSG" => match (arg1, arg2) {
                (Some(group), Some(text)) if is_valid_name(group) => Ok(Self::GroupMsg {
                    group: group.to_string(),
                    text: text.to_string(),
                }),
                _ => Err(CommandError::Usage("GROUP_MSG <group> <text>")),
            },
            "LIST_USERS" => match arg1 {
                None => Ok(Self::ListUsers),
                Some(_) => Err(CommandError::Usage("LIST_USERS")),
            },
            "LIST_GROUPS" => match arg1 {
                None => Ok(Self::ListGroups),
                Some(_) => Err(CommandError::Usage("LIST_GROUPS")),
            },
            "GROUP_MEMBERS" => match (arg1, arg2) {
                (Some(group), None) if is_valid_name(group) => Ok(Self::GroupMembers {
                    group: group.to_string(),
                }),
                _ => Err(CommandError::Usage("GROUP_MEMBERS <group>")),
            },
            "LOGOUT" => match arg1 {
                None => Ok(Self::Logout),
                Some(_) => Err(CommandError::Usage("LOGOUT")),
            },
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// The wire verb for this command, for logging.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Login { .. } => "LOGIN",
            Self::Msg { .. } => "MSG",
            Self::CreateGroup { .. } => "CREATE_GROUP",
            Self::GroupMsg { .. } => "GROUP_MSG",
            Self::ListUsers => "LIST_USERS",
            Self::ListGroups => "LIST_GROUPS",
            Self::GroupMembers { .. } => "GROUP_MEMBERS",
            Self::Logout => "LOGOUT",
        }
    }
}

/// Handles and group names: non-empty, no spaces (guaranteed by the token
/// split) and no commas, since commas delimit member lists. Comparison is
/// exact codepoint equality; the server never case-folds.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(',')
}

fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}
