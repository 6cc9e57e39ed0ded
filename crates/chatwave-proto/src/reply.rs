//! Server reply and notification formatting.
//!
//! Every user-visible line the server emits is built here, as a pure
//! function of its inputs, so the server crate never concatenates wire
//! strings by hand and tests can assert on exact lines. Terminators are
//! the codec's concern; these return bare lines.

/// Banner pushed on accept, before any command.
pub fn welcome() -> String {
    "WELCOME: please LOGIN <handle>".to_string()
}

pub fn ok_login(handle: &str) -> String {
    format!("OK LOGIN {handle}")
}

pub fn err_username_in_use() -> String {
    "ERROR username in use".to_string()
}

pub fn err_already_logged_in() -> String {
    "ERROR already logged in".to_string()
}

pub fn err_login_required() -> String {
    "ERROR login required".to_string()
}

pub fn sent_to(to: &str) -> String {
    format!("SENT to {to}")
}

pub fn err_recipient_offline() -> String {
    "ERROR recipient offline".to_string()
}

pub fn ok_group_created() -> String {
    "OK group created".to_string()
}

pub fn err_group_exists() -> String {
    "ERROR group exists".to_string()
}

pub fn err_invalid_members() -> String {
    "ERROR invalid members".to_string()
}

pub fn sent_group(group: &str, recipients: usize) -> String {
    format!("SENT GROUP {group} ({recipients} recipients)")
}

pub fn err_no_such_group() -> String {
    "ERROR no such group".to_string()
}

pub fn err_not_a_member() -> String {
    "ERROR not a member".to_string()
}

/// `USERS <csv>` - handles are sorted by the caller for stable output.
/// An empty list yields the bare verb, never a trailing space.
pub fn users(handles: &[String]) -> String {
    if handles.is_empty() {
        "USERS".to_string()
    } else {
        format!("USERS {}", handles.join(","))
    }
}

pub fn groups(names: &[String]) -> String {
    if names.is_empty() {
        "GROUPS".to_string()
    } else {
        format!("GROUPS {}", names.join(","))
    }
}

pub fn members(group: &str, handles: &[String]) -> String {
    if handles.is_empty() {
        format!("MEMBERS {group}")
    } else {
        format!("MEMBERS {group} {}", handles.join(","))
    }
}

pub fn err_unknown_command() -> String {
    "ERROR unknown command".to_string()
}

pub fn err_usage(usage: &str) -> String {
    format!("ERROR usage: {usage}")
}

/// Push notification for a private message.
pub fn private_from(sender: &str, text: &str) -> String {
    format!("PRIVATE FROM {sender}: {text}")
}

/// Push notification for a group message.
pub fn group_from(group: &str, sender: &str, text: &str) -> String {
    format!("GROUP {group} FROM {sender}: {text}")
}
