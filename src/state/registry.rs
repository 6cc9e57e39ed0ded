//! The registry - single source of truth for routing decisions.
//!
//! Two concurrent maps: handle -> session and group name -> member set.
//! These are the only shared mutable state in the server; every mutation
//! is atomic per map entry via dashmap, and readers get snapshots that
//! may be stale by the time they are used. The router compensates by
//! treating every post-lookup write as independently failable.

use crate::config::PolicyConfig;
use crate::state::SessionHandle;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Group creation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupCreateError {
    #[error("group name already taken")]
    NameTaken,

    #[error("not enough valid members")]
    NotEnoughMembers,
}

/// Concurrent user and group registry.
pub struct Registry {
    users: DashMap<String, Arc<SessionHandle>>,
    groups: DashMap<String, HashSet<String>>,
    policy: PolicyConfig,
}

impl Registry {
    pub fn new(policy: PolicyConfig) -> Self {
        Self {
            users: DashMap::new(),
            groups: DashMap::new(),
            policy,
        }
    }

    /// Claim `handle` for `session`. Returns false without mutation if the
    /// handle is already taken; under concurrent attempts exactly one
    /// caller wins.
    pub fn register(&self, handle: &str, session: Arc<SessionHandle>) -> bool {
        match self.users.entry(handle.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(session);
                true
            }
        }
    }

    /// Release `handle` and prune it from every group's member set.
    /// Returns the removed session; `None` makes a repeated unregister a
    /// no-op.
    pub fn unregister(&self, handle: &str) -> Option<Arc<SessionHandle>> {
        let (_, session) = self.users.remove(handle)?;
        for mut group in self.groups.iter_mut() {
            group.value_mut().remove(handle);
        }
        debug!(%handle, "handle released");
        Some(session)
    }

    /// Current session for `handle`, if connected. The result may be stale
    /// by the time it is used; writes to it must tolerate failure.
    pub fn lookup(&self, handle: &str) -> Option<Arc<SessionHandle>> {
        self.users.get(handle).map(|entry| Arc::clone(entry.value()))
    }

    pub fn is_registered(&self, handle: &str) -> bool {
        self.users.contains_key(handle)
    }

    /// Create a group from the requested member handles.
    ///
    /// Requested handles that are not currently registered (and the
    /// creator's own handle) are dropped from the list. If fewer than the
    /// policy minimum remain the group is not created. The creator is
    /// always a member of a created group. First writer wins on the name.
    ///
    /// Returns the stored member set, creator included.
    pub fn create_group(
        &self,
        name: &str,
        creator: &str,
        requested: &[String],
    ) -> Result<HashSet<String>, GroupCreateError> {
        // Reserve the name before validating members. Holding the entry
        // pins the group's shard, so a concurrent unregister either
        // removes the handle from `users` before our check (and we prune
        // it here) or blocks its own prune sweep until the insert is
        // visible (and removes it there). Validating first would leave a
        // window where a stored member is already disconnected.
        match self.groups.entry(name.to_string()) {
            Entry::Occupied(_) => Err(GroupCreateError::NameTaken),
            Entry::Vacant(entry) => {
                let mut members: HashSet<String> = HashSet::new();
                for handle in requested {
                    if handle == creator {
                        continue;
                    }
                    if self.users.contains_key(handle) {
                        members.insert(handle.clone());
                    } else {
                        debug!(group = %name, %handle, "skipping unknown member");
                    }
                }

                if members.len() < self.policy.min_members_besides_creator {
                    return Err(GroupCreateError::NotEnoughMembers);
                }
                members.insert(creator.to_string());

                entry.insert(members.clone());
                Ok(members)
            }
        }
    }

    /// Snapshot of a group's member set, or `None` if the group does not
    /// exist.
    pub fn group_members(&self, name: &str) -> Option<HashSet<String>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    /// Sorted snapshot of all connected handles.
    pub fn all_handles(&self) -> Vec<String> {
        let mut handles: Vec<String> = self.users.iter().map(|e| e.key().clone()).collect();
        handles.sort();
        handles
    }

    /// Sorted snapshot of all group names.
    pub fn all_group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}
