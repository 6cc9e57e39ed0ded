//! Message routing: private delivery and group fan-out.
//!
//! The router resolves a send request against the registry and writes
//! notification lines into recipient queues. Per-recipient failures are
//! isolated: one unreachable member never aborts delivery to the rest,
//! and never affects the sender's session. Lookups are snapshots; a
//! recipient may disconnect between lookup and write, so every write is
//! treated as independently failable.

use crate::config::PolicyConfig;
use crate::journal::{MessageJournal, RoutedMessage, Target};
use crate::state::Registry;
use chatwave_proto::reply;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a private send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateOutcome {
    Delivered,
    /// Recipient not registered, or its queue was closed/full at write
    /// time. Either way the message went nowhere.
    RecipientOffline,
}

/// Outcome of a group send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOutcome {
    /// Count of recipients actually reached (sender always excluded).
    Delivered(usize),
    NoSuchGroup,
    NotAMember,
}

#[derive(Clone)]
pub struct Router {
    registry: Arc<Registry>,
    journal: Arc<dyn MessageJournal>,
    policy: PolicyConfig,
}

impl Router {
    pub fn new(
        registry: Arc<Registry>,
        journal: Arc<dyn MessageJournal>,
        policy: PolicyConfig,
    ) -> Self {
        Self {
            registry,
            journal,
            policy,
        }
    }

    /// Deliver a private message to `to`, if connected.
    pub fn send_private(&self, from: &str, to: &str, body: &str) -> PrivateOutcome {
        let Some(session) = self.registry.lookup(to) else {
            return PrivateOutcome::RecipientOffline;
        };

        match session.push(reply::private_from(from, body)) {
            Ok(()) => {
                self.record(RoutedMessage::new(from, Target::User(to.to_string()), body));
                PrivateOutcome::Delivered
            }
            Err(e) => {
                // Lost the race with the recipient's disconnect, or its
                // queue is full. Lookup results are stale snapshots.
                warn!(%from, %to, error = %e, "private delivery failed");
                PrivateOutcome::RecipientOffline
            }
        }
    }

    /// Fan a message out to every connected member of `group` except the
    /// sender.
    pub fn send_group(&self, from: &str, group: &str, body: &str) -> GroupOutcome {
        let Some(members) = self.registry.group_members(group) else {
            return GroupOutcome::NoSuchGroup;
        };
        if self.policy.require_sender_membership && !members.contains(from) {
            return GroupOutcome::NotAMember;
        }

        let line = reply::group_from(group, from, body);
        let delivered = self.fanout(from, &members, &line);
        if delivered > 0 {
            self.record(RoutedMessage::new(
                from,
                Target::Group(group.to_string()),
                body,
            ));
        }
        GroupOutcome::Delivered(delivered)
    }

    /// Push a group notification telling members they were added. Runs
    /// through the normal fan-out path, so the same isolation rules apply.
    pub fn notify_group_created(&self, creator: &str, group: &str, members: &HashSet<String>) {
        let line = reply::group_from(group, creator, &format!("you have been added to {group}"));
        self.fanout(creator, members, &line);
    }

    /// Write `line` to every connected member except `from`, skipping
    /// failures. Returns the number of recipients reached.
    fn fanout(&self, from: &str, members: &HashSet<String>, line: &str) -> usize {
        let mut delivered = 0;
        for member in members {
            if member == from {
                continue;
            }
            let Some(session) = self.registry.lookup(member) else {
                debug!(%member, "skipping offline member");
                continue;
            };
            match session.push(line.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(%member, error = %e, "skipping unreachable member");
                }
            }
        }
        delivered
    }

    /// Hand a delivered message to the journal, fire-and-forget.
    fn record(&self, message: RoutedMessage) {
        let journal = Arc::clone(&self.journal);
        tokio::spawn(async move {
            if let Err(e) = journal.record(message).await {
                debug!(error = %e, "journal write failed");
            }
        });
    }
}
