//! Session handles - the registry's view of a live connection.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// The routable half of a session: its authenticated handle and the
/// outbound queue feeding its connection task's write path.
///
/// The connection task owns the socket; everyone else (the router, other
/// sessions' fan-outs) only ever sees this handle. Once registered, the
/// handle string never changes.
#[derive(Debug)]
pub struct SessionHandle {
    handle: String,
    tx: mpsc::Sender<String>,
    connected_at: DateTime<Utc>,
}

impl SessionHandle {
    pub fn new(handle: String, tx: mpsc::Sender<String>) -> Self {
        Self {
            handle,
            tx,
            connected_at: Utc::now(),
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Queue a line for delivery without blocking.
    ///
    /// Fails when the queue is full (peer too slow to drain) or closed
    /// (connection task already gone). Callers treat either as an
    /// unreachable recipient and skip; they never wait.
    pub fn push(&self, line: String) -> Result<(), mpsc::error::TrySendError<String>> {
        self.tx.try_send(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_queues_in_order() {
        let (tx, mut rx) = mpsc::channel(4);
        let session = SessionHandle::new("alice".to_string(), tx);

        session.push("first".to_string()).unwrap();
        session.push("second".to_string()).unwrap();

        assert_eq!(rx.try_recv().unwrap(), "first");
        assert_eq!(rx.try_recv().unwrap(), "second");
    }

    #[test]
    fn push_to_full_queue_fails_without_blocking() {
        let (tx, _rx) = mpsc::channel(1);
        let session = SessionHandle::new("alice".to_string(), tx);

        session.push("one".to_string()).unwrap();
        assert!(matches!(
            session.push("two".to_string()),
            Err(mpsc::error::TrySendError::Full(_))
        ));
    }

    #[test]
    fn push_to_closed_queue_fails() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let session = SessionHandle::new("alice".to_string(), tx);

        assert!(matches!(
            session.push("one".to_string()),
            Err(mpsc::error::TrySendError::Closed(_))
        ));
    }
}
