//! No-op journal backend.

use super::{MessageJournal, RoutedMessage};
use async_trait::async_trait;

/// Discards every record. Used when no durable log is configured.
pub struct NoOpJournal;

#[async_trait]
impl MessageJournal for NoOpJournal {
    async fn record(&self, _message: RoutedMessage) -> anyhow::Result<()> {
        Ok(())
    }
}
