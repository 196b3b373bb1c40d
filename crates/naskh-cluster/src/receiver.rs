//! Applying incoming replication commands to the local store

use std::sync::Arc;

use tracing::{info, warn};

use naskh_core::types::{Command, Operation};
use naskh_core::{Error, Result};
use naskh_store::KeyStore;

/// Applies replication commands to this node's store.
///
/// Runs on every node. There is deliberately no role check here: this is the
/// internal channel through which a replica's store is mutated, separate from
/// the public write path and its admission gate. Commands carry no sequence
/// numbers; if two commands for one key arrive out of order, the one applied
/// last wins locally.
pub struct CommandReceiver {
    store: Arc<KeyStore>,
}

impl CommandReceiver {
    pub fn new(store: Arc<KeyStore>) -> Self {
        Self { store }
    }

    /// Apply one command. Each command is independent and atomic against the
    /// local store; applying the same SET twice is a no-op the second time.
    pub fn apply(&self, cmd: &Command) -> Result<()> {
        match cmd.operation {
            Operation::Set => {
                let value = cmd.value.as_deref().ok_or_else(|| {
                    warn!("SET command for {} carried no value", cmd.key);
                    Error::MalformedCommand(format!("SET {} missing value", cmd.key))
                })?;
                self.store.set(&cmd.key, value)?;
                info!("Replicated SET {}", cmd.key);
            }
            Operation::Delete => {
                // Prior existence on this node is irrelevant to the sender.
                self.store.delete(&cmd.key)?;
                info!("Replicated DELETE {}", cmd.key);
            }
        }
        Ok(())
    }
}
