//! Naskh Cluster - primary-to-replica write propagation
//!
//! The primary pushes each committed mutation to every configured replica as
//! a [`Command`] over HTTP. Propagation is at-most-once: one send attempt per
//! peer, a per-send timeout, and no retry, queue, or replication log. A
//! replica that misses a send falls behind until the key is written again.
//!
//! Replicas (and the primary itself) run a [`CommandReceiver`] that applies
//! incoming commands to the local store with no write-admission check; the
//! public role gate applies only to client-issued writes.

mod error;
mod receiver;
mod replicator;

pub use error::{ClusterError, ClusterResult};
pub use receiver::CommandReceiver;
pub use replicator::Replicator;

pub use naskh_core::types::{Command, Operation};
