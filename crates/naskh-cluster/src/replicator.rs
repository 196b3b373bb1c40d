//! Replication fan-out from the primary to its replicas
//!
//! One send attempt per peer, all peers in parallel, each bounded by its own
//! timeout. Failures are logged and dropped: replication is best-effort
//! propagation of an already-durable local write, never a precondition for
//! that write's success.

use std::time::Duration;

use futures::future::join_all;
use parking_lot::RwLock;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

use naskh_core::types::Command;
use naskh_core::REPLICATE_PATH;

use crate::error::{ClusterError, ClusterResult};

/// Configuration for the replicator's HTTP client.
#[derive(Debug, Clone)]
pub struct ReplicatorConfig {
    /// Per-send request timeout
    pub send_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for ReplicatorConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

/// Broadcaster owned by a primary node. Replicas have none.
pub struct Replicator {
    replica_urls: RwLock<Vec<String>>,
    client: Client,
}

impl Replicator {
    pub fn new(replica_urls: Vec<String>) -> ClusterResult<Self> {
        Self::with_config(replica_urls, ReplicatorConfig::default())
    }

    pub fn with_config(replica_urls: Vec<String>, config: ReplicatorConfig) -> ClusterResult<Self> {
        let client = ClientBuilder::new()
            .timeout(config.send_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| ClusterError::Transport(e.to_string()))?;

        Ok(Self {
            replica_urls: RwLock::new(replica_urls),
            client,
        })
    }

    /// Replace the replica endpoint list. Broadcasts already in flight keep
    /// the snapshot they took.
    pub fn set_replica_urls(&self, urls: Vec<String>) {
        *self.replica_urls.write() = urls;
    }

    /// Copy of the current replica endpoint list.
    pub fn replica_urls(&self) -> Vec<String> {
        self.replica_urls.read().clone()
    }

    /// Propagate a committed set to all replicas.
    pub async fn replicate_set(&self, key: &str, value: &str) {
        self.broadcast(Command::set(key, value)).await;
    }

    /// Propagate a committed delete to all replicas.
    pub async fn replicate_delete(&self, key: &str) {
        self.broadcast(Command::delete(key)).await;
    }

    /// Send `cmd` to every replica concurrently and wait for all attempts to
    /// conclude. Completion does not imply success: per-peer failures were
    /// logged and dropped.
    async fn broadcast(&self, cmd: Command) {
        // Snapshot under the read lock; never hold it across network I/O.
        let urls = self.replica_urls.read().clone();
        if urls.is_empty() {
            return;
        }

        let body = match serde_json::to_vec(&cmd) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize replication command: {}", e);
                return;
            }
        };

        let sends = urls.iter().map(|url| self.send_to_replica(url, &body));
        for (url, result) in urls.iter().zip(join_all(sends).await) {
            match result {
                Ok(()) => debug!("Replicated {:?} {} to {}", cmd.operation, cmd.key, url),
                Err(e) => warn!("Failed to replicate to {}: {}", url, e),
            }
        }
    }

    async fn send_to_replica(&self, replica_url: &str, body: &[u8]) -> ClusterResult<()> {
        let url = format!("{}{}", replica_url.trim_end_matches('/'), REPLICATE_PATH);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClusterError::ReplicaStatus {
                url: replica_url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Replicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replicator")
            .field("replica_urls", &self.replica_urls())
            .finish()
    }
}
