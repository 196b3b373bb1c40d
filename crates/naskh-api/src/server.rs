//! Naskh HTTP server

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use naskh_cluster::{CommandReceiver, Replicator};
use naskh_core::{NodeConfig, Result};
use naskh_store::KeyStore;

use crate::routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<NodeConfig>,
    pub store: Arc<KeyStore>,
    /// Present only on the primary; replicas never push.
    pub replicator: Option<Arc<Replicator>>,
    pub receiver: Arc<CommandReceiver>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: NodeConfig) -> Result<Self> {
        let store = Arc::new(KeyStore::open(&config.data_dir)?);

        let replicator = if config.is_primary() {
            let replicator = Replicator::new(config.replica_urls.clone())
                .map_err(|e| naskh_core::Error::Other(e.into()))?;
            info!("Replica URLs: {:?}", config.replica_urls);
            Some(Arc::new(replicator))
        } else {
            None
        };

        let receiver = Arc::new(CommandReceiver::new(Arc::clone(&store)));

        Ok(Self {
            config: Arc::new(config),
            store,
            replicator,
            receiver,
            start_time: Instant::now(),
        })
    }
}

/// Naskh node server
pub struct Server {
    config: NodeConfig,
}

impl Server {
    pub fn new(config: NodeConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting naskh on {}", naskh_core::local_hostname());
        info!("Role: {}", self.config.role);
        info!("Port: {}", self.config.port);
        info!("Data directory: {:?}", self.config.data_dir);

        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let state = AppState::new(self.config)?;
        let app = create_router(state);

        let listener = TcpListener::bind(&addr).await?;
        info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Build the application router over the given state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // KV operations
        .route(
            "/kv",
            get(routes::list_keys)
                .put(routes::put_no_key)
                .delete(routes::delete_no_key),
        )
        .route(
            "/kv/{key}",
            get(routes::get_key)
                .put(routes::put_key)
                .delete(routes::delete_key),
        )
        // Health endpoints
        .route("/health", get(routes::health))
        .route("/ready", get(routes::ready))
        .route("/role", get(routes::role))
        // Internal replication endpoints
        .route(naskh_core::REPLICATE_PATH, post(routes::replicate))
        .route("/internal/replicas", put(routes::set_replicas))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutting down server...");
}
