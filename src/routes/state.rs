use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::StoreSummary,
    store::StoreSnapshot,
};

/// Shared application state
///
/// Requests clone the current `Arc<StoreSnapshot>` and never hold the lock
/// while scoring. A reload builds the next snapshot off-lock and swaps it in.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    snapshot: Arc<RwLock<Arc<StoreSnapshot>>>,
    reload_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, snapshot: StoreSnapshot) -> Self {
        Self {
            config: Arc::new(config),
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            reload_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The snapshot requests should be served from right now
    pub async fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Re-reads the configured data files and swaps the result in.
    ///
    /// Reloads are serialised and never retrain factors. On failure the
    /// current snapshot stays in place.
    pub async fn reload(&self) -> AppResult<StoreSummary> {
        let _guard = self.reload_lock.lock().await;
        tracing::info!("Reloading stores");

        let config = self.config.clone();
        let current = self.snapshot().await;
        let fresh = tokio::task::spawn_blocking(move || StoreSnapshot::reload(&config, &current))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;
        let summary = fresh.summary();

        *self.snapshot.write().await = Arc::new(fresh);

        tracing::info!(movies = summary.movies, embeddings = summary.embeddings, "Stores swapped");
        Ok(summary)
    }
}
