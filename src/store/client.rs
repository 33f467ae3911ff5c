use crate::config::StoreConfig;
use crate::error::Result;
use crate::store::seed::{demo_data, load_seed, read_seed_file};
use crate::store::{InMemoryStore, Row, RowStore, StoreError};

use std::sync::Arc;

/// Shared handle to the store used by every resolver
///
/// Cloning is cheap and all clones talk to the same store. The owner that
/// opened the client is responsible for calling [`StoreClient::close`] on
/// shutdown; reads issued afterwards fail with [`StoreError::Closed`].
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<dyn RowStore>,
}

impl StoreClient {
    /// Wrap an already-connected store
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { inner: store }
    }

    /// Open the store described by `config` and load its seed data
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        tracing::info!(
            "Initialising store for project {} (instance {})",
            config.project_id.as_deref().unwrap_or("-"),
            config.instance_id
        );

        let store = InMemoryStore::new();

        if config.demo_data {
            let rows = load_seed(&store, &demo_data()).await?;
            tracing::info!("Loaded {} demo rows", rows);
        }

        if let Some(path) = &config.seed_path {
            let seed = read_seed_file(path).await?;
            let rows = load_seed(&store, &seed).await?;
            tracing::info!("Loaded {} rows from {}", rows, path);
        }

        Ok(Self::new(Arc::new(store)))
    }

    pub async fn read_row(&self, table_id: &str, key: &str) -> std::result::Result<Option<Row>, StoreError> {
        self.inner.read_row(table_id, key).await
    }

    /// Release the underlying store
    pub async fn close(&self) {
        self.inner.close().await;
        tracing::info!("Store client closed");
    }
}
