/// Wide-column store access
///
/// The resolvers only need a single operation from the store: read one row by
/// its exact key. `RowStore` is that seam; `StoreClient` owns a shared
/// implementation and its open/close lifecycle.

mod client;
mod memory;
pub mod seed;

pub use client::StoreClient;
pub use memory::InMemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// A single cell of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub family: String,
    pub qualifier: String,
    pub value: String,
}

impl Cell {
    pub fn new(family: impl Into<String>, qualifier: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
        }
    }
}

/// A row addressed by one key, holding cells across any number of families
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub cells: Vec<Cell>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Column family '{family}' not found in table '{table}'")]
    FamilyNotFound { table: String, family: String },

    #[error("Store client is closed")]
    Closed,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Point-lookup access to a wide-column store
///
/// Implementations must allow concurrent reads through a shared reference.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Read a single row by exact key. A missing row is `Ok(None)`, not an error.
    async fn read_row(&self, table_id: &str, key: &str) -> Result<Option<Row>, StoreError>;

    /// Release any connections held by the store
    async fn close(&self) {}
}
