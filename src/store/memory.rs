use super::{Cell, Row, RowStore, StoreError};

use async_trait::async_trait;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-process wide-column store
///
/// Tables declare their column families up front; rows are sparse maps of
/// `(family, qualifier) -> value` kept in write order.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    closed: AtomicBool,
}

#[derive(Default)]
struct Table {
    families: IndexSet<String>,
    rows: HashMap<String, IndexMap<(String, String), String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `table_id` with one column family. Existing tables are left untouched.
    pub async fn create_table(&self, table_id: &str, family: &str) {
        let mut tables = self.tables.write().await;
        if tables.contains_key(table_id) {
            tracing::warn!("Table {} already exists", table_id);
            return;
        }

        tracing::info!("Creating table: {}", table_id);
        let mut table = Table::default();
        table.families.insert(family.to_string());
        tables.insert(table_id.to_string(), table);
    }

    /// Declare another column family on an existing table
    pub async fn add_column_family(&self, table_id: &str, family: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_id)
            .ok_or_else(|| StoreError::TableNotFound(table_id.to_string()))?;

        tracing::info!("Creating family {} in table {}", family, table_id);
        table.families.insert(family.to_string());
        Ok(())
    }

    /// Set one cell per entry of `values` under `family` in row `key`
    pub async fn write_row(
        &self,
        table_id: &str,
        family: &str,
        key: &str,
        values: &IndexMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_id)
            .ok_or_else(|| StoreError::TableNotFound(table_id.to_string()))?;

        if !table.families.contains(family) {
            return Err(StoreError::FamilyNotFound {
                table: table_id.to_string(),
                family: family.to_string(),
            });
        }

        let row = table.rows.entry(key.to_string()).or_default();
        for (qualifier, value) in values {
            row.insert((family.to_string(), qualifier.clone()), value.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for InMemoryStore {
    async fn read_row(&self, table_id: &str, key: &str) -> Result<Option<Row>, StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }

        let tables = self.tables.read().await;
        let table = tables
            .get(table_id)
            .ok_or_else(|| StoreError::TableNotFound(table_id.to_string()))?;

        Ok(table.rows.get(key).map(|cells| Row {
            key: key.to_string(),
            cells: cells
                .iter()
                .map(|((family, qualifier), value)| Cell::new(family, qualifier, value))
                .collect(),
        }))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_write_then_read_row() {
        let store = InMemoryStore::new();
        store.create_table("entity", "book").await;
        store.add_column_family("entity", "author").await.unwrap();

        let book = values(&[("name", "Moby Dick"), ("pageCount", "635")]);
        store
            .write_row("entity", "book", "book-2", &book)
            .await
            .unwrap();
        let author = values(&[("firstName", "Herman")]);
        store
            .write_row("entity", "author", "book-2", &author)
            .await
            .unwrap();

        let row = store.read_row("entity", "book-2").await.unwrap().unwrap();
        assert_eq!(row.key, "book-2");
        assert_eq!(
            row.cells,
            vec![
                Cell::new("book", "name", "Moby Dick"),
                Cell::new("book", "pageCount", "635"),
                Cell::new("author", "firstName", "Herman"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_row_is_none() {
        let store = InMemoryStore::new();
        store.create_table("entity", "book").await;

        assert_eq!(store.read_row("entity", "book-999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_table_is_error() {
        let store = InMemoryStore::new();

        let result = store.read_row("nope", "book-1").await;
        assert_eq!(result, Err(StoreError::TableNotFound("nope".to_string())));
    }

    #[tokio::test]
    async fn test_write_to_undeclared_family() {
        let store = InMemoryStore::new();
        store.create_table("entity", "book").await;

        let cells = values(&[("firstName", "Anne")]);
        let result = store
            .write_row("entity", "author", "author-3", &cells)
            .await;
        assert!(matches!(result, Err(StoreError::FamilyNotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_table_twice_keeps_rows() {
        let store = InMemoryStore::new();
        store.create_table("entity", "book").await;
        let cells = values(&[("name", "Moby Dick")]);
        store
            .write_row("entity", "book", "book-2", &cells)
            .await
            .unwrap();

        store.create_table("entity", "book").await;

        assert!(store.read_row("entity", "book-2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_read_after_close() {
        let store = InMemoryStore::new();
        store.create_table("entity", "book").await;
        store.close().await;

        assert_eq!(store.read_row("entity", "book-1").await, Err(StoreError::Closed));
    }
}
