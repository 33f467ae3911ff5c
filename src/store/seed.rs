/// Seed data for the in-memory store
///
/// A seed file lists tables, their column families, and the rows written under
/// each family. Each row is a flat attribute map; the value of `key_attr`
/// becomes the row key and every attribute (the key included) becomes a cell.
use crate::error::{Result, WideqlError};
use crate::store::InMemoryStore;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    pub tables: Vec<TableSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSeed {
    pub name: String,
    pub families: Vec<FamilySeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilySeed {
    pub family: String,

    #[serde(default = "default_key_attr")]
    pub key_attr: String,

    #[serde(default)]
    pub rows: Vec<IndexMap<String, String>>,
}

fn default_key_attr() -> String {
    "id".to_string()
}

/// Read a JSON seed file
pub async fn read_seed_file(path: &str) -> Result<SeedData> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| WideqlError::Config(format!("Failed to read seed file '{}': {}", path, e)))?;

    Ok(serde_json::from_str(&contents)?)
}

/// Create the seeded tables and families, then write every row
pub async fn load_seed(store: &InMemoryStore, seed: &SeedData) -> Result<usize> {
    let mut written = 0;

    for table in &seed.tables {
        let Some(first) = table.families.first() else {
            tracing::warn!("Seed table {} declares no column families, skipping", table.name);
            continue;
        };

        store.create_table(&table.name, &first.family).await;
        for family in table.families.iter().skip(1) {
            store.add_column_family(&table.name, &family.family).await?;
        }

        for family in &table.families {
            for row in &family.rows {
                let key = row.get(&family.key_attr).ok_or_else(|| {
                    WideqlError::Config(format!(
                        "Seed row in {}:{} has no '{}' attribute",
                        table.name, family.family, family.key_attr
                    ))
                })?;

                store.write_row(&table.name, &family.family, key, row).await?;
                tracing::debug!("Seeded {}:{} row {}", table.name, family.family, key);
                written += 1;
            }
        }
    }

    Ok(written)
}

/// Three books and their authors in table `entity`, families `book` and `author`
pub fn demo_data() -> SeedData {
    let rows = |rows: &[&[(&str, &str)]]| -> Vec<IndexMap<String, String>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .collect()
    };

    SeedData {
        tables: vec![TableSeed {
            name: "entity".to_string(),
            families: vec![
                FamilySeed {
                    family: "book".to_string(),
                    key_attr: default_key_attr(),
                    rows: rows(&[
                        &[
                            ("id", "book-1"),
                            ("name", "Harry Potter and the Philosopher's Stone"),
                            ("pageCount", "223"),
                            ("authorId", "author-1"),
                        ],
                        &[
                            ("id", "book-2"),
                            ("name", "Moby Dick"),
                            ("pageCount", "635"),
                            ("authorId", "author-2"),
                        ],
                        &[
                            ("id", "book-3"),
                            ("name", "Interview with the vampire"),
                            ("pageCount", "371"),
                            ("authorId", "author-3"),
                        ],
                    ]),
                },
                FamilySeed {
                    family: "author".to_string(),
                    key_attr: default_key_attr(),
                    rows: rows(&[
                        &[("id", "author-1"), ("firstName", "Joanne"), ("lastName", "Rowling")],
                        &[("id", "author-2"), ("firstName", "Herman"), ("lastName", "Melville")],
                        &[("id", "author-3"), ("firstName", "Anne"), ("lastName", "Rice")],
                    ]),
                },
            ],
        }],
    }
}
