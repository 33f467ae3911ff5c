use anyhow::Context;
use wideql::config::load_config;
use wideql::store::StoreClient;

/// Run the lookup command: read one row and print every cell
pub async fn run(config_path: String, key: String, table: Option<String>) -> anyhow::Result<()> {
    let config = load_config(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path))?;
    let table = table.unwrap_or_else(|| config.store.table.clone());

    let store = StoreClient::open(&config.store)
        .await
        .context("opening store client")?;
    let row = store.read_row(&table, &key).await;
    store.close().await;

    match row.with_context(|| format!("reading {} from {}", key, table))? {
        Some(row) => {
            println!("Row: {}", row.key);
            for cell in &row.cells {
                println!("  {}:{} = {}", cell.family, cell.qualifier, cell.value);
            }
        }
        None => {
            tracing::warn!("No row {} in table {}", key, table);
        }
    }

    Ok(())
}
