use anyhow::Context;
use wideql::config::load_config;
use wideql::schema::SchemaBuilder;
use wideql::store::StoreClient;

/// Run the serve command to start the GraphQL server
pub async fn run(config_path: String, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("📖 Loading configuration from {}", config_path);

    let config = load_config(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path))?;

    let server_port = port.unwrap_or(config.server.port);

    let store = StoreClient::open(&config.store)
        .await
        .context("opening store client")?;

    tracing::info!("🔧 Wiring {} store-backed fields...", config.field.len());

    let served = serve_schema(&config, store.clone(), server_port).await;

    // The store is released whether or not the server exited cleanly
    store.close().await;

    served
}

async fn serve_schema(
    config: &wideql::Config,
    store: StoreClient,
    port: u16,
) -> anyhow::Result<()> {
    let schema = SchemaBuilder::from_config(config, store)
        .build_schema(&config.field)
        .context("building GraphQL schema")?;

    tracing::info!("✅ Schema built successfully");
    tracing::info!("🚀 GraphQL server running on http://{}:{}", config.server.bind, port);
    tracing::info!("📊 Playground: http://localhost:{}/graphql", port);
    tracing::info!("💡 Press Ctrl+C to stop the server");

    wideql::server::serve(schema, &config.server.bind, port, shutdown_signal()).await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
