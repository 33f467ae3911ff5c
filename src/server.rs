/// HTTP surface for the GraphQL schema

use crate::error::{Result, WideqlError};

use async_graphql::dynamic::Schema;
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use axum::extract::State;
use axum::response::Html;
use axum::{routing::get, Json, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Routes: `POST /graphql`, `GET /graphql` (playground), `GET /health`
pub fn router(schema: Schema) -> Router {
    let schema = Arc::new(schema);

    Router::new()
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        .route("/health", get(health_check))
        .with_state(schema)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

/// Serve `schema` on `bind:port` until `shutdown` completes
pub async fn serve(
    schema: Schema,
    bind: &str,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| WideqlError::Config(format!("Invalid bind address '{}:{}': {}", bind, port, e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        WideqlError::Config(format!("Failed to bind to port {}: {}. Port may be in use.", port, e))
    })?;

    axum::serve(listener, router(schema))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| WideqlError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

async fn graphql_handler(
    State(schema): State<Arc<Schema>>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(request).await)
}

async fn graphql_playground() -> Html<String> {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

async fn health_check() -> &'static str {
    "OK"
}
