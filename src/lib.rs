pub mod config;
pub mod error;
pub mod resolver;
pub mod schema;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{Config, FieldMetaData, ResolverConfig, ServerConfig, StoreConfig};
pub use error::{Result, WideqlError};
pub use resolver::{ResolutionContext, ResolverFactory, ResultEntity, RowResolver};
pub use schema::SchemaBuilder;
pub use store::{RowStore, StoreClient, StoreError};
