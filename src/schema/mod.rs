/// GraphQL schema wiring for store-backed fields
///
/// This module turns field metadata into a dynamic schema, attaching one
/// single-row resolver to every configured field.

mod builder;
mod resolver;

pub use builder::SchemaBuilder;
pub use resolver::{create_attribute_field, create_store_field, QUERY_TYPE};
