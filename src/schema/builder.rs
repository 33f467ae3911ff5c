/// GraphQL schema builder
///
/// This module provides the `SchemaBuilder` which wires every configured
/// store-backed field into a dynamic GraphQL schema.

use crate::config::{Config, FieldMetaData};
use crate::error::{Result, WideqlError};
use crate::resolver::ResolverFactory;
use crate::schema::resolver::{create_attribute_field, create_store_field, QUERY_TYPE};
use crate::store::StoreClient;

use async_graphql::dynamic::{Object, Schema};
use indexmap::{IndexMap, IndexSet};
use std::time::Duration;

/// Schema builder for store-backed GraphQL fields
pub struct SchemaBuilder {
    factory: ResolverFactory,
}

/// Fields collected for one GraphQL object type
#[derive(Default)]
struct TypeFields<'a> {
    attributes: IndexSet<String>,
    store_fields: Vec<&'a FieldMetaData>,
}

impl SchemaBuilder {
    pub fn new(factory: ResolverFactory) -> Self {
        Self { factory }
    }

    /// Builder sharing `store` with the table and slow threshold from `config`
    pub fn from_config(config: &Config, store: StoreClient) -> Self {
        Self::new(ResolverFactory::new(
            store,
            config.store.table.clone(),
            Duration::from_millis(config.resolver.slow_threshold_ms),
        ))
    }

    /// Build complete GraphQL schema from field metadata
    ///
    /// Every distinct `return_type` becomes an object type exposing the
    /// qualifiers projected into it. Each record then adds a store-backed
    /// field on its `type_name`.
    pub fn build_schema(&self, fields: &[FieldMetaData]) -> Result<Schema> {
        if !fields.iter().any(|f| f.type_name == QUERY_TYPE) {
            return Err(WideqlError::SchemaGeneration(
                "At least one field must be declared on Query".to_string(),
            ));
        }

        let mut types: IndexMap<&str, TypeFields> = IndexMap::new();
        types.insert(QUERY_TYPE, TypeFields::default());

        for field in fields {
            field.validate().map_err(|e| {
                WideqlError::Config(format!(
                    "Invalid field '{}.{}': {}",
                    field.type_name, field.field_name, e
                ))
            })?;

            if field.return_type == QUERY_TYPE {
                return Err(WideqlError::SchemaGeneration(format!(
                    "Field '{}.{}' cannot return the Query type",
                    field.type_name, field.field_name
                )));
            }

            types
                .entry(field.return_type.as_str())
                .or_default()
                .attributes
                .extend(field.qualifiers());
        }

        for field in fields {
            let owner = types.get_mut(field.type_name.as_str()).ok_or_else(|| {
                WideqlError::SchemaGeneration(format!(
                    "Type '{}' of field '{}' is not returned by any field",
                    field.type_name, field.field_name
                ))
            })?;
            owner.store_fields.push(field);
        }

        let mut schema_builder = Schema::build(QUERY_TYPE, None, None);

        for (type_name, type_fields) in types {
            let mut object = Object::new(type_name);

            for qualifier in &type_fields.attributes {
                if type_fields.store_fields.iter().any(|f| &f.field_name == qualifier) {
                    return Err(WideqlError::SchemaGeneration(format!(
                        "Field '{}.{}' clashes with the qualifier of the same name",
                        type_name, qualifier
                    )));
                }
                object = object.field(create_attribute_field(qualifier));
            }

            for field in type_fields.store_fields {
                let resolver = self.factory.for_field(field);
                tracing::info!(
                    "Wiring {}.{} -> {}:{} by {} [{}]",
                    field.type_name,
                    field.field_name,
                    resolver.table_id(),
                    field.family,
                    field.gql_attr,
                    field.qualifiers_csv
                );
                object = object.field(create_store_field(field, resolver));
            }

            schema_builder = schema_builder.register(object);
        }

        let schema = schema_builder.finish().map_err(|e| {
            WideqlError::SchemaGeneration(format!("Failed to build schema: {}", e))
        })?;

        Ok(schema)
    }
}
