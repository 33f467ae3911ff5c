/// GraphQL field resolvers
///
/// This module adapts `RowResolver`s to async-graphql dynamic fields:
/// - Store-backed fields that look up one row per resolution
/// - Attribute fields that read a projected value from the parent entity

use crate::config::FieldMetaData;
use crate::resolver::{ResolutionContext, ResultEntity, RowResolver};

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, ResolverContext, TypeRef};
use async_graphql::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// Name of the root query type
pub const QUERY_TYPE: &str = "Query";

/// Create the store-backed field described by `meta`
///
/// Root fields take the key as a required `ID` argument named after
/// `gql_attr`; nested fields read it from the parent entity.
pub fn create_store_field(meta: &FieldMetaData, resolver: RowResolver) -> Field {
    let resolver = Arc::new(resolver);
    let field_name = meta.field_name.clone();

    let field = Field::new(
        meta.field_name.clone(),
        TypeRef::named(&meta.return_type),
        move |ctx: ResolverContext| {
            let resolver = resolver.clone();
            let field_name = field_name.clone();

            FieldFuture::new(async move {
                let parent = ctx.parent_value.try_downcast_ref::<ResultEntity>().ok();
                let resolution = ResolutionContext {
                    parent,
                    arguments: string_arguments(&ctx),
                };

                let entity = resolver
                    .resolve(&resolution)
                    .await
                    .map_err(|e| format!("Failed to resolve '{}': {}", field_name, e))?;

                Ok(entity.map(FieldValue::owned_any))
            })
        },
    );

    if meta.type_name == QUERY_TYPE {
        field.argument(InputValue::new(
            meta.gql_attr.clone(),
            TypeRef::named_nn(TypeRef::ID),
        ))
    } else {
        field
    }
}

/// Create a nullable `String` field copied from the parent entity
pub fn create_attribute_field(qualifier: &str) -> Field {
    let qualifier_for_closure = qualifier.to_string();

    Field::new(qualifier, TypeRef::named(TypeRef::STRING), move |ctx| {
        let qualifier = qualifier_for_closure.clone();
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<ResultEntity>()?;

            Ok(parent
                .get(&qualifier)
                .map(|value| FieldValue::value(Value::String(value.clone()))))
        })
    })
}

/// Arguments of the field being resolved that can serve as a row key
fn string_arguments(ctx: &ResolverContext<'_>) -> IndexMap<String, String> {
    ctx.args
        .iter()
        .filter_map(|(name, value)| {
            argument_as_key(value.as_value()).map(|key| (name.to_string(), key))
        })
        .collect()
}

/// String form of a scalar argument, as `ID` accepts both strings and integers
fn argument_as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
