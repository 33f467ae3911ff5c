use crate::config::FieldMetaData;
use crate::resolver::projector::ResultEntity;
use crate::store::{StoreClient, StoreError};

use indexmap::{IndexMap, IndexSet};
use std::time::Duration;

/// Per-request inputs available to a resolver
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext<'a> {
    /// Projected entity of the enclosing object; `None` for root fields
    pub parent: Option<&'a ResultEntity>,

    /// String-valued field arguments
    pub arguments: IndexMap<String, String>,
}

impl<'a> ResolutionContext<'a> {
    pub fn root(arguments: IndexMap<String, String>) -> Self {
        Self {
            parent: None,
            arguments,
        }
    }

    pub fn nested(parent: &'a ResultEntity, arguments: IndexMap<String, String>) -> Self {
        Self {
            parent: Some(parent),
            arguments,
        }
    }

    /// Where the lookup key comes from: the parent entity wins whenever one is present
    pub fn key_source(&self) -> KeySource<'_> {
        match self.parent {
            Some(parent) => KeySource::FromParent(parent),
            None => KeySource::FromArguments(&self.arguments),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum KeySource<'a> {
    FromParent(&'a ResultEntity),
    FromArguments(&'a IndexMap<String, String>),
}

impl<'a> KeySource<'a> {
    pub fn extract(self, attr: &str) -> Option<&'a str> {
        let value = match self {
            KeySource::FromParent(entity) => entity.get(attr),
            KeySource::FromArguments(arguments) => arguments.get(attr),
        };
        value.map(String::as_str)
    }
}

/// Builds [`RowResolver`]s that share one store client and slow-lookup threshold
#[derive(Clone)]
pub struct ResolverFactory {
    store: StoreClient,
    default_table: String,
    slow_threshold: Duration,
}

impl ResolverFactory {
    pub fn new(store: StoreClient, default_table: impl Into<String>, slow_threshold: Duration) -> Self {
        Self {
            store,
            default_table: default_table.into(),
            slow_threshold,
        }
    }

    /// Resolver that reads one row of `table_id` keyed by `source_attr` and
    /// projects `family` cells whose qualifier is in `qualifiers`.
    ///
    /// Nothing touches the store until the resolver is invoked.
    pub fn build_resolver(
        &self,
        table_id: &str,
        family: &str,
        qualifiers: IndexSet<String>,
        source_attr: &str,
    ) -> RowResolver {
        let qualifiers_joined = qualifiers
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");

        RowResolver {
            store: self.store.clone(),
            table_id: table_id.to_string(),
            family: family.to_string(),
            qualifiers,
            qualifiers_joined,
            source_attr: source_attr.to_string(),
            slow_threshold: self.slow_threshold,
        }
    }

    /// Resolver for a configured field, falling back to the default table
    pub fn for_field(&self, field: &FieldMetaData) -> RowResolver {
        let table_id = field.table.as_deref().unwrap_or(&self.default_table);
        self.build_resolver(table_id, &field.family, field.qualifiers(), &field.gql_attr)
    }
}

/// A single-row fetch bound to its table, family, qualifiers and key attribute
///
/// Immutable once built, so one instance can serve any number of concurrent
/// field resolutions.
#[derive(Clone)]
pub struct RowResolver {
    pub(crate) store: StoreClient,
    pub(crate) table_id: String,
    pub(crate) family: String,
    pub(crate) qualifiers: IndexSet<String>,
    pub(crate) qualifiers_joined: String,
    pub(crate) source_attr: String,
    pub(crate) slow_threshold: Duration,
}

impl RowResolver {
    /// Resolve a field: `Ok(None)` when there is no key or no row, the
    /// projected entity otherwise.
    pub async fn resolve(&self, ctx: &ResolutionContext<'_>) -> Result<Option<ResultEntity>, StoreError> {
        let Some(key) = ctx.key_source().extract(&self.source_attr) else {
            tracing::debug!(
                "no value for key attribute {}. table={}, family={}",
                self.source_attr,
                self.table_id,
                self.family
            );
            return Ok(None);
        };

        self.fetch(key).await
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn qualifiers(&self) -> &IndexSet<String> {
        &self.qualifiers
    }

    pub fn source_attr(&self) -> &str {
        &self.source_attr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Cell, Row, RowStore};

    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Echoes the requested key back as an `author` row and counts lookups.
    /// Keys starting with `absent-` have no row.
    #[derive(Default)]
    struct EchoStore {
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl RowStore for EchoStore {
        async fn read_row(&self, _table_id: &str, key: &str) -> Result<Option<Row>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if key.starts_with("absent-") {
                return Ok(None);
            }
            Ok(Some(Row {
                key: key.to_string(),
                cells: vec![Cell::new("author", "id", key)],
            }))
        }
    }

    fn factory(store: Arc<EchoStore>) -> ResolverFactory {
        ResolverFactory::new(StoreClient::new(store), "entity", Duration::from_secs(60))
    }

    fn qualifiers(names: &[&str]) -> IndexSet<String> {
        names.iter().map(|q| q.to_string()).collect()
    }

    fn arguments(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parent_takes_precedence_over_arguments() {
        let parent: ResultEntity = arguments(&[("authorId", "author-2")]);
        let ctx = ResolutionContext::nested(&parent, arguments(&[("authorId", "author-9")]));

        assert_eq!(ctx.key_source().extract("authorId"), Some("author-2"));
    }

    #[test]
    fn test_parent_without_attribute_does_not_fall_back() {
        let parent: ResultEntity = arguments(&[("name", "Moby Dick")]);
        let ctx = ResolutionContext::nested(&parent, arguments(&[("authorId", "author-9")]));

        assert_eq!(ctx.key_source().extract("authorId"), None);
    }

    #[test]
    fn test_arguments_used_without_parent() {
        let ctx = ResolutionContext::root(arguments(&[("id", "book-1")]));

        assert!(matches!(ctx.key_source(), KeySource::FromArguments(_)));
        assert_eq!(ctx.key_source().extract("id"), Some("book-1"));
    }

    #[tokio::test]
    async fn test_missing_key_skips_lookup() {
        let store = Arc::new(EchoStore::default());
        let resolver = factory(store.clone()).build_resolver("entity", "author", qualifiers(&["id"]), "id");

        let result = resolver.resolve(&ResolutionContext::default()).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_build_is_lazy_and_each_call_is_one_lookup() {
        let store = Arc::new(EchoStore::default());
        let resolver = factory(store.clone()).build_resolver("entity", "author", qualifiers(&["id"]), "authorId");
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);

        let parent: ResultEntity = arguments(&[("authorId", "author-2")]);
        let ctx = ResolutionContext::nested(&parent, IndexMap::new());
        let first = resolver.resolve(&ctx).await.unwrap();
        let second = resolver.resolve(&ctx).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.unwrap().get("id").map(String::as_str), Some("author-2"));
        assert_eq!(store.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolutions_match_sequential() {
        let store = Arc::new(EchoStore::default());
        let resolver = factory(store.clone()).build_resolver("entity", "author", qualifiers(&["id"]), "id");

        let keys: Vec<Option<String>> = (0..48)
            .map(|i| match i % 3 {
                0 => Some(format!("author-{}", i)),
                1 => Some(format!("absent-{}", i)),
                _ => None,
            })
            .collect();

        let tasks: Vec<_> = keys
            .iter()
            .cloned()
            .map(|key| {
                let resolver = resolver.clone();
                tokio::spawn(async move {
                    let args = key.map(|k| arguments(&[("id", k.as_str())])).unwrap_or_default();
                    resolver.resolve(&ResolutionContext::root(args)).await
                })
            })
            .collect();

        let mut concurrent = Vec::new();
        for task in tasks {
            concurrent.push(task.await.unwrap().unwrap());
        }

        let with_key = keys.iter().filter(|k| k.is_some()).count();
        assert_eq!(store.lookups.load(Ordering::SeqCst), with_key);

        for (key, result) in keys.iter().zip(&concurrent) {
            let args = key.as_deref().map(|k| arguments(&[("id", k)])).unwrap_or_default();
            let sequential = resolver.resolve(&ResolutionContext::root(args)).await.unwrap();
            assert_eq!(result, &sequential);

            match key.as_deref() {
                Some(k) if k.starts_with("author-") => {
                    assert_eq!(result.as_ref().and_then(|e| e.get("id")).map(String::as_str), Some(k));
                }
                _ => assert_eq!(result, &None),
            }
        }
    }

    #[test]
    fn test_for_field_uses_default_table() {
        let factory = factory(Arc::new(EchoStore::default()));
        let mut field = FieldMetaData {
            type_name: "Book".to_string(),
            field_name: "author".to_string(),
            family: "author".to_string(),
            qualifiers_csv: "firstName, lastName".to_string(),
            gql_attr: "authorId".to_string(),
            return_type: "Author".to_string(),
            table: None,
        };

        let resolver = factory.for_field(&field);
        assert_eq!(resolver.table_id(), "entity");
        assert_eq!(resolver.family(), "author");
        assert_eq!(resolver.source_attr(), "authorId");
        assert_eq!(resolver.qualifiers_joined, "firstName,lastName");

        field.table = Some("people".to_string());
        assert_eq!(factory.for_field(&field).table_id(), "people");
    }
}
