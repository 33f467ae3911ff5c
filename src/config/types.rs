use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub field: Vec<FieldMetaData>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind the server to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface to bind the server to
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

fn default_port() -> u16 {
    4000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

/// Wide-column store settings
///
/// The store is the in-process `InMemoryStore`; `project_id` and
/// `instance_id` only label it in logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default = "default_instance_id")]
    pub instance_id: String,

    /// Table used by fields that don't name their own
    #[serde(default = "default_table")]
    pub table: String,

    /// JSON seed file loaded into the store when it is opened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<String>,

    /// Load the built-in book/author data set
    #[serde(default)]
    pub demo_data: bool,
}

fn default_instance_id() -> String {
    "bigtable-graphql".to_string()
}

fn default_table() -> String {
    "entity".to_string()
}

/// Resolver tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Lookups slower than this are logged
    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            slow_threshold_ms: default_slow_threshold_ms(),
        }
    }
}

fn default_slow_threshold_ms() -> u64 {
    100
}

/// Static description of one GraphQL field backed by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetaData {
    /// Owning GraphQL type, e.g. "Query" or "Book"
    pub type_name: String,

    /// Field name on the owning type, e.g. "bookById" or "author"
    pub field_name: String,

    /// Column family holding the entity's cells
    pub family: String,

    /// Comma-separated qualifiers to project
    pub qualifiers_csv: String,

    /// Argument (root fields) or parent attribute (nested fields) supplying the row key
    pub gql_attr: String,

    /// GraphQL object type the field resolves to
    pub return_type: String,

    /// Overrides `store.table` for this field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl FieldMetaData {
    /// Qualifiers in declaration order, trimmed and de-duplicated
    pub fn qualifiers(&self) -> IndexSet<String> {
        self.qualifiers_csv
            .split(',')
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validate field configuration
    pub fn validate(&self) -> Result<(), String> {
        for (label, value) in [
            ("field_name", &self.field_name),
            ("family", &self.family),
            ("gql_attr", &self.gql_attr),
        ] {
            if value.trim().is_empty() {
                return Err(format!(
                    "Field '{}.{}' has an empty {}",
                    self.type_name, self.field_name, label
                ));
            }
        }

        for name in [&self.type_name, &self.return_type] {
            if !is_pascal_case(name) {
                return Err(format!(
                    "GraphQL type name '{}' must be alphanumeric and start with an uppercase letter",
                    name
                ));
            }
        }

        if self.qualifiers().is_empty() {
            return Err(format!(
                "Field '{}.{}' must project at least one qualifier",
                self.type_name, self.field_name
            ));
        }

        Ok(())
    }
}

fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_by_id() -> FieldMetaData {
        FieldMetaData {
            type_name: "Query".to_string(),
            field_name: "bookById".to_string(),
            family: "book".to_string(),
            qualifiers_csv: "id,name,pageCount,authorId".to_string(),
            gql_attr: "id".to_string(),
            return_type: "Book".to_string(),
            table: None,
        }
    }

    #[test]
    fn test_field_validation_valid() {
        assert!(book_by_id().validate().is_ok());
    }

    #[test]
    fn test_qualifiers_keep_declaration_order() {
        let field = FieldMetaData {
            qualifiers_csv: " name, pageCount ,,name,authorId ".to_string(),
            ..book_by_id()
        };

        let qualifiers: Vec<String> = field.qualifiers().into_iter().collect();
        assert_eq!(qualifiers, vec!["name", "pageCount", "authorId"]);
    }

    #[test]
    fn test_field_validation_empty_qualifiers() {
        let field = FieldMetaData {
            qualifiers_csv: " , ".to_string(),
            ..book_by_id()
        };

        assert!(field.validate().is_err());
    }

    #[test]
    fn test_field_validation_lowercase_return_type() {
        let field = FieldMetaData {
            return_type: "book".to_string(),
            ..book_by_id()
        };

        assert!(field.validate().is_err());
    }

    #[test]
    fn test_field_validation_empty_gql_attr() {
        let field = FieldMetaData {
            gql_attr: "".to_string(),
            ..book_by_id()
        };

        assert!(field.validate().is_err());
    }
}
