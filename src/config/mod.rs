mod types;

pub use types::{Config, FieldMetaData, ResolverConfig, ServerConfig, StoreConfig};

use crate::error::{Result, WideqlError};
use std::collections::HashSet;
use std::fs;

/// Prefix for environment overrides, e.g. `WIDEQL__RESOLVER__SLOW_THRESHOLD_MS=250`
pub const ENV_PREFIX: &str = "WIDEQL";

/// Load configuration from a TOML file, applying `WIDEQL__*` environment overrides
pub fn load_config(path: &str) -> Result<Config> {
    load_config_with_env(path, ENV_PREFIX)
}

fn load_config_with_env(path: &str, env_prefix: &str) -> Result<Config> {
    let config: Config = ::config::Config::builder()
        .add_source(::config::File::new(path, ::config::FileFormat::Toml))
        .add_source(
            ::config::Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| WideqlError::Config(format!("Failed to read config file '{}': {}", path, e)))?
        .try_deserialize()?;

    validate_config(&config)?;

    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &Config, path: &str) -> Result<()> {
    validate_config(config)?;

    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string)
        .map_err(|e| WideqlError::Config(format!("Failed to write config file '{}': {}", path, e)))?;

    Ok(())
}

/// Check every field record, rejecting duplicate `type_name.field_name` pairs
/// and store fields that share a name with a qualifier projected into their type
pub fn validate_config(config: &Config) -> Result<()> {
    if config.store.table.trim().is_empty() {
        return Err(WideqlError::Config("store.table must not be empty".to_string()));
    }

    let mut seen = HashSet::new();
    for field in &config.field {
        field.validate().map_err(WideqlError::Config)?;

        if !seen.insert((field.type_name.as_str(), field.field_name.as_str())) {
            return Err(WideqlError::Config(format!(
                "Field '{}.{}' is configured more than once",
                field.type_name, field.field_name
            )));
        }
    }

    if let Some((type_name, name)) = shadowed_qualifier(&config.field) {
        return Err(WideqlError::Config(format!(
            "Field '{}.{}' clashes with the qualifier '{}' projected into {}",
            type_name, name, name, type_name
        )));
    }

    Ok(())
}

/// First store field whose name is also a qualifier projected into its owning type
pub fn shadowed_qualifier(fields: &[FieldMetaData]) -> Option<(&str, &str)> {
    fields.iter().find_map(|owner| {
        let clash = fields
            .iter()
            .filter(|f| f.return_type == owner.type_name)
            .any(|f| f.qualifiers().contains(&owner.field_name));
        clash.then_some((owner.type_name.as_str(), owner.field_name.as_str()))
    })
}

/// Configuration wired to the built-in book/author data set
pub fn example_config() -> Config {
    let field = |type_name: &str, field_name: &str, family: &str, qualifiers: &str, gql_attr: &str, return_type: &str| {
        FieldMetaData {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
            family: family.to_string(),
            qualifiers_csv: qualifiers.to_string(),
            gql_attr: gql_attr.to_string(),
            return_type: return_type.to_string(),
            table: None,
        }
    };

    Config {
        server: ServerConfig::default(),
        store: StoreConfig {
            project_id: None,
            instance_id: "bigtable-graphql".to_string(),
            table: "entity".to_string(),
            seed_path: None,
            demo_data: true,
        },
        resolver: ResolverConfig::default(),
        field: vec![
            field("Query", "bookById", "book", "id,name,pageCount,authorId", "id", "Book"),
            field("Query", "authorById", "author", "id,firstName,lastName", "id", "Author"),
            field("Book", "author", "author", "id,firstName,lastName", "authorId", "Author"),
        ],
    }
}
