use anyhow::Context;
use wideql::config::{example_config, save_config};

/// Run the init command to generate an example configuration
pub fn run(output: Option<String>) -> anyhow::Result<()> {
    let config = example_config();

    tracing::info!("✨ Example configuration wires {} fields:", config.field.len());
    for field in &config.field {
        tracing::info!(
            "   • {}.{} -> {} ({} by {})",
            field.type_name,
            field.field_name,
            field.return_type,
            field.family,
            field.gql_attr
        );
    }

    // Output to stdout or file
    if let Some(output_path) = output {
        save_config(&config, &output_path)
            .with_context(|| format!("writing example configuration to {}", output_path))?;
        tracing::info!("📝 Generated example configuration: {}", output_path);
        tracing::info!("🚀 Start the server with: wideql serve --config {}", output_path);
    } else {
        let toml_string = toml::to_string_pretty(&config).context("serializing example configuration")?;
        println!("{}", toml_string);
        tracing::info!("💡 Tip: Add --output <file> to save to a file instead of stdout");
    }

    Ok(())
}
