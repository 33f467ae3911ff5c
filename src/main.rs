use clap::{Parser, Subcommand};

mod cli;

#[derive(Parser)]
#[command(name = "wideql")]
#[command(version = "0.1.0")]
#[command(about = "Serve GraphQL fields from a wide-column store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an example configuration wired to the built-in book/author data
    Init {
        /// Output config file path (if not specified, outputs to stdout)
        #[arg(long)]
        output: Option<String>,
    },

    /// Start GraphQL server
    Serve {
        /// Config file path
        #[arg(long, default_value = "wideql.toml")]
        config: String,

        /// Server port (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Read a single row and print its cells
    Lookup {
        /// Config file path
        #[arg(long, default_value = "wideql.toml")]
        config: String,

        /// Row key
        #[arg(long)]
        key: String,

        /// Table to read (defaults to store.table)
        #[arg(long)]
        table: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => {
            cli::init::run(output)?;
        }
        Commands::Serve { config, port } => {
            cli::serve::run(config, port).await?;
        }
        Commands::Lookup { config, key, table } => {
            cli::lookup::run(config, key, table).await?;
        }
    }

    Ok(())
}
