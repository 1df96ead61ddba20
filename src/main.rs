use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fieldview::preview::PreviewSize;

mod cmd;

#[derive(Parser)]
#[command(name = "fieldview")]
#[command(version, about = "Preview entity properties and edit ordered array fields")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Preview size (tiny, small, regular). Overrides fieldview.toml and FIELDVIEW_PREVIEW_SIZE.
    #[arg(long, global = true)]
    pub size: Option<PreviewSize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate a collection schema
    Check {
        /// Path to the collection schema (TOML)
        schema: PathBuf,
    },
    /// Render the properties of an entity
    Preview {
        /// Path to the collection schema (TOML)
        schema: PathBuf,
        /// Path to the entity values (JSON)
        entity: PathBuf,
        /// Only render this property
        #[arg(short, long)]
        property: Option<String>,
        /// JSON fixture of referenced entities, keyed by "path/id"
        #[arg(long)]
        refs: Option<PathBuf>,
        /// Print the rendered outputs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay operations against an array field
    Array {
        /// Path to the collection schema (TOML)
        schema: PathBuf,
        /// Path to the entity values (JSON)
        entity: PathBuf,
        /// The array property to edit
        #[arg(short, long)]
        property: String,
        /// Operations: append, remove:<i>, move:<from>:<to>, resync
        #[arg(long, value_delimiter = ',')]
        ops: Vec<cmd::ArrayOp>,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Create a default fieldview.toml
    Init,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_directive = if verbose {
        "fieldview=debug"
    } else {
        "fieldview=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive.parse()?),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Check { schema } => cmd::cmd_check(schema)?,
        Commands::Preview {
            schema,
            entity,
            property,
            refs,
            json,
        } => {
            let config = cmd::load_config(&cli, &project_dir)?;
            cmd::cmd_preview(
                &config,
                schema,
                entity,
                property.as_deref(),
                refs.as_deref(),
                *json,
            )
            .await?;
        }
        Commands::Array {
            schema,
            entity,
            property,
            ops,
        } => {
            let config = cmd::load_config(&cli, &project_dir)?;
            cmd::cmd_array(&config, schema, entity, property, ops)?;
        }
        Commands::Config { command } => cmd::cmd_config(&project_dir, cli.size, command.clone())?,
    }

    Ok(())
}
