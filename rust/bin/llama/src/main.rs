//! `llama`: command-line client for the llama catalog.
//!
//! Talks to any server exposing the entity API (e.g. `llamad`). Server
//! URLs are kept as named contexts in `~/.llama/config.toml`.

mod commands;
mod config;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use commands::catalog::FieldArgs;
use commands::Output;

/// Llama catalog CLI.
#[derive(Parser, Debug)]
#[command(name = "llama", about = "Llama catalog client", version)]
struct Cli {
    /// Path to client config file (default: ~/.llama/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Server URL, overriding the current context.
    #[arg(long = "server", global = true)]
    server: Option<String>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Table)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List llamas.
    List {
        /// Only favorites.
        #[arg(long)]
        favorites: bool,
    },

    /// Show one llama.
    Show { id: String },

    /// Add a llama. Name, breed and color are required.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit a llama. Unset flags keep their current value.
    Edit {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Toggle a llama's favorite flag.
    Favorite { id: String },

    /// Request deletion (the server keeps the record).
    Delete { id: String },

    /// Manage server contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// List all contexts.
    List,
    /// Create or update a context. Takes its URL from the global `--server`.
    Set { name: String },
    /// Switch the current context.
    Use { name: String },
    /// Delete a context.
    Delete { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);

    match &cli.command {
        Commands::Context { action } => match action {
            ContextAction::List => commands::context::list(&config_path),
            ContextAction::Set { name } => {
                commands::context::set(name, cli.server.as_deref(), &config_path)
            }
            ContextAction::Use { name } => commands::context::use_context(name, &config_path),
            ContextAction::Delete { name } => commands::context::delete(name, &config_path),
        },
        Commands::List { favorites } => {
            let server = resolve_server(&cli, &config_path)?;
            commands::catalog::list(&server, *favorites, cli.output).await
        }
        Commands::Show { id } => {
            let server = resolve_server(&cli, &config_path)?;
            commands::catalog::show(&server, id, cli.output).await
        }
        Commands::Add { fields } => {
            let server = resolve_server(&cli, &config_path)?;
            commands::catalog::add(&server, fields, cli.output).await
        }
        Commands::Edit { id, fields } => {
            let server = resolve_server(&cli, &config_path)?;
            commands::catalog::edit(&server, id, fields, cli.output).await
        }
        Commands::Favorite { id } => {
            let server = resolve_server(&cli, &config_path)?;
            commands::catalog::favorite(&server, id, cli.output).await
        }
        Commands::Delete { id } => {
            let server = resolve_server(&cli, &config_path)?;
            commands::catalog::delete(&server, id).await
        }
    }
}

fn resolve_server(cli: &Cli, config_path: &Path) -> anyhow::Result<String> {
    let server = config::ClientConfig::load(config_path)?.resolve_server(cli.server.as_deref())?;
    tracing::debug!(server = %server, "using server");
    Ok(server)
}
