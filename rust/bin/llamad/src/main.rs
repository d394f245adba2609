//! `llamad`: local entity server.
//!
//! Usage:
//!   llamad [--listen <addr>] [--seed <file.json>]
//!
//! The seed file maps collection names to arrays of records:
//! `{"llamas": [{"name": "Dolly", ...}]}`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tracing::info;

use llamad::{build_router, EntityStore};

/// In-memory entity server.
#[derive(Parser, Debug)]
#[command(name = "llamad", about = "In-memory entity collection server")]
struct Cli {
    /// Listen address.
    #[arg(long = "listen", default_value = "127.0.0.1:8080")]
    listen: String,

    /// JSON file of records to preload, keyed by collection.
    #[arg(long = "seed")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(EntityStore::new());

    if let Some(path) = &cli.seed {
        seed(&store, path)?;
    }

    let app = build_router(store);
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Entity server listening on http://{}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}

fn seed(store: &EntityStore, path: &PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("invalid seed file {}: {}", path.display(), e))?;
    let Value::Object(collections) = doc else {
        anyhow::bail!("seed file {} must be a JSON object", path.display());
    };

    for (collection, records) in collections {
        let Value::Array(records) = records else {
            anyhow::bail!("seed collection '{}' must be an array", collection);
        };
        let count = store.seed(&collection, records)?;
        info!("Seeded {} record(s) into {}", count, collection);
    }
    Ok(())
}
