//! TrendLens server - REST API over the retail analytics engine.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use trendlens::api::{self, AppState};
use trendlens::{catalog, data};

/// TrendLens server - answers catalog questions over a retail dataset
#[derive(Parser, Debug)]
#[command(name = "trendlens-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dataset to serve (.csv, .json or .parquet)
    #[arg(short, long, env = "TRENDLENS_DATA")]
    data: PathBuf,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1", env = "TRENDLENS_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "TRENDLENS_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // No dataset, no traffic.
    let dataset = data::load_file(&args.data)
        .with_context(|| format!("loading dataset {}", args.data.display()))?;

    let state = Arc::new(AppState::new(Arc::new(dataset)));
    catalog::validate(&state.engine).context("validating question catalog")?;
    log::info!(
        "Catalog validated: {} categories, {} operations",
        catalog::CATEGORIES.len(),
        state.engine.names().count()
    );

    let app = api::router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    log::info!("TrendLens server listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
