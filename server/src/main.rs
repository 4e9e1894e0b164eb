use anyhow::{Context, Result};
use catalog_ingest::{open_engine, parse_column_map};
use catalog_server::build_app;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog snapshot (.csv, .json, .jsonl, or a directory of them)
    #[arg(long, env = "CATALOG_PATH", default_value = "./products.csv")]
    catalog: PathBuf,
    /// JSON object mapping canonical fields to source headers
    #[arg(long, env = "COLUMN_MAP_JSON", default_value = "")]
    column_map: String,
    /// JSON file with `stopwords` and `synonyms` replacing the built-in pack
    #[arg(long, env = "LANGUAGE_PACK")]
    language_pack: Option<PathBuf>,
    /// Host to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let overrides = parse_column_map(&args.column_map);
    let engine = open_engine(&args.catalog, &overrides, args.language_pack.as_deref())
        .with_context(|| format!("loading catalog from {}", args.catalog.display()))?;
    let engine = Arc::new(engine);

    // Build before accepting traffic; a failed build is still served as 503s.
    let building = Arc::clone(&engine);
    match tokio::task::spawn_blocking(move || building.initialize()).await? {
        Ok(index) => tracing::info!(products = index.len(), "index ready"),
        Err(err) => tracing::error!(error = %err, "index build failed"),
    }

    let app = build_app(engine);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
