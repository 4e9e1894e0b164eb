use anyhow::{Context, Result};
use catalog_core::request::NumericParam;
use catalog_core::{SearchEngine, SearchRequest};
use catalog_ingest::{open_engine, parse_column_map};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "catalog-search")]
#[command(about = "Inspect and query a product catalog snapshot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Catalog snapshot (.csv, .json, .jsonl, or a directory of them)
    #[arg(long, env = "CATALOG_PATH")]
    input: PathBuf,
    /// JSON object mapping canonical fields to source headers
    #[arg(long, env = "COLUMN_MAP_JSON", default_value = "")]
    column_map: String,
    /// JSON file with `stopwords` and `synonyms` replacing the built-in pack
    #[arg(long, env = "LANGUAGE_PACK")]
    language_pack: Option<PathBuf>,
}

impl CorpusArgs {
    fn open(&self) -> Result<SearchEngine> {
        let overrides = parse_column_map(&self.column_map);
        open_engine(&self.input, &overrides, self.language_pack.as_deref())
            .with_context(|| format!("loading catalog from {}", self.input.display()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load and index the catalog, then print a summary
    Check {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Run one search and print the response as JSON
    Query {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Free-text query
        query: String,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        /// Maximum number of results (capped at 30)
        #[arg(long)]
        limit: Option<usize>,
        /// Include per-result score breakdowns
        #[arg(long, default_value_t = false)]
        debug: bool,
    },
}

#[derive(Serialize)]
struct CheckReport {
    total_products: usize,
    vocabulary_terms: usize,
    categories: Vec<String>,
    index_build_ms: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { corpus } => {
            let engine = corpus.open()?;
            let index = engine.initialize().context("building index")?;
            let report = CheckReport {
                total_products: index.len(),
                vocabulary_terms: index.vocabulary().len(),
                categories: index.categories().to_vec(),
                index_build_ms: index.build_time().as_secs_f64() * 1000.0,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Query { corpus, query, min_price, max_price, min_rating, category, limit, debug } => {
            let engine = corpus.open()?;
            let mut request = SearchRequest::new(query);
            request.min_price = min_price.map(NumericParam::Number);
            request.max_price = max_price.map(NumericParam::Number);
            request.min_rating = min_rating.map(NumericParam::Number);
            request.category = category;
            request.limit = limit;
            request.debug = debug;
            let response = engine.search(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
