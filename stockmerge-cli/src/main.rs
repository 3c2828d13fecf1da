//! StockMerge CLI — fetch, transform, and export commands.
//!
//! Commands:
//! - `run` — fetch both sources, run the full ETL, write the merged table
//!   as a JSON document array (the input a document store bulk-inserts)
//! - `tickers` — print the ticker list the market query would consume

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stockmerge_core::data::{
    CsvDatasetReader, DatasetSource, GistTickerSource, MarketSource, MarketstackProvider,
    TickerSource,
};
use stockmerge_core::{sink, Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "stockmerge",
    about = "StockMerge CLI — two-source daily stock-price ETL"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both sources, run the pipeline, and write merged documents.
    Run {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Market query window start (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,

        /// Market query window end (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,

        /// Calendar year kept by the transformation.
        #[arg(long)]
        year: Option<i32>,

        /// Query the live market endpoint instead of the mock fixture.
        #[arg(long, default_value_t = false)]
        live: bool,

        /// Access key for the live market endpoint.
        #[arg(long)]
        access_key: Option<String>,

        /// Path of the downloaded dataset CSV.
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Output file for the JSON document array. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the ticker list the market query would consume.
    Tickers {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            from,
            to,
            year,
            live,
            access_key,
            dataset,
            out,
        } => run_pipeline(config, from, to, year, live, access_key, dataset, out),
        Commands::Tickers { config } => list_tickers(config),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{text}', expected YYYY-MM-DD"))
}

fn run_pipeline(
    config: Option<PathBuf>,
    from: Option<String>,
    to: Option<String>,
    year: Option<i32>,
    live: bool,
    access_key: Option<String>,
    dataset: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut cfg = load_config(config)?;
    if let Some(from) = from {
        cfg.date_from = parse_date(&from)?;
    }
    if let Some(to) = to {
        cfg.date_to = parse_date(&to)?;
    }
    if let Some(year) = year {
        cfg.filter_year = year;
    }
    if live {
        cfg.mock = false;
    }
    if let Some(key) = access_key {
        cfg.access_key = key;
    }
    if let Some(path) = dataset {
        cfg.dataset_path = path;
    }

    let ticker_source = GistTickerSource::new(&cfg)?;
    let market_source = MarketstackProvider::new(&cfg)?;
    let dataset_source = CsvDatasetReader::new(&cfg.dataset_path);

    println!("Fetching ticker list...");
    let tickers = ticker_source.tickers()?;
    println!("  {} symbols, starting with {:?}", tickers.len(), tickers.first());

    println!("Fetching {} EOD data...", market_source.name());
    let market_raw = market_source.fetch_eod(&tickers)?;
    println!("  {} raw market rows", market_raw.height());

    println!("Loading {} dataset...", dataset_source.name());
    let dataset_raw = dataset_source.load()?;
    println!("  {} raw dataset rows", dataset_raw.height());

    let pipeline = Pipeline::new(cfg);
    let merged = pipeline.run(market_raw, dataset_raw)?;
    println!("Merged table: {} rows", merged.height());

    let documents = sink::to_documents(&merged)?;
    let json = serde_json::to_string_pretty(&documents)?;

    match out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} documents to {}", documents.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn list_tickers(config: Option<PathBuf>) -> Result<()> {
    let cfg = load_config(config)?;
    let source = GistTickerSource::new(&cfg)?;
    for ticker in source.tickers()? {
        println!("{ticker}");
    }
    Ok(())
}
