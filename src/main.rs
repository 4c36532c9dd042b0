use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pubmed_fetcher::config::{find_config_file, load_config};
use pubmed_fetcher::output::{self, OutputFormat};
use pubmed_fetcher::{Pipeline, PubMedSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch PubMed papers and list authors affiliated with pharmaceutical or biotech companies
#[derive(Parser, Debug)]
#[command(name = "get-papers-list")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch research papers from PubMed and flag non-academic authors", long_about = None)]
struct Cli {
    /// PubMed search query (full PubMed query syntax is supported)
    query: String,

    /// Write results to this CSV file instead of printing them
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Print debug information during execution
    #[arg(long, short)]
    debug: bool,

    /// Suppress non-error log output
    #[arg(long, short, conflicts_with = "debug")]
    quiet: bool,

    /// Console format when no file is given
    #[arg(long, short, value_enum, default_value_t = Format::Plain)]
    output: Format,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of papers to fetch (default: 50)
    #[arg(long)]
    max_results: Option<usize>,

    /// Number of records fetched at once (default: 1)
    #[arg(long)]
    concurrency: Option<usize>,
}

/// Console output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// One line per paper
    Plain,
    /// Table format (human-readable)
    Table,
    /// JSON lines (machine-readable)
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Plain => OutputFormat::Plain,
            Format::Table => OutputFormat::Table,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.debug {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                format!("pubmed_fetcher={0},get_papers_list={0}", level)
            }),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    if let Some(max_results) = cli.max_results {
        config.pubmed.max_results = max_results;
    }
    if let Some(concurrency) = cli.concurrency {
        config.pipeline.concurrency = concurrency;
    }
    config.validate().context("Invalid configuration")?;

    let source = PubMedSource::from_config(&config).context("Failed to create PubMed client")?;
    let pipeline = Pipeline::from_config(Arc::new(source), &config);

    let rows = pipeline
        .run(&cli.query)
        .await
        .with_context(|| format!("Failed to fetch papers for {:?}", cli.query))?;

    output::emit(&rows, cli.file.as_deref(), cli.output.into())?;

    if let Some(path) = &cli.file {
        println!("Results saved to {}", path.display());
    }

    Ok(())
}
