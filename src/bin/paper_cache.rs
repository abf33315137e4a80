//! Command-line front end for the paper cache.
//!
//! Search results are printed to stdout as JSON; rendered views are
//! printed as markdown. Logs go to stderr.
//!
//! ```bash
//! paper-cache search "graph neural networks" --max-results 10 --sort-by submittedDate
//! paper-cache author "Yoshua Bengio"
//! paper-cache recent "diffusion models" --days-back 14
//! paper-cache topics
//! paper-cache topic graph_neural_networks
//! paper-cache lookup 2401.12345v1
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paper_cache::config::Config;
use paper_cache::provider::arxiv::ArxivClient;
use paper_cache::{RegistryStore, ResultProjector, SearchOrchestrator, SearchParams, SearchSummary};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "paper-cache", version, about = "Search arXiv and keep a deduplicated local cache of the results")]
struct Args {
    /// JSON config file; defaults plus PAPER_CACHE_ROOT when omitted
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Storage root, overriding the config
    #[arg(long, value_name = "DIR", global = true)]
    root: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info", value_name = "LEVEL", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search and merge results into the topic's registry
    Search {
        query: String,
        #[arg(long, default_value_t = 5)]
        max_results: usize,
        /// relevance, submittedDate or lastUpdatedDate
        #[arg(long, default_value = "relevance")]
        sort_by: String,
        /// ascending or descending
        #[arg(long, default_value = "descending")]
        sort_order: String,
        /// all, title, author, abstract, comment, journal, category, report_number
        #[arg(long, default_value = "all")]
        search_field: String,
        /// YYYYMMDD
        #[arg(long)]
        date_from: Option<String>,
        /// YYYYMMDD
        #[arg(long)]
        date_to: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Papers by one author
    Author {
        name: String,
        #[arg(long, default_value_t = 10)]
        max_results: usize,
        #[arg(long, default_value = "submittedDate")]
        sort_by: String,
    },
    /// Papers on a topic submitted in the last N days
    Recent {
        topic: String,
        #[arg(long, default_value_t = 7)]
        days_back: u32,
        #[arg(long, default_value_t = 10)]
        max_results: usize,
    },
    /// Print a stored paper as JSON
    Lookup { id: String },
    /// List known topics
    Topics,
    /// Render one topic's papers
    Topic { name: String },
}

fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::from_env(),
    };
    if let Some(root) = &args.root {
        config.storage.root = root.clone();
    }
    Ok(config)
}

fn print_summary(summary: &SearchSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let config = load_config(&args)?;
    info!(root = %config.storage.root.display(), "using storage root");
    let store = RegistryStore::new(config.storage.root.clone());

    match args.command {
        Command::Search {
            query,
            max_results,
            sort_by,
            sort_order,
            search_field,
            date_from,
            date_to,
            author,
        } => {
            let orchestrator = SearchOrchestrator::new(ArxivClient::new(config.provider)?, store);
            let params = SearchParams {
                query,
                max_results,
                sort_by,
                sort_order,
                search_field,
                date_from,
                date_to,
                author_search: author,
            };
            print_summary(&orchestrator.search(params)?)?;
        }
        Command::Author { name, max_results, sort_by } => {
            let orchestrator = SearchOrchestrator::new(ArxivClient::new(config.provider)?, store);
            print_summary(&orchestrator.search_by_author(&name, max_results, &sort_by)?)?;
        }
        Command::Recent { topic, days_back, max_results } => {
            let orchestrator = SearchOrchestrator::new(ArxivClient::new(config.provider)?, store);
            print_summary(&orchestrator.search_recent(&topic, days_back, max_results)?)?;
        }
        Command::Lookup { id } => println!("{}", ResultProjector::new(&store).render_lookup(&id)),
        Command::Topics => print!("{}", ResultProjector::new(&store).render_topic_index()),
        Command::Topic { name } => println!("{}", ResultProjector::new(&store).render_topic(&name)),
    }

    Ok(())
}
