//! SalesQ - Question-Driven Sales Analytics
//!
//! A CLI tool that answers free-text analytic questions about a sales
//! dataset (purchases, redemptions, assets) by inferring an intent from
//! the question text and aggregating a tabular snapshot.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable or malformed snapshot)

mod cli;
mod config;
mod data;
mod dates;
mod engine;
mod intent;
mod models;
mod render;
mod router;

use anyhow::{Context, Result};
use chrono::Datelike;
use cli::{Args, OutputFormat};
use config::Config;
use data::{CsvStore, DataSource, SnapshotCache};
use models::{AskRequest, Dimension, Metric, SalesRecord, UserContext};
use router::QueryRouter;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        match handle_init_config() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("❌ Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging(&args);

    info!("SalesQ v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(()) => {}
        Err(e) => {
            error!("Request failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .salesq.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".salesq.toml");

    if path.exists() {
        anyhow::bail!(".salesq.toml already exists. Remove it first or edit it manually.");
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .salesq.toml")?;

    println!("✅ Created .salesq.toml with default settings.");
    println!("   Edit it to customize the data path and output format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the selected mode: summary, one-shot question, or interactive.
fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let format = resolve_format(&config);
    let store = CsvStore::new(&config.data.path);

    // Summary mode never needs the router
    if args.summary {
        let snapshot = store.snapshot()?;
        print_summary(&config.data.path, &snapshot);
        return Ok(());
    }

    let source: Box<dyn DataSource> = if config.data.cache {
        Box::new(SnapshotCache::new(store))
    } else {
        Box::new(store)
    };
    let router = QueryRouter::new(source);

    let context = args.rvp.clone().map(|rvp| UserContext {
        rvp: Some(rvp),
        ..UserContext::default()
    });

    match args.question {
        Some(ref question) => {
            let answer = ask(&router, question, context.as_ref())?;
            print_answer(&answer, format)?;
            Ok(())
        }
        None => run_interactive(&router, context.as_ref(), format, args.quiet),
    }
}

/// Answer a single question.
fn ask(
    router: &QueryRouter<Box<dyn DataSource>>,
    question: &str,
    context: Option<&UserContext>,
) -> Result<models::Answer> {
    let mut request = AskRequest::new(question);
    if let Some(ctx) = context {
        request = request.with_context(ctx.clone());
    }
    Ok(router.ask(&request)?)
}

/// Interactive loop: read questions from stdin until EOF or "exit".
fn run_interactive(
    router: &QueryRouter<Box<dyn DataSource>>,
    context: Option<&UserContext>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        println!("💬 Ask a question about the sales data (\"exit\" to quit).");
        println!("   e.g. \"redemptions by fund type last quarter\"\n");
    }

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("❓ ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match ask(router, question, context) {
            Ok(answer) => print_answer(&answer, format)?,
            Err(e) => eprintln!("❌ Error: {:#}", e),
        }
    }

    Ok(())
}

/// Print an answer in the requested format.
fn print_answer(answer: &models::Answer, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Pretty => println!("\n{}", render::to_terminal(answer)),
        OutputFormat::Json => println!("{}", render::to_json(answer)?),
    }
    Ok(())
}

/// Print a dataset overview: row count, date range, dimension cardinalities,
/// metric totals.
fn print_summary(path: &str, snapshot: &[SalesRecord]) {
    println!("📊 Dataset Summary: {}", path);
    println!("   Rows: {}", snapshot.len());

    if snapshot.is_empty() {
        return;
    }

    let first = snapshot.iter().map(|r| r.date).min();
    let last = snapshot.iter().map(|r| r.date).max();
    if let (Some(first), Some(last)) = (first, last) {
        println!(
            "   Dates: {} .. {} ({} distinct months)",
            first,
            last,
            snapshot
                .iter()
                .map(|r| (r.date.year(), r.date.month()))
                .collect::<BTreeSet<_>>()
                .len()
        );
    }

    for dimension in [
        Dimension::Wholesaler,
        Dimension::Advisor,
        Dimension::MandateName,
        Dimension::FundType,
    ] {
        let distinct: BTreeSet<&str> = snapshot.iter().map(|r| dimension.value(r)).collect();
        println!("   {}: {} distinct", dimension.display_name(), distinct.len());
    }
    let owners: BTreeSet<&str> = snapshot.iter().map(|r| r.region_owner.as_str()).collect();
    println!("   Region Owners: {} distinct", owners.len());

    for metric in [Metric::Purchases, Metric::Redemptions, Metric::Assets] {
        let total: f64 = snapshot.iter().map(|r| metric.value(r)).sum();
        println!("   Total {}: {:.2}", metric.title(), total);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .salesq.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Resolve the output format from the merged config.
fn resolve_format(config: &Config) -> OutputFormat {
    OutputFormat::parse(&config.general.format).unwrap_or_else(|| {
        warn!(
            "Unknown output format {:?} in config, falling back to pretty",
            config.general.format
        );
        OutputFormat::Pretty
    })
}
