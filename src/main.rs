//! Escucha - social listening reports for candidate news coverage
//!
//! A CLI tool that loads a labeled table of news articles about political
//! candidates and reports monthly mentions, sentiment shares, two-candidate
//! comparisons and frequent words.
//!
//! Exit codes:
//!   0 - Success (warnings such as an invalid comparison are in the report)
//!   1 - Runtime error (missing or malformed dataset, bad config, etc.)

mod analysis;
mod cli;
mod config;
mod dashboard;
mod dataset;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use dashboard::Selection;
use dataset::{Dataset, Schema};
use models::{DashboardReport, NoticeLevel};
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the default verbosity, so it is read first
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("Escucha v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .escucha.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the dataset columns, labels and report.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

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

/// Load the dataset, build the report and write it. Returns the exit code.
fn run(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();
    let show_progress = args.show_progress();

    // Step 1: Load the article table
    let data_path = config.dataset.path.clone();
    if show_progress {
        println!("📥 Loading dataset: {}", data_path.display());
    }

    let schema = Schema::from(&config.dataset);
    let dataset = Dataset::load(&data_path, &schema)
        .with_context(|| format!("Cannot load dataset {}", data_path.display()))?;

    if args.list {
        return handle_list(&dataset);
    }

    // Step 2: Resolve the selection against the table
    let selection = Selection::from(&args)
        .resolve(&dataset)
        .with_context(|| format!("Nothing to report from {}", data_path.display()))?;
    info!(
        "Candidate: {} | Versus: {} | Narrative: {} | Months: {}",
        selection.candidate, selection.versus, selection.narrative, selection.range
    );

    // Step 3: Run the pipeline
    if show_progress {
        println!("🔬 Aggregating {} articles...", dataset.len());
    }
    let report = dashboard::build_report(
        &dataset,
        &selection,
        args.view,
        &config.report,
        &data_path.display().to_string(),
    );

    // Step 4: Render and save the report
    if show_progress {
        println!("📝 Generating report...");
    }
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = std::path::PathBuf::from(&config.general.output);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if show_progress {
        print_summary(&report);
        println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
        println!(
            "\n✅ Report complete! Saved to: {}",
            output_path.display()
        );
    } else {
        print_warnings(&report);
    }

    Ok(0)
}

/// Handle --list: print the candidates and months in the table, then exit.
fn handle_list(dataset: &Dataset) -> Result<i32> {
    println!("\n👥 Candidates ({}):", dataset.candidates().len());
    for candidate in dataset.candidates() {
        let count = dataset.articles_for(candidate).count();
        println!("     {} ({} articles)", candidate, count);
    }

    match dataset.full_range() {
        Some(range) => println!(
            "\n📅 Months ({}): {} to {}",
            dataset.months().len(),
            range.start,
            range.end
        ),
        None => println!("\n📅 No articles in the dataset."),
    }

    Ok(0)
}

/// Print a short console summary of the report.
fn print_summary(report: &DashboardReport) {
    println!("\n📊 Report Summary:");
    println!(
        "   Months: {} to {}",
        report.metadata.range.start, report.metadata.range.end
    );

    if let Some(ref view) = report.candidate {
        println!(
            "   {}: {} mentions | 👍 {} positive | 👎 {} negative",
            view.candidate, view.metrics.total, view.metrics.positive, view.metrics.negative
        );
    }

    if let Some(ref view) = report.comparison {
        println!(
            "   Comparison: {} vs {} over {} months",
            view.mentions.left,
            view.mentions.right,
            view.mentions.points.len()
        );
    }

    if let Some(ref view) = report.narrative {
        println!(
            "   Narrative: {} frequent words for {}",
            view.words.len(),
            view.candidate
        );
    }

    for notice in &report.notices {
        match notice.level {
            NoticeLevel::Warning => eprintln!("   {} {}", notice.level.emoji(), notice.message),
            NoticeLevel::Info => println!("   {} {}", notice.level.emoji(), notice.message),
        }
    }
}

/// Quiet mode still surfaces warnings on stderr.
fn print_warnings(report: &DashboardReport) {
    for notice in &report.notices {
        if notice.level == NoticeLevel::Warning {
            eprintln!("{} {}", notice.level.emoji(), notice.message);
        }
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        // Explicit path: failures are fatal
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                // Logging is not installed yet
                eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE, e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}
