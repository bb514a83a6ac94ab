//! treestat CLI
//!
//! Parses one HTML file and prints what the parse cost and what the tree
//! looks like.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use owo_colors::OwoColorize;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use treestat_core::{
    CorpusStats, OverflowPolicy, StatsConfig, StatsSnapshot, destroy_stats, parse_stats_bytes,
};

#[derive(Debug, Parser)]
#[command(
    name = "treestat",
    version,
    about = "Parse an HTML file and report allocation, timing and tree-shape statistics"
)]
struct Cli {
    /// HTML file to measure. Several with `--corpus`.
    #[arg(value_name = "html filename", required = true)]
    files: Vec<PathBuf>,

    /// Print the full report instead of the element count.
    #[arg(long, conflicts_with = "json")]
    report: bool,

    /// Measure every file and print figures aggregated over all of them.
    #[arg(long, conflicts_with_all = ["report", "json"])]
    corpus: bool,

    /// Print the snapshot as JSON.
    #[arg(long)]
    json: bool,

    /// Fail if a value does not fit its histogram instead of dropping it.
    #[arg(long)]
    strict: bool,

    /// Keep at most N parse errors.
    #[arg(long, value_name = "N")]
    max_errors: Option<usize>,

    /// More log output on stderr; repeat for more.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => usage(),
    };
    if cli.files.len() > 1 && !cli.corpus {
        usage();
    }

    init_logging(cli.verbose);
    let config = stats_config(&cli);
    if cli.corpus {
        return run_corpus(&cli.files, &config);
    }

    let file = &cli.files[0];
    let bytes = read(file)?;
    let stats = parse_stats_bytes(&bytes, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else if cli.report {
        print_report(file, &stats);
    } else {
        println!("Elements = {}", stats.nodes.elements);
    }

    destroy_stats(stats);
    Ok(())
}

fn usage() -> ! {
    eprintln!("Usage: treestat <html filename>");
    eprintln!("       treestat --corpus <html filename>...");
    eprintln!("       treestat --help");
    std::process::exit(1);
}

fn stats_config(cli: &Cli) -> StatsConfig {
    StatsConfig {
        overflow_policy: if cli.strict {
            OverflowPolicy::Strict
        } else {
            OverflowPolicy::Drop
        },
        max_errors: cli.max_errors,
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        fs::read(path).with_context(|| format!("File {} not found!", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "read input");
    Ok(bytes)
}

/// Files that fail to measure are counted, not fatal. Unreadable files are.
fn run_corpus(files: &[PathBuf], config: &StatsConfig) -> Result<()> {
    let mut corpus = CorpusStats::default();
    for path in files {
        let bytes = read(path)?;
        match parse_stats_bytes(&bytes, config) {
            Ok(stats) => {
                corpus.record(&stats);
                destroy_stats(stats);
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "document not measured");
                corpus.record_error(&err);
            }
        }
    }
    print!("{corpus}");
    Ok(())
}

/// Logs go to stderr so they never mix with the report. `RUST_LOG` wins over
/// `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn print_report(path: &Path, stats: &StatsSnapshot) {
    println!("{}", format!("=== {} ===", path.display()).bold());
    print!("{stats}");

    let dropped = stats.histograms.dropped();
    if dropped > 0 {
        eprintln!(
            "{}",
            format!("[treestat] ⚠ {dropped} values did not fit their histograms").yellow()
        );
    }
}
