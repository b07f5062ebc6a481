//! typestore Binary
//!
//! Runs a command script against a record store.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use typestore::audit::FileAuditLog;
use typestore::command::ScriptRunner;
use typestore::{Config, RecordStore, SearchMissPolicy};

/// typestore script runner
#[derive(Parser, Debug)]
#[command(name = "typestore")]
#[command(about = "Typed record store driven by a command script")]
#[command(version)]
struct Args {
    /// Command script to execute
    #[arg(default_value = "input.txt")]
    input: PathBuf,

    /// Data directory for type files
    #[arg(short, long, default_value = "./typestore_data")]
    data_dir: PathBuf,

    /// File that search results are appended to
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Audit log path (defaults to <data-dir>/log.csv)
    #[arg(short, long)]
    audit_log: Option<PathBuf>,

    /// Records per page
    #[arg(short, long, default_value_t = typestore::PAGE_SIZE)]
    page_size: usize,

    /// Write nothing for a search that finds no record
    #[arg(long)]
    silent_misses: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,typestore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("typestore v{}", typestore::VERSION);
    tracing::info!("Input script: {}", args.input.display());
    tracing::info!("Data directory: {}", args.data_dir.display());

    // Build config from args
    let mut builder = Config::builder()
        .data_dir(&args.data_dir)
        .page_size(args.page_size);
    if let Some(path) = &args.audit_log {
        builder = builder.audit_log(path);
    }
    if args.silent_misses {
        builder = builder.search_miss(SearchMissPolicy::Silent);
    }
    let config = builder.build();

    if let Err(e) = run(&args, config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, config: Config) -> typestore::Result<()> {
    let audit = FileAuditLog::open(&config.audit_log_path())?;
    let miss_policy = config.search_miss.clone();
    let store = RecordStore::open(config, Box::new(audit))?;

    let input = BufReader::new(File::open(&args.input)?);
    let output = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.output)?;

    let mut runner = ScriptRunner::new(&store, BufWriter::new(output), miss_policy);
    let summary = runner.run(input)?;

    tracing::info!(
        executed = summary.executed,
        succeeded = summary.succeeded,
        failed = summary.failed,
        skipped = summary.skipped,
        "script finished"
    );
    Ok(())
}
