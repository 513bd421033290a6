//! kubebucket - Scoop bucket manifest generator for kubectl

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod config;

#[derive(Parser)]
#[command(name = "kubebucket")]
#[command(author, version, about = "Generate Scoop bucket manifests for kubectl releases")]
pub struct Cli {
    /// Show what would be written without touching the bucket
    #[arg(long, global = true)]
    dry_run: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a kubebucket.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the latest and per-line manifests from the release CDN
    Sync {
        /// Directory manifests are written into
        #[arg(long)]
        bucket_dir: Option<PathBuf>,
        /// Minor lines to track (e.g. 1.31,1.32), overriding the derived set
        #[arg(long, value_delimiter = ',')]
        lines: Vec<String>,
        /// Maximum simultaneous requests
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Generate one pinned manifest per historical release
    Backfill {
        /// Directory manifests are written into
        #[arg(long)]
        bucket_dir: Option<PathBuf>,
        /// Maximum simultaneous requests
        #[arg(long)]
        concurrency: Option<usize>,
        /// Stop after this many versions, newest first
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Validate an existing manifest file
    Check {
        /// Manifest file to check
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; --quiet drops to warnings unless RUST_LOG overrides
    let default_filter = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let file = config::FileConfig::load(cli.config.as_deref())?;
    let dry_run = cli.dry_run;

    match cli.command {
        Commands::Sync {
            bucket_dir,
            lines,
            concurrency,
        } => {
            let bucket = config::resolve(&file, bucket_dir, &lines, concurrency, dry_run)?;
            cmd::sync::sync(bucket).await
        }
        Commands::Backfill {
            bucket_dir,
            concurrency,
            limit,
        } => {
            let bucket = config::resolve(&file, bucket_dir, &[], concurrency, dry_run)?;
            cmd::backfill::backfill(bucket, limit).await
        }
        Commands::Check { path } => cmd::check::check(&path),
    }
}
