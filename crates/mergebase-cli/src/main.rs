//! merge-base-info - Records merge-base information for commits with failed tests
//!
//! Provides:
//! - Removal of duplicate merge-base records
//! - Discovery, fetch, resolution and upload of missing merge bases
//! - One-off resolution of commits for inspection

mod commands;
mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mergebase_core::DISCOVERY_BATCH_SIZE;
use mergebase_rockset::DEFAULT_API_SERVER;
use mergebase_sync::{GitRepo, SyncOptions, DEFAULT_JOBS};
use std::path::{Path, PathBuf};

use commands::{cmd_dedup, cmd_mark_failed, cmd_resolve, cmd_sync};
use store::StoreArgs;

#[derive(Parser)]
#[command(name = "merge-base-info")]
#[command(about = "Uploads merge-base info for commits with failed test runs", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the local checkout git runs in
    #[arg(short, long, default_value = "../pytorch", global = true)]
    repo: PathBuf,

    /// Branch merge bases are computed against
    #[arg(long, default_value = "main", global = true)]
    main_branch: String,

    /// Repository identifier stored with every record
    #[arg(long, default_value = "pytorch/pytorch", global = true)]
    repo_name: String,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Use a local sled store at this path instead of Rockset
    #[arg(long, global = true)]
    local_store: Option<PathBuf>,

    /// Rockset API server
    #[arg(long, env = "ROCKSET_API_SERVER", default_value = DEFAULT_API_SERVER, global = true)]
    rockset_server: String,

    /// Rockset API key
    #[arg(long, env = "ROCKSET_API_KEY", hide_env_values = true, global = true)]
    rockset_api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dedup, then fetch, resolve and upload every commit missing merge-base info (default)
    Sync {
        /// Commits fetched and uploaded together
        #[arg(short, long, default_value_t = DISCOVERY_BATCH_SIZE)]
        batch_size: usize,

        /// Number of parallel upload workers
        #[arg(short, long, default_value_t = DEFAULT_JOBS)]
        jobs: usize,
    },

    /// Only remove duplicate merge-base records
    Dedup,

    /// Resolve commits and print their records as JSON (no store access)
    Resolve {
        /// Commit shas
        #[arg(required = true)]
        shas: Vec<String>,
    },

    /// Record commits with failed test runs in the local store
    MarkFailed {
        /// Commit shas
        #[arg(required = true)]
        shas: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logger
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&cli.log_level)
    ).init();

    let store_args = StoreArgs {
        local_store: cli.local_store,
        rockset_server: cli.rockset_server,
        rockset_api_key: cli.rockset_api_key,
    };

    let command = cli.command.unwrap_or(Commands::Sync {
        batch_size: DISCOVERY_BATCH_SIZE,
        jobs: DEFAULT_JOBS,
    });

    match command {
        Commands::Sync { batch_size, jobs } => {
            let repo = open_repo(&cli.repo)?;
            let options = SyncOptions {
                main_branch: cli.main_branch,
                repo_name: cli.repo_name,
                batch_size,
                jobs,
            };
            cmd_sync(repo, store_args.open()?, options)?;
        }
        Commands::Dedup => {
            cmd_dedup(store_args.open()?)?;
        }
        Commands::Resolve { shas } => {
            let repo = open_repo(&cli.repo)?;
            cmd_resolve(repo, &cli.main_branch, &cli.repo_name, &shas)?;
        }
        Commands::MarkFailed { shas } => {
            cmd_mark_failed(store_args.open_local()?, &shas)?;
        }
    }

    Ok(())
}

fn open_repo(path: &Path) -> Result<GitRepo> {
    GitRepo::open(path).with_context(|| format!("No git checkout at {:?} (use --repo)", path))
}
