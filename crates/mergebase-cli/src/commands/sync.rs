//! Sync command implementation

use anyhow::Result;
use colored::Colorize;
use mergebase_core::MergeBaseStore;
use mergebase_sync::{GitRepo, SyncOptions, Syncer};
use std::sync::Arc;

/// Runs one full dedup/discover/fetch/upload pass.
///
/// Fails (non-zero exit) when any commit could not be recorded, after
/// listing every failure.
pub fn cmd_sync(repo: GitRepo, store: Arc<dyn MergeBaseStore>, options: SyncOptions) -> Result<()> {
    log::info!("Syncing merge bases from {:?}", repo.root());
    log::info!(
        "Batch size: {} commits, {} upload workers",
        options.batch_size,
        options.jobs
    );

    let report = Syncer::new(repo, store, options).run()?;

    println!("{}", "Merge-base sync:".bright_cyan().bold());
    println!("  {}: {}", "Duplicates removed".bright_yellow(), report.dedup.removed.to_string().bold());
    println!("  {}: {}", "Commits discovered".bright_yellow(), report.discovered.to_string().bold());
    println!("  {}: {}", "Records uploaded".bright_yellow(), report.uploaded().to_string().green());
    println!("  {}: {}", "Failed".bright_yellow(), report.failed().to_string().red());

    let failures = report.failures();
    for failure in &failures {
        eprintln!("  {} {}", "✗".red(), failure.to_string().red());
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} commits have no merge-base record ({} failures)",
            report.failed(),
            report.discovered,
            failures.len()
        );
    }
    println!("{} Done.", "✓".green());
    Ok(())
}
