//! Dedup command implementation

use anyhow::Result;
use colored::Colorize;
use mergebase_core::MergeBaseStore;
use mergebase_sync::dedup_merge_bases;
use std::sync::Arc;

/// Removes duplicate merge-base records
pub fn cmd_dedup(store: Arc<dyn MergeBaseStore>) -> Result<()> {
    let stats = dedup_merge_bases(store.as_ref())?;
    println!(
        "{} {} duplicate groups, {} records removed",
        "✓".green(),
        stats.groups.to_string().bold(),
        stats.removed.to_string().bold()
    );
    Ok(())
}
