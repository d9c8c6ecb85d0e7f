//! Duplicate merge-base record removal

use anyhow::{Context, Result};
use mergebase_core::{partition, MergeBaseStore, REMOVAL_BATCH_SIZE};

use crate::stats::DedupStats;

/// Removes every record but the survivor of each duplicate group.
///
/// Ids are removed in chunks of `REMOVAL_BATCH_SIZE`. Any store failure
/// aborts the pass.
pub fn dedup_merge_bases(store: &dyn MergeBaseStore) -> Result<DedupStats> {
    let groups = store
        .duplicate_groups()
        .context("Failed to query duplicate merge-base records")?;

    let ids: Vec<String> = groups.iter().flat_map(|g| g.redundant_ids()).collect();
    for group in &groups {
        log::debug!(
            "{}: keeping {:?} of {} records",
            group.sha,
            group.survivor(),
            group.ids.len()
        );
    }

    for chunk in partition(&ids, REMOVAL_BATCH_SIZE) {
        store
            .remove_merge_bases(chunk)
            .with_context(|| format!("Failed to remove {} duplicate records", chunk.len()))?;
    }

    let stats = DedupStats {
        groups: groups.len(),
        removed: ids.len(),
    };
    log::info!("{}", stats);
    Ok(stats)
}
