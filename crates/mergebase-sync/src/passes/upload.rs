//! Resolution and upload of one batch of commits

use mergebase_core::{MergeBaseRecord, MergeBaseStore};

use crate::resolver::Resolver;
use crate::stats::{BatchOutcome, CommitOutcome};

/// Resolves every commit of a batch and uploads the successes in one call.
///
/// A commit that fails to resolve does not affect the others; failures are
/// returned in the outcome rather than raised.
pub fn upload_batch(
    resolver: &Resolver<'_>,
    store: &dyn MergeBaseStore,
    index: usize,
    shas: &[String],
) -> BatchOutcome {
    let commits: Vec<CommitOutcome> = shas
        .iter()
        .map(|sha| match resolver.resolve(sha) {
            Ok(record) => CommitOutcome::Resolved(record),
            Err(error) => {
                log::warn!("Failed to resolve {}: {}", sha, error);
                CommitOutcome::Failed {
                    sha: sha.clone(),
                    error,
                }
            }
        })
        .collect();

    let records: Vec<MergeBaseRecord> = commits
        .iter()
        .filter_map(|c| match c {
            CommitOutcome::Resolved(record) => Some(record.clone()),
            CommitOutcome::Failed { .. } => None,
        })
        .collect();

    let result = if records.is_empty() {
        Ok(())
    } else {
        store.upload_merge_bases(&records)
    };
    let upload_error = match result {
        Ok(()) => None,
        Err(e) => {
            log::warn!("Batch #{}: upload of {} records failed: {:#}", index + 1, records.len(), e);
            Some(e)
        }
    };

    let outcome = BatchOutcome {
        index,
        shas: shas.to_vec(),
        fetched: 0,
        fetch_error: None,
        commits,
        upload_error,
    };
    log::info!(
        "Batch #{} | {} resolved, {} uploaded, {} failed",
        index + 1,
        outcome.resolved(),
        outcome.uploaded(),
        outcome.failed()
    );
    outcome
}
