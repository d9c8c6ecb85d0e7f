//! Full sync: dedup, discovery, fetch and parallel upload

use anyhow::{Context, Result};
use mergebase_core::partition;
use std::sync::mpsc;
use std::time::Instant;

use crate::passes::{dedup_merge_bases, upload_batch};
use crate::stats::{BatchOutcome, SyncReport};
use crate::syncer::Syncer;

impl Syncer {
    /// Runs one complete pass.
    ///
    /// Batches are fetched one after another on the calling thread; each
    /// fetched batch is then resolved and uploaded on the worker pool while
    /// the next one is fetched. Dedup and discovery failures abort the run,
    /// per-batch failures end up in the report.
    pub fn run(&self) -> Result<SyncReport> {
        let start_time = Instant::now();

        let dedup = dedup_merge_bases(self.store.as_ref())
            .context("Failed to deduplicate merge-base records")?;

        let shas = self
            .store
            .shas_missing_merge_base()
            .context("Failed to query commits without merge-base info")?;

        let batch_size = self.options.batch_size.max(1);
        let batches = partition(&shas, batch_size);
        log::info!(
            "There are {} shas, uploading in batches of {} ({} batches)",
            shas.len(),
            batch_size,
            batches.len()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs.max(1))
            .thread_name(|i| format!("upload-{}", i))
            .build()
            .context("Failed to build upload thread pool")?;

        let resolver = self.resolver();
        let store = self.store.as_ref();
        let (tx, rx) = mpsc::channel::<BatchOutcome>();

        pool.in_place_scope(|scope| {
            for (index, batch) in batches.into_iter().enumerate() {
                let fetched = match self.repo.fetch_commits(batch) {
                    Ok(n) => {
                        log::info!("Batch #{} | fetched {} commits", index + 1, n);
                        n
                    }
                    Err(e) => {
                        log::warn!("Batch #{} | fetch failed: {}", index + 1, e);
                        // Receiver outlives the scope
                        let _ = tx.send(BatchOutcome::fetch_failed(index, batch, e));
                        continue;
                    }
                };

                let tx = tx.clone();
                let resolver = &resolver;
                scope.spawn(move |_| {
                    let mut outcome = upload_batch(resolver, store, index, batch);
                    outcome.fetched = fetched;
                    let _ = tx.send(outcome);
                });
            }
            log::info!("Done pulling, waiting for uploads");
        });
        drop(tx);

        let mut outcomes: Vec<BatchOutcome> = rx.into_iter().collect();
        outcomes.sort_by_key(|b| b.index);

        let report = SyncReport {
            dedup,
            discovered: shas.len(),
            batches: outcomes,
            elapsed_time: start_time.elapsed(),
        };

        if report.is_success() {
            log::info!("✅ {}", report);
        } else {
            log::warn!("⚠ {}", report);
        }
        Ok(report)
    }
}
