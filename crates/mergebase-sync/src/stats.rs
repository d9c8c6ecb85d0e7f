//! Outcomes and statistics of a sync run

use mergebase_core::MergeBaseRecord;
use std::fmt;
use std::time::Duration;

use crate::formatting::{format_duration, short_sha};
use crate::git::GitError;
use crate::resolver::ResolveError;

/// Result of the duplicate removal pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub groups: usize,
    pub removed: usize,
}

impl fmt::Display for DedupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duplicates: {} groups, {} records removed",
            self.groups, self.removed
        )
    }
}

/// Per-commit result of resolution
#[derive(Debug)]
pub enum CommitOutcome {
    Resolved(MergeBaseRecord),
    Failed { sha: String, error: ResolveError },
}

impl CommitOutcome {
    pub fn sha(&self) -> &str {
        match self {
            CommitOutcome::Resolved(record) => &record.sha,
            CommitOutcome::Failed { sha, .. } => sha,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CommitOutcome::Resolved(_))
    }
}

/// Everything that happened to one batch
#[derive(Debug)]
pub struct BatchOutcome {
    /// Zero-based position of the batch in discovery order
    pub index: usize,
    pub shas: Vec<String>,
    /// Commits requested from the remote before resolution
    pub fetched: usize,
    /// Set when fetching the batch failed; nothing was resolved then
    pub fetch_error: Option<GitError>,
    pub commits: Vec<CommitOutcome>,
    pub upload_error: Option<anyhow::Error>,
}

impl BatchOutcome {
    pub(crate) fn fetch_failed(index: usize, shas: &[String], error: GitError) -> Self {
        Self {
            index,
            shas: shas.to_vec(),
            fetched: 0,
            fetch_error: Some(error),
            commits: Vec::new(),
            upload_error: None,
        }
    }

    pub fn resolved(&self) -> usize {
        self.commits.iter().filter(|c| c.is_resolved()).count()
    }

    pub fn uploaded(&self) -> usize {
        if self.upload_error.is_some() {
            0
        } else {
            self.resolved()
        }
    }

    /// Commits without an uploaded record
    pub fn failed(&self) -> usize {
        self.shas.len() - self.uploaded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> Vec<Failure<'_>> {
        let mut failures = Vec::new();
        if let Some(error) = &self.fetch_error {
            failures.push(Failure::Fetch {
                batch: self.index,
                commits: self.shas.len(),
                error,
            });
        }
        for commit in &self.commits {
            if let CommitOutcome::Failed { sha, error } = commit {
                failures.push(Failure::Resolve { sha, error });
            }
        }
        if let Some(error) = &self.upload_error {
            failures.push(Failure::Upload {
                batch: self.index,
                records: self.resolved(),
                error,
            });
        }
        failures
    }
}

/// One reportable failure
#[derive(Debug)]
pub enum Failure<'a> {
    Fetch {
        batch: usize,
        commits: usize,
        error: &'a GitError,
    },
    Resolve {
        sha: &'a str,
        error: &'a ResolveError,
    },
    Upload {
        batch: usize,
        records: usize,
        error: &'a anyhow::Error,
    },
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Fetch {
                batch,
                commits,
                error,
            } => write!(f, "batch #{} fetch ({} commits): {}", batch + 1, commits, error),
            Failure::Resolve { sha, error } => write!(f, "{}: {}", short_sha(sha), error),
            Failure::Upload {
                batch,
                records,
                error,
            } => write!(f, "batch #{} upload ({} records): {:#}", batch + 1, records, error),
        }
    }
}

/// Statistics of a full sync run
#[derive(Debug, Default)]
pub struct SyncReport {
    pub dedup: DedupStats,
    /// Commits with failed tests and no merge-base record
    pub discovered: usize,
    /// Batch outcomes ordered by index
    pub batches: Vec<BatchOutcome>,
    pub elapsed_time: Duration,
}

impl SyncReport {
    pub fn resolved(&self) -> usize {
        self.batches.iter().map(BatchOutcome::resolved).sum()
    }

    pub fn uploaded(&self) -> usize {
        self.batches.iter().map(BatchOutcome::uploaded).sum()
    }

    pub fn failed(&self) -> usize {
        self.batches.iter().map(BatchOutcome::failed).sum()
    }

    pub fn failures(&self) -> Vec<Failure<'_>> {
        self.batches.iter().flat_map(BatchOutcome::failures).collect()
    }

    pub fn is_success(&self) -> bool {
        self.batches.iter().all(BatchOutcome::is_success)
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duplicates removed: {} | Commits: {} discovered, {} resolved, {} uploaded, {} failed | Batches: {} | Time: {}",
            self.dedup.removed,
            self.discovered,
            self.resolved(),
            self.uploaded(),
            self.failed(),
            self.batches.len(),
            format_duration(self.elapsed_time)
        )
    }
}
