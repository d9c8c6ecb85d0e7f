//! Core data models for merge-base bookkeeping

use serde::{Deserialize, Serialize};
use std::fmt;

/// Merge-base information for one commit
///
/// Field names match the document schema of the `merge_bases` collection,
/// so the struct serializes directly into upload payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeBaseRecord {
    /// Commit the failed test run was executed on
    pub sha: String,

    /// Nearest common ancestor of `sha` and the main branch
    pub merge_base: String,

    /// Paths differing between `sha` and `merge_base`, in diff order
    pub changed_files: Vec<String>,

    /// Commit time of `merge_base`, ISO-8601 UTC with a trailing `Z`
    pub merge_base_commit_date: String,

    /// Repository identifier (e.g. "pytorch/pytorch")
    pub repo: String,
}

impl MergeBaseRecord {
    pub fn new(
        sha: impl Into<String>,
        merge_base: impl Into<String>,
        changed_files: Vec<String>,
        merge_base_commit_date: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            sha: sha.into(),
            merge_base: merge_base.into(),
            changed_files,
            merge_base_commit_date: merge_base_commit_date.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for MergeBaseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.changed_files.len();
        write!(
            f,
            "{} -> {} ({}, {} changed file{})",
            short(&self.sha),
            short(&self.merge_base),
            self.merge_base_commit_date,
            n,
            if n == 1 { "" } else { "s" }
        )
    }
}

fn short(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

/// Store record ids that share the same source sha
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub sha: String,
    pub ids: Vec<String>,
}

impl DuplicateGroup {
    pub fn new(sha: impl Into<String>, ids: Vec<String>) -> Self {
        Self { sha: sha.into(), ids }
    }

    /// Id of the record that is kept: the lexicographically smallest one
    pub fn survivor(&self) -> Option<&str> {
        self.ids.iter().min().map(String::as_str)
    }

    /// Every id except the survivor, in ascending order
    ///
    /// Repeated ids are collapsed so the survivor is never scheduled for
    /// removal through a second copy of itself.
    pub fn redundant_ids(&self) -> Vec<String> {
        let mut ids = self.ids.clone();
        ids.sort();
        ids.dedup();
        ids.into_iter().skip(1).collect()
    }
}
