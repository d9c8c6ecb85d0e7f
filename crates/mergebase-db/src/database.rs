//! Database operations and management

use anyhow::{Context, Result};
use mergebase_core::{DuplicateGroup, MergeBaseRecord, MergeBaseStore};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Internal representation stored in sled (bincode, no field names).
#[derive(Serialize, Deserialize)]
struct StoredRecord {
    sha: String,
    merge_base: String,
    changed_files: Vec<String>,
    merge_base_commit_date: String,
    repo: String,
}

fn pack(record: &MergeBaseRecord) -> Result<Vec<u8>> {
    let stored = StoredRecord {
        sha: record.sha.clone(),
        merge_base: record.merge_base.clone(),
        changed_files: record.changed_files.clone(),
        merge_base_commit_date: record.merge_base_commit_date.clone(),
        repo: record.repo.clone(),
    };
    bincode::serialize(&stored).context("Failed to serialize MergeBaseRecord")
}

fn unpack(bytes: &[u8]) -> Result<MergeBaseRecord> {
    let stored: StoredRecord =
        bincode::deserialize(bytes).context("Failed to deserialize MergeBaseRecord")?;
    Ok(MergeBaseRecord {
        sha: stored.sha,
        merge_base: stored.merge_base,
        changed_files: stored.changed_files,
        merge_base_commit_date: stored.merge_base_commit_date,
        repo: stored.repo,
    })
}

/// Local merge-base store backed by sled
pub struct LocalStore {
    /// Merge-base records (key: zero-padded generated id)
    merge_bases: sled::Tree,

    /// Commits with failed test runs (key: sha, value: time recorded)
    failed_test_shas: sled::Tree,

    /// Sled database instance
    db: Db,
}

impl LocalStore {
    /// Opens or creates a store at the specified location
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref())
            .with_context(|| format!("Failed to open local store at {:?}", path.as_ref()))?;

        let merge_bases = db
            .open_tree("merge_bases")
            .context("Failed to open merge_bases tree")?;

        let failed_test_shas = db
            .open_tree("failed_test_shas")
            .context("Failed to open failed_test_shas tree")?;

        Ok(Self {
            merge_bases,
            failed_test_shas,
            db,
        })
    }

    /// Records that `sha` had a failed test run
    ///
    /// Returns false if the sha was already recorded.
    pub fn record_failed_test(&self, sha: &str) -> Result<bool> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let previous = self
            .failed_test_shas
            .insert(sha.as_bytes(), &now.to_le_bytes())
            .context("Failed to record failed test sha")?;
        Ok(previous.is_none())
    }

    /// Inserts a record under a freshly generated id and returns the id
    pub fn insert(&self, record: &MergeBaseRecord) -> Result<String> {
        // Zero padding keeps lexicographic order equal to insertion order
        let id = format!("{:020}", self.db.generate_id().context("Failed to generate record id")?);
        self.merge_bases
            .insert(id.as_bytes(), pack(record)?)
            .context("Failed to insert merge-base record")?;
        Ok(id)
    }

    /// All records for `sha` as (id, record) pairs, oldest first
    pub fn merge_bases_for(&self, sha: &str) -> Result<Vec<(String, MergeBaseRecord)>> {
        let mut results = Vec::new();
        for item in self.merge_bases.iter() {
            let (key, value) = item.context("Failed to read from local store")?;
            let record = unpack(&value)?;
            if record.sha == sha {
                results.push((String::from_utf8_lossy(&key).into_owned(), record));
            }
        }
        Ok(results)
    }

    /// Returns the number of stored merge-base records
    pub fn merge_base_count(&self) -> usize {
        self.merge_bases.len()
    }

    /// Returns the number of recorded failed test shas
    pub fn failed_test_count(&self) -> usize {
        self.failed_test_shas.len()
    }

    /// Flushes all pending operations to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush().context("Failed to flush local store")?;
        Ok(())
    }
}

impl MergeBaseStore for LocalStore {
    fn duplicate_groups(&self) -> Result<Vec<DuplicateGroup>> {
        let mut by_sha: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for item in self.merge_bases.iter() {
            let (key, value) = item.context("Failed to read from local store")?;
            let record = unpack(&value)?;
            by_sha
                .entry(record.sha)
                .or_default()
                .push(String::from_utf8_lossy(&key).into_owned());
        }

        Ok(by_sha
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(sha, ids)| DuplicateGroup::new(sha, ids))
            .collect())
    }

    fn remove_merge_bases(&self, ids: &[String]) -> Result<()> {
        let mut removed = 0;
        for id in ids {
            if self
                .merge_bases
                .remove(id.as_bytes())
                .with_context(|| format!("Failed to remove record {}", id))?
                .is_some()
            {
                removed += 1;
            } else {
                log::warn!("Record {} not found, nothing to remove", id);
            }
        }
        log::debug!("Removed {} of {} requested records", removed, ids.len());
        self.flush()
    }

    fn shas_missing_merge_base(&self) -> Result<Vec<String>> {
        let mut known = HashSet::new();
        for item in self.merge_bases.iter() {
            let (_, value) = item.context("Failed to read from local store")?;
            known.insert(unpack(&value)?.sha);
        }

        let mut missing = Vec::new();
        for key in self.failed_test_shas.iter().keys() {
            let key = key.context("Failed to read failed test shas")?;
            let sha = String::from_utf8_lossy(&key).into_owned();
            if !known.contains(&sha) {
                missing.push(sha);
            }
        }
        Ok(missing)
    }

    fn upload_merge_bases(&self, records: &[MergeBaseRecord]) -> Result<()> {
        for record in records {
            self.insert(record)?;
        }
        self.flush()
    }
}
