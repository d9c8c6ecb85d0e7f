//! Storage abstraction for merge-base records

use anyhow::Result;

use crate::{DuplicateGroup, MergeBaseRecord};

/// The store holding merge-base records and failed test runs
///
/// Implemented by the embedded sled store and by the remote analytics
/// store. Implementations are shared across upload workers.
pub trait MergeBaseStore: Send + Sync {
    /// Groups of record ids whose source sha appears more than once
    fn duplicate_groups(&self) -> Result<Vec<DuplicateGroup>>;

    /// Removes the records with the given ids
    fn remove_merge_bases(&self, ids: &[String]) -> Result<()>;

    /// Distinct shas with failed test runs but no merge-base record
    fn shas_missing_merge_base(&self) -> Result<Vec<String>>;

    /// Inserts one batch of records
    fn upload_merge_bases(&self, records: &[MergeBaseRecord]) -> Result<()>;
}
