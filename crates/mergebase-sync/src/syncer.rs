//! Main sync structure

use mergebase_core::{MergeBaseStore, DISCOVERY_BATCH_SIZE};
use std::sync::Arc;

use crate::git::GitRepo;
use crate::resolver::Resolver;

/// Default number of upload workers
pub const DEFAULT_JOBS: usize = 20;

/// Settings of a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Branch merge bases are computed against
    pub main_branch: String,

    /// Repository identifier written into every record
    pub repo_name: String,

    /// Commits fetched and uploaded together
    pub batch_size: usize,

    /// Upload worker threads
    pub jobs: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            main_branch: "main".to_string(),
            repo_name: "pytorch/pytorch".to_string(),
            batch_size: DISCOVERY_BATCH_SIZE,
            jobs: DEFAULT_JOBS,
        }
    }
}

/// Ties a checkout, a store and run settings together
pub struct Syncer {
    pub(crate) repo: GitRepo,
    pub(crate) store: Arc<dyn MergeBaseStore>,
    pub(crate) options: SyncOptions,
}

impl Syncer {
    pub fn new(repo: GitRepo, store: Arc<dyn MergeBaseStore>, options: SyncOptions) -> Self {
        Self {
            repo,
            store,
            options,
        }
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.repo, &self.options.main_branch, &self.options.repo_name)
    }
}
