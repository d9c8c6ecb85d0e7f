//! Merge-base resolution for a single commit

use mergebase_core::{epoch_to_iso8601, is_commit_id, same_commit, CoreError, MergeBaseRecord};

use crate::git::{GitError, GitRepo};

/// Why one commit could not be resolved
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Computes merge-base records against one main branch
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    repo: &'a GitRepo,
    main_branch: &'a str,
    repo_name: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(repo: &'a GitRepo, main_branch: &'a str, repo_name: &'a str) -> Self {
        Self {
            repo,
            main_branch,
            repo_name,
        }
    }

    /// Resolves merge base, changed files and merge-base date of `sha`.
    ///
    /// A commit that is already reachable from the main branch is its own
    /// merge base; its first parent is used instead so the diff is not empty.
    pub fn resolve(&self, sha: &str) -> Result<MergeBaseRecord, ResolveError> {
        if !is_commit_id(sha) {
            return Err(CoreError::InvalidCommitId(sha.to_string()).into());
        }

        let mut merge_base = self.repo.merge_base(self.main_branch, sha)?;
        if same_commit(sha, &merge_base) {
            log::debug!("{} is already on {}, using its parent", sha, self.main_branch);
            merge_base = self.repo.parent(sha)?;
        }

        let changed_files = self.repo.changed_files(sha, &merge_base)?;
        let date = epoch_to_iso8601(self.repo.commit_time(&merge_base)?)?;

        Ok(MergeBaseRecord::new(
            sha,
            merge_base,
            changed_files,
            date,
            self.repo_name,
        ))
    }
}
