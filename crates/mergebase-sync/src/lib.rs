//! Mergebase Sync - Merge-base discovery and upload
//!
//! This crate is responsible for:
//! - Running git in an explicit checkout (`GitRepo`)
//! - Computing merge base, changed files and merge-base date per commit
//! - Removing duplicate merge-base records from the store
//! - Fetching, resolving and uploading commits in parallel batches

mod formatting;
mod git;
mod orchestrator;
mod passes;
mod resolver;
mod stats;
mod syncer;

pub use git::{GitError, GitRepo};
pub use passes::{dedup_merge_bases, upload_batch};
pub use resolver::{ResolveError, Resolver};
pub use stats::{BatchOutcome, CommitOutcome, DedupStats, Failure, SyncReport};
pub use syncer::{SyncOptions, Syncer, DEFAULT_JOBS};
