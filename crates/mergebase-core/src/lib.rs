//! Mergebase Core - Shared data models for merge-base bookkeeping
//!
//! This crate defines the record uploaded for every commit with failed test
//! runs, the duplicate-group keep policy, batch partitioning helpers and the
//! `MergeBaseStore` trait implemented by the local and remote stores.

mod batching;
mod commit;
mod error;
mod models;
mod store;

pub use batching::{partition, DISCOVERY_BATCH_SIZE, REMOVAL_BATCH_SIZE};
pub use commit::{epoch_to_iso8601, is_commit_id, same_commit};
pub use error::CoreError;
pub use models::{DuplicateGroup, MergeBaseRecord};
pub use store::MergeBaseStore;
