//! Mergebase Rockset - Remote analytics store client
//!
//! Implements `MergeBaseStore` over the Rockset HTTP API: SQL queries for
//! duplicate and missing merge-base discovery, and document add/delete calls
//! against the `commons.merge_bases` collection.

mod client;
mod queries;

pub use client::{RocksetConfig, RocksetStore, DEFAULT_API_SERVER};
pub use queries::{DUP_MERGE_BASE_QUERY, FAILED_TEST_SHAS_QUERY};
