//! Mergebase DB - Embedded store for merge-base records
//!
//! `LocalStore` keeps merge-base records and failed test commit ids in a
//! local sled database and implements `MergeBaseStore`, so a full sync can
//! run without the remote analytics store.

mod database;

pub use database::LocalStore;
