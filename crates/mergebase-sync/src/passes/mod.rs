//! Store passes
//!
//! - Duplicate record removal (dedup.rs)
//! - Per-batch resolution and upload (upload.rs)

mod dedup;
mod upload;

pub use dedup::dedup_merge_bases;
pub use upload::upload_batch;
