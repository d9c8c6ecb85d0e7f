//! Command implementations

mod dedup;
mod mark_failed;
mod resolve;
mod sync;

pub use dedup::cmd_dedup;
pub use mark_failed::cmd_mark_failed;
pub use resolve::cmd_resolve;
pub use sync::cmd_sync;
