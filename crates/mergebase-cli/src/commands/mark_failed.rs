//! mark-failed command - seeds failed test commits into a local store

use anyhow::Result;
use colored::Colorize;
use mergebase_core::is_commit_id;
use mergebase_db::LocalStore;

pub fn cmd_mark_failed(store: LocalStore, shas: &[String]) -> Result<()> {
    let mut added = 0;
    for sha in shas {
        if !is_commit_id(sha) {
            anyhow::bail!("Invalid commit id: {:?}", sha);
        }
        if store.record_failed_test(sha)? {
            added += 1;
        }
    }
    store.flush()?;

    println!(
        "{} {} recorded ({} already known), {} total",
        "✓".green(),
        added.to_string().bold(),
        shas.len() - added,
        store.failed_test_count()
    );
    Ok(())
}
