//! Resolve command implementation

use anyhow::{Context, Result};
use mergebase_sync::{GitRepo, Resolver};

/// Prints the merge-base record of each sha as pretty JSON.
///
/// Commits are not fetched; they must already be present in the checkout.
pub fn cmd_resolve(repo: GitRepo, main_branch: &str, repo_name: &str, shas: &[String]) -> Result<()> {
    let resolver = Resolver::new(&repo, main_branch, repo_name);
    let records = shas
        .iter()
        .map(|sha| {
            resolver
                .resolve(sha)
                .with_context(|| format!("Failed to resolve {}", sha))
        })
        .collect::<Result<Vec<_>>>()?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
