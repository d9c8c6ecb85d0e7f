//! Merge-base resolution against a real git history

mod common;

use anyhow::Result;
use common::{has_object, Fixture, T0_ISO};
use mergebase_core::CoreError;
use mergebase_sync::{GitRepo, ResolveError, Resolver};

fn files(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

// ── branch commits ───────────────────────────────────────────────────────────

#[test]
fn test_branch_commit_uses_merge_base_with_main() -> Result<()> {
    let fx = Fixture::new()?;
    let repo = GitRepo::open(&fx.clone)?;
    let record = Resolver::new(&repo, "main", "pytorch/pytorch").resolve(&fx.feature)?;

    assert_eq!(record.sha, fx.feature);
    assert_eq!(record.merge_base, fx.base);
    assert_eq!(record.merge_base, repo.merge_base("main", &fx.feature)?);
    assert_eq!(record.changed_files, files(&["a.py", "b.py"]));
    assert_eq!(record.merge_base_commit_date, T0_ISO);
    assert_eq!(record.repo, "pytorch/pytorch");
    Ok(())
}

// ── commits already on main ──────────────────────────────────────────────────

#[test]
fn test_main_tip_falls_back_to_parent() -> Result<()> {
    let fx = Fixture::new()?;
    let repo = GitRepo::open(&fx.clone)?;
    let record = Resolver::new(&repo, "main", "pytorch/pytorch").resolve(&fx.main_tip)?;

    assert_ne!(record.merge_base, fx.main_tip);
    assert_eq!(record.merge_base, repo.parent(&fx.main_tip)?);
    assert_eq!(record.merge_base, fx.base);
    assert_eq!(record.changed_files, files(&["README.md"]));
    Ok(())
}

#[test]
fn test_abbreviated_main_commit_also_falls_back() -> Result<()> {
    let fx = Fixture::new()?;
    let repo = GitRepo::open(&fx.clone)?;
    let record = Resolver::new(&repo, "main", "pytorch/pytorch").resolve(&fx.main_tip[..12])?;

    assert_eq!(record.sha, &fx.main_tip[..12]);
    assert_eq!(record.merge_base, fx.base);
    Ok(())
}

#[test]
fn test_uppercase_main_commit_also_falls_back() -> Result<()> {
    let fx = Fixture::new()?;
    let repo = GitRepo::open(&fx.clone)?;
    let upper = fx.main_tip.to_uppercase();
    let record = Resolver::new(&repo, "main", "pytorch/pytorch").resolve(&upper)?;

    assert_eq!(record.sha, upper);
    assert_eq!(record.merge_base, repo.parent(&fx.main_tip)?);
    assert_eq!(record.changed_files, files(&["README.md"]));
    Ok(())
}

// ── failures ─────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_id_never_reaches_git() -> Result<()> {
    let fx = Fixture::new()?;
    let repo = GitRepo::open(&fx.clone)?;
    let err = Resolver::new(&repo, "main", "pytorch/pytorch")
        .resolve("--output=/tmp/x")
        .unwrap_err();
    assert!(matches!(err, ResolveError::Core(CoreError::InvalidCommitId(_))));
    Ok(())
}

#[test]
fn test_unknown_commit_is_git_error() -> Result<()> {
    let fx = Fixture::new()?;
    let repo = GitRepo::open(&fx.clone)?;
    let err = Resolver::new(&repo, "main", "pytorch/pytorch")
        .resolve("0000000000000000000000000000000000000bad")
        .unwrap_err();
    assert!(matches!(err, ResolveError::Git(_)));
    Ok(())
}

// ── fetch ────────────────────────────────────────────────────────────────────

#[test]
fn test_fetch_makes_unadvertised_commit_resolvable() -> Result<()> {
    let fx = Fixture::new()?;
    let repo = GitRepo::open(&fx.clone)?;
    let resolver = Resolver::new(&repo, "main", "pytorch/pytorch");

    assert!(!has_object(&fx.clone, &fx.pr_only)?, "not cloned yet");
    assert!(resolver.resolve(&fx.pr_only).is_err());

    let fetched = repo.fetch_commits(&[fx.pr_only.clone(), "not a sha".to_string()])?;
    assert_eq!(fetched, 1);

    assert!(has_object(&fx.clone, &fx.pr_only)?);
    assert!(!has_object(&fx.clone, &fx.pr_two)?, "only requested commits are fetched");
    let record = resolver.resolve(&fx.pr_only)?;
    assert_eq!(record.merge_base, fx.base);
    assert_eq!(record.changed_files, files(&["c.py"]));
    Ok(())
}
