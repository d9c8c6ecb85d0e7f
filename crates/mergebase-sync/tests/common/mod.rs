//! Shared fixtures: a small origin/clone history and a recording store

#![allow(dead_code)]

use anyhow::Result;
use git2::{Commit, Oid, Repository, Signature, Time};
use mergebase_core::{DuplicateGroup, MergeBaseRecord, MergeBaseStore};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

/// Commit time of `base`, 2023-11-14T22:13:20Z
pub const T0: i64 = 1_700_000_000;
pub const T0_ISO: &str = "2023-11-14T22:13:20Z";

/// History built in `origin` and cloned next to it:
///
/// ```text
/// base ── main_tip            (refs/heads/main)
///   ├──── feature             (refs/heads/feature)
///   ├──── pr_only             (refs/pull/1/head, not cloned)
///   └──── pr_two              (refs/pull/2/head, not cloned)
/// ```
///
/// The clone goes through `git clone --no-local`, so objects only reachable
/// from `refs/pull/*` are missing until fetched.
pub struct Fixture {
    _dir: TempDir,
    pub origin: PathBuf,
    pub clone: PathBuf,
    pub base: String,
    pub main_tip: String,
    pub feature: String,
    pub pr_only: String,
    pub pr_two: String,
}

fn commit(
    repo: &Repository,
    refname: &str,
    parent: Option<&Commit>,
    files: &[(&str, &str)],
    time: i64,
) -> Result<Oid> {
    let sig = Signature::new("Test", "test@example.com", &Time::new(time, 0))?;
    let parent_tree = match parent {
        Some(p) => Some(p.tree()?),
        None => None,
    };
    let mut builder = repo.treebuilder(parent_tree.as_ref())?;
    for &(path, content) in files {
        let blob = repo.blob(content.as_bytes())?;
        builder.insert(path, blob, 0o100644)?;
    }
    let tree = repo.find_tree(builder.write()?)?;
    let parents: Vec<&Commit> = parent.into_iter().collect();
    Ok(repo.commit(Some(refname), &sig, &sig, refname, &tree, &parents)?)
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let origin = dir.path().join("origin");
        let clone = dir.path().join("clone");

        let repo = Repository::init(&origin)?;
        repo.config()?.set_bool("uploadpack.allowAnySHA1InWant", true)?;

        let base = commit(
            &repo,
            "refs/heads/main",
            None,
            &[("README.md", "hello\n"), ("a.py", "a = 1\n")],
            T0,
        )?;
        let base_commit = repo.find_commit(base)?;
        let main_tip = commit(
            &repo,
            "refs/heads/main",
            Some(&base_commit),
            &[("README.md", "hello world\n")],
            T0 + 100,
        )?;
        let feature = commit(
            &repo,
            "refs/heads/feature",
            Some(&base_commit),
            &[("a.py", "a = 2\n"), ("b.py", "b = 1\n")],
            T0 + 200,
        )?;
        let pr_only = commit(
            &repo,
            "refs/pull/1/head",
            Some(&base_commit),
            &[("c.py", "c = 1\n")],
            T0 + 300,
        )?;
        let pr_two = commit(
            &repo,
            "refs/pull/2/head",
            Some(&base_commit),
            &[("d.py", "d = 1\n")],
            T0 + 400,
        )?;
        repo.set_head("refs/heads/main")?;

        let status = Command::new("git")
            .args(["clone", "--no-local", "--quiet"])
            .arg(&origin)
            .arg(&clone)
            .status()?;
        anyhow::ensure!(status.success(), "git clone failed: {}", status);

        Ok(Self {
            _dir: dir,
            origin,
            clone,
            base: base.to_string(),
            main_tip: main_tip.to_string(),
            feature: feature.to_string(),
            pr_only: pr_only.to_string(),
            pr_two: pr_two.to_string(),
        })
    }
}

/// Whether the object `sha` exists in the repository at `path`
pub fn has_object(path: &Path, sha: &str) -> Result<bool> {
    let repo = Repository::open(path)?;
    let exists = repo.find_commit(Oid::from_str(sha)?).is_ok();
    Ok(exists)
}

/// In-memory store that records every call
#[derive(Default)]
pub struct RecordingStore {
    pub groups: Vec<DuplicateGroup>,
    pub missing: Vec<String>,
    pub fail_uploads: bool,
    pub removals: Mutex<Vec<Vec<String>>>,
    pub uploads: Mutex<Vec<Vec<MergeBaseRecord>>>,
}

impl RecordingStore {
    pub fn removal_calls(&self) -> Vec<Vec<String>> {
        self.removals.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<Vec<MergeBaseRecord>> {
        self.uploads.lock().unwrap().clone()
    }
}

impl MergeBaseStore for RecordingStore {
    fn duplicate_groups(&self) -> Result<Vec<DuplicateGroup>> {
        Ok(self.groups.clone())
    }

    fn remove_merge_bases(&self, ids: &[String]) -> Result<()> {
        self.removals.lock().unwrap().push(ids.to_vec());
        Ok(())
    }

    fn shas_missing_merge_base(&self) -> Result<Vec<String>> {
        Ok(self.missing.clone())
    }

    fn upload_merge_bases(&self, records: &[MergeBaseRecord]) -> Result<()> {
        if self.fail_uploads {
            anyhow::bail!("store unavailable");
        }
        self.uploads.lock().unwrap().push(records.to_vec());
        Ok(())
    }
}
