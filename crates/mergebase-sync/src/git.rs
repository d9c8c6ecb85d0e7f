//! Git command runner bound to one checkout

use anyhow::{Context, Result};
use git2::Repository;
use mergebase_core::is_commit_id;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Remote that commits are fetched from
const REMOTE: &str = "origin";

/// Failure of a single git invocation
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Failed to run `git {command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`git {command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("`git {command}` produced non-UTF-8 output")]
    NonUtf8 { command: String },

    #[error("Unexpected output from `git {command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },
}

/// Accessor for a local checkout; every command runs with `root` as its
/// working directory.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Opens the checkout at `root`, failing if it is not a git repository
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Repository::open(root.as_ref())
            .with_context(|| format!("Failed to open repository at {:?}", root.as_ref()))?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs `git <args>` and returns its trimmed standard output
    pub fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = args.join(" ");
        log::debug!("git {}", command);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout)
            .map(|s| s.trim().to_string())
            .map_err(|_| GitError::NonUtf8 { command })
    }

    /// `git merge-base <a> <b>`
    pub fn merge_base(&self, a: &str, b: &str) -> Result<String, GitError> {
        self.run(&["merge-base", a, b])
    }

    /// First parent of `sha`
    pub fn parent(&self, sha: &str) -> Result<String, GitError> {
        self.run(&["rev-parse", &format!("{}^", sha)])
    }

    /// Paths that differ between two commits, in the order git prints them
    pub fn changed_files(&self, from: &str, to: &str) -> Result<Vec<String>, GitError> {
        let output = self.run(&["diff", from, to, "--name-only"])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// Committer time of `sha` as Unix epoch seconds
    pub fn commit_time(&self, sha: &str) -> Result<i64, GitError> {
        let args = ["show", "--no-patch", "--format=%ct", sha];
        let output = self.run(&args)?;
        output
            .parse()
            .map_err(|_| GitError::UnexpectedOutput {
                command: args.join(" "),
                output,
            })
    }

    /// Fetches `shas` from `origin` in a single call, without tags.
    ///
    /// Ids that are not hex object names are skipped. Returns the number of
    /// commits requested.
    pub fn fetch_commits(&self, shas: &[String]) -> Result<usize, GitError> {
        let mut args = vec![
            "-c",
            "protocol.version=2",
            "fetch",
            "--no-tags",
            "--prune",
            "--quiet",
            "--no-recurse-submodules",
            REMOTE,
        ];
        let before = args.len();
        for sha in shas {
            if is_commit_id(sha) {
                args.push(sha.as_str());
            } else {
                log::warn!("Skipping fetch of invalid commit id {:?}", sha);
            }
        }

        let requested = args.len() - before;
        if requested == 0 {
            return Ok(0);
        }
        self.run(&args)?;
        Ok(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_rejects_plain_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(GitRepo::open(tmp.path()).is_err());
    }

    #[test]
    fn test_failed_command_reports_stderr() {
        let tmp = TempDir::new().unwrap();
        Repository::init(tmp.path()).unwrap();
        let repo = GitRepo::open(tmp.path()).unwrap();

        let err = repo.run(&["rev-parse", "does-not-exist"]).unwrap_err();
        match err {
            GitError::Failed { command, stderr, .. } => {
                assert_eq!(command, "rev-parse does-not-exist");
                assert!(!stderr.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fetch_with_only_invalid_ids_is_noop() {
        let tmp = TempDir::new().unwrap();
        Repository::init(tmp.path()).unwrap();
        let repo = GitRepo::open(tmp.path()).unwrap();

        // No `origin` remote exists, so running fetch would fail
        let shas = vec!["--all".to_string(), "HEAD~1".to_string()];
        assert_eq!(repo.fetch_commits(&shas).unwrap(), 0);
        assert_eq!(repo.fetch_commits(&[]).unwrap(), 0);
    }
}
