// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Repository operations.

use crate::error::{CommitError, CplError, GitError, Result};
use git2::{Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with additional functionality.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Open a repository from the current directory.
    pub fn open_current() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            CplError::Git(GitError::OpenFailed {
                message: format!("Failed to get current directory: {}", e),
            })
        })?;
        Self::open(&current_dir)
    }

    /// Open a repository from a path.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                CplError::Git(GitError::NotARepository)
            } else {
                CplError::Git(GitError::OpenFailed {
                    message: e.message().to_string(),
                })
            }
        })?;

        Ok(Self { inner: repo })
    }

    /// Get the git directory path (.git).
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    /// Path of the message file git hands to the `commit-msg` hook.
    pub fn commit_editmsg_path(&self) -> PathBuf {
        self.git_dir().join("COMMIT_EDITMSG")
    }

    /// Get a commit by reference (SHA, branch name, etc.).
    pub fn get_commit(&self, reference: &str) -> Result<git2::Commit<'_>> {
        let obj = self.inner.revparse_single(reference).map_err(|e| {
            CplError::Git(GitError::InvalidReference {
                reference: format!("{}: {}", reference, e.message()),
            })
        })?;

        let commit = obj.peel_to_commit().map_err(|e| {
            CplError::Git(GitError::InvalidReference {
                reference: format!("{}: {}", reference, e.message()),
            })
        })?;

        Ok(commit)
    }

    /// Get the commit message for a reference.
    pub fn get_commit_message(&self, reference: &str) -> Result<String> {
        let commit = self.get_commit(reference)?;
        message_of(&commit)
    }

    /// Get commits in a range, newest first.
    ///
    /// `from..to` walks the commits reachable from `to` but not from `from`.
    /// A single reference yields that commit only.
    pub fn get_commits_in_range(&self, range: &str) -> Result<Vec<(Oid, String)>> {
        let Some((from, to)) = range.split_once("..") else {
            let commit = self.get_commit(range)?;
            return Ok(vec![(commit.id(), message_of(&commit)?)]);
        };

        if from.is_empty() || to.is_empty() || to.starts_with('.') {
            return Err(CplError::Git(GitError::InvalidReference {
                reference: range.to_string(),
            }));
        }

        let from = self.get_commit(from)?;
        let to = self.get_commit(to)?;

        let mut revwalk = self.inner.revwalk().map_err(|e| revwalk_error("revwalk", e))?;
        revwalk
            .push(to.id())
            .map_err(|e| revwalk_error("revwalk.push", e))?;
        revwalk
            .hide(from.id())
            .map_err(|e| revwalk_error("revwalk.hide", e))?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.map_err(|e| revwalk_error("revwalk", e))?;
            let commit = self.inner.find_commit(oid).map_err(|e| {
                CplError::Git(GitError::InvalidReference {
                    reference: format!("{}: {}", oid, e.message()),
                })
            })?;
            commits.push((oid, message_of(&commit)?));
        }

        tracing::debug!(range, count = commits.len(), "Collected commits in range");

        Ok(commits)
    }
}

fn revwalk_error(command: &str, e: git2::Error) -> CplError {
    CplError::Git(GitError::CommandFailed {
        command: command.to_string(),
        message: e.message().to_string(),
    })
}

/// Commit message as UTF-8; anything else is refused rather than skipped.
fn message_of(commit: &git2::Commit<'_>) -> Result<String> {
    commit.message().map(str::to_string).ok_or_else(|| {
        CplError::Commit(CommitError::InvalidEncoding {
            source_name: commit.id().to_string(),
        })
    })
}

/// Open the repository from the current directory.
pub fn open_repo() -> Result<Repository> {
    Repository::open_current()
}

/// Resolve a reference to a full commit SHA.
pub fn resolve_commit(reference: &str) -> Result<String> {
    let repo = Repository::open_current()?;
    let commit = repo.get_commit(reference)?;
    Ok(commit.id().to_string())
}

/// Get the commit message for a reference.
pub fn get_commit_message(reference: &str) -> Result<String> {
    let repo = Repository::open_current()?;
    repo.get_commit_message(reference)
}

/// Get commits in a range.
pub fn get_commit_range(range: &str) -> Result<Vec<(String, String)>> {
    let repo = Repository::open_current()?;
    let commits = repo.get_commits_in_range(range)?;
    Ok(commits
        .into_iter()
        .map(|(oid, msg)| (oid.to_string(), msg))
        .collect())
}
