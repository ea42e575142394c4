// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Manifest publishing.
//!
//! The generated manifest replaces the existing manifest file on the pages
//! branch in a single commit. The revision of the existing file is read
//! first, and the update is conditioned on it. Anything that changes the file
//! in between makes the hosting service reject the commit, which fails the
//! run. Nothing is retried.

use crate::host::{FileUpdate, HostError, RepoHost, Signature};

use tracing::{info, instrument};

/// Commit message used for every manifest update.
pub const COMMIT_MESSAGE: &str = "Regenerate Jellyfin plugin repository.";

/// Name of the bot account commits are made as.
pub const BOT_NAME: &str = "github-actions[bot]";

/// Email of the bot account commits are made as.
pub const BOT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

/// Identity used as both author and committer.
pub fn bot_signature() -> Signature {
    Signature {
        name: BOT_NAME.into(),
        email: BOT_EMAIL.into(),
    }
}

/// Commits manifest to target file on target branch.
#[derive(Debug)]
pub struct Publisher<'h, H: ?Sized> {
    host: &'h H,
    branch: String,
    path: String,
}

impl<'h, H> Publisher<'h, H>
where
    H: RepoHost + ?Sized,
{
    /// Construct new publisher.
    pub fn new(host: &'h H, branch: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host,
            branch: branch.into(),
            path: path.into(),
        }
    }

    /// Replace manifest file with new content.
    ///
    /// # Errors
    ///
    /// - Return [`PublishError::Read`] if existing file cannot be read.
    /// - Return [`PublishError::Write`] if commit is rejected.
    #[instrument(skip(self, content), fields(branch = %self.branch, path = %self.path), level = "debug")]
    pub async fn publish(&self, content: impl Into<Vec<u8>>) -> Result<()> {
        let reference = format!("heads/{}", self.branch);
        let revision = self
            .host
            .file_revision(&self.path, Some(reference.as_str()))
            .await
            .map_err(PublishError::Read)?;

        let update = FileUpdate {
            path: self.path.clone(),
            branch: self.branch.clone(),
            message: COMMIT_MESSAGE.into(),
            content: content.into(),
            sha: Some(revision),
            committer: bot_signature(),
            author: bot_signature(),
        };
        self.host
            .update_file(&update)
            .await
            .map_err(PublishError::Write)?;
        info!("committed {} to {}", self.path, self.branch);

        Ok(())
    }
}

/// Publishing error types.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Existing manifest file cannot be read.
    #[error("cannot read current manifest file")]
    Read(#[source] HostError),

    /// Hosting service rejected the commit.
    #[error("cannot commit manifest file")]
    Write(#[source] HostError),
}

/// Friendly result alias :3
type Result<T, E = PublishError> = std::result::Result<T, E>;
