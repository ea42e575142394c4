// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Source-control hosting service access.
//!
//! Plugrepo never touches a local clone of the plugin repository. Everything
//! it needs, i.e., file content at a ref, the release listing, release assets,
//! and the ability to commit a single file, comes through the hosting
//! service's API. The [`RepoHost`] trait is the layer of indirection over that
//! API, so the rest of the pipeline stays oblivious to which service sits
//! behind it.
//!
//! All calls are sequential. Plugrepo performs no retries of its own, so
//! whatever the implementation returns is final.

mod github;
mod model;

pub use github::{GithubHost, DEFAULT_API_URL};
pub use model::{Asset, FileUpdate, Release, RemoteFile, Signature};

use async_trait::async_trait;
use reqwest::StatusCode;

/// Layer of indirection for hosting service access.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Fetch file at `path`, from `reference` or the default branch.
    async fn fetch_file(&self, path: &str, reference: Option<&str>) -> Result<RemoteFile>;

    /// Current revision of file at `path`, without reading its content.
    async fn file_revision(&self, path: &str, reference: Option<&str>) -> Result<String>;

    /// List every release of the repository in the order the service gives.
    async fn list_releases(&self) -> Result<Vec<Release>>;

    /// Download content at arbitrary URL, e.g., a release asset.
    async fn download(&self, url: &str) -> Result<Vec<u8>>;

    /// Create or update a single file in one commit.
    async fn update_file(&self, update: &FileUpdate) -> Result<()>;
}

/// All possible error types for hosting service interaction.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Request could not be sent or its response could not be read.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Service answered with something other than success.
    #[error("{url} returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: StatusCode,
        message: String,
    },

    /// Target path exists, but is not a regular file.
    #[error("{0:?} is not a file")]
    NotAFile(String),

    /// File content comes in an encoding other than base64.
    #[error("{path:?} has unsupported content encoding {encoding:?}")]
    Encoding { path: String, encoding: String },

    /// File content is not valid base64.
    #[error(transparent)]
    Decode(#[from] base64::DecodeError),

    /// Response body does not have the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Access token cannot be sent as a header.
    #[error(transparent)]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// API base URL cannot be parsed.
    #[error("invalid API URL {0:?}")]
    InvalidApiUrl(String),
}

/// Friendly result alias :3
pub type Result<T, E = HostError> = std::result::Result<T, E>;
