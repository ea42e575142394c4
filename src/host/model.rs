// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Wire types exchanged with the hosting service.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Published (or draft) release of the plugin repository.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Release {
    pub tag_name: String,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub prerelease: bool,

    /// Release notes. The API reports `null` for releases without notes.
    #[serde(default)]
    pub body: Option<String>,

    /// Publish time. Only drafts lack one.
    #[serde(default)]
    pub published_at: Option<String>,

    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// File attached to a release.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// File content at some ref of the repository.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct RemoteFile {
    pub path: String,

    /// Blob revision of the file, required to update it later.
    pub sha: String,

    /// Raw file content.
    pub content: Vec<u8>,
}

impl RemoteFile {
    /// Treat content as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Name and email pair recorded on a commit.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

/// Single commit that creates or replaces one file on a branch.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FileUpdate {
    pub path: String,
    pub branch: String,
    pub message: String,
    pub content: Vec<u8>,

    /// Revision of the file being replaced, `None` to create it.
    pub sha: Option<String>,
    pub committer: Signature,
    pub author: Signature,
}

impl FileUpdate {
    /// Content in the base64 form the contents API expects.
    pub fn encoded_content(&self) -> String {
        STANDARD.encode(&self.content)
    }
}
