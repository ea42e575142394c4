// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! In-memory hosting service for unit tests.

use crate::{
    config::BUILD_CONFIG_FILE,
    host::{FileUpdate, HostError, Release, RemoteFile, RepoHost, Result},
};

use async_trait::async_trait;
use reqwest::StatusCode;
use std::{collections::HashMap, sync::Mutex};

#[derive(Debug, Default)]
pub(crate) struct FakeHost {
    files: HashMap<(String, Option<String>), RemoteFile>,
    releases: Vec<Release>,
    downloads: HashMap<String, Vec<u8>>,
    reject_updates: bool,
    pub(crate) fetches: Mutex<Vec<(String, Option<String>)>>,
    pub(crate) updates: Mutex<Vec<FileUpdate>>,
}

impl FakeHost {
    /// Place build configuration at ref, or the default branch.
    pub(crate) fn with_file(self, reference: Option<&str>, contents: &str) -> Self {
        self.with_path(BUILD_CONFIG_FILE, reference, contents, "0000")
    }

    pub(crate) fn with_path(
        mut self,
        path: &str,
        reference: Option<&str>,
        contents: &str,
        sha: &str,
    ) -> Self {
        let file = RemoteFile {
            path: path.into(),
            sha: sha.into(),
            content: contents.as_bytes().to_vec(),
        };
        self.files.insert((path.into(), reference.map(Into::into)), file);
        self
    }

    pub(crate) fn with_release(mut self, release: Release) -> Self {
        self.releases.push(release);
        self
    }

    pub(crate) fn with_download(mut self, url: &str, contents: &str) -> Self {
        self.downloads.insert(url.into(), contents.as_bytes().to_vec());
        self
    }

    pub(crate) fn rejecting_updates(mut self) -> Self {
        self.reject_updates = true;
        self
    }
}

#[async_trait]
impl RepoHost for FakeHost {
    async fn fetch_file(&self, path: &str, reference: Option<&str>) -> Result<RemoteFile> {
        let key = (path.to_string(), reference.map(Into::into));
        self.fetches.lock().unwrap().push(key.clone());
        self.files.get(&key).cloned().ok_or_else(|| HostError::Status {
            url: format!("fake://contents/{path}"),
            status: StatusCode::NOT_FOUND,
            message: "Not Found".into(),
        })
    }

    async fn file_revision(&self, path: &str, reference: Option<&str>) -> Result<String> {
        Ok(self.fetch_file(path, reference).await?.sha)
    }

    async fn list_releases(&self) -> Result<Vec<Release>> {
        Ok(self.releases.clone())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads.get(url).cloned().ok_or_else(|| HostError::Status {
            url: url.into(),
            status: StatusCode::NOT_FOUND,
            message: "Not Found".into(),
        })
    }

    async fn update_file(&self, update: &FileUpdate) -> Result<()> {
        if self.reject_updates {
            return Err(HostError::Status {
                url: format!("fake://contents/{}", update.path),
                status: StatusCode::CONFLICT,
                message: "does not match".into(),
            });
        }

        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }
}
