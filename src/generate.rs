// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Plugin repository manifest generation.
//!
//! Ties every stage together into one strictly sequential run:
//!
//! 1. Load plugin identity from the build configuration at the default branch.
//! 2. List releases, and drop the ones the manifest should not carry.
//! 3. Extract one version record per remaining release.
//! 4. Sort versions newest first, and assemble the manifest.
//! 5. Render the manifest, and commit it to the pages branch.
//!
//! The first fatal error aborts the run before anything is committed. No state
//! is carried over between runs.

use crate::{
    config::PluginIdentity,
    host::RepoHost,
    loader::{load_build_config, LoadError},
    manifest::{ManifestError, PluginManifest, PluginRepository},
    publish::{PublishError, Publisher},
    release::{list_releases, ExtractError, ReleaseExtractor, ReleaseFilter},
};

use tracing::{info, instrument};

/// Settings of a single generation run.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct GenerateOptions {
    /// Branch to commit the manifest to.
    pub pages_branch: String,

    /// Path of the manifest file on the pages branch.
    pub pages_file: String,

    /// Leave pre-releases out of the manifest.
    pub ignore_prereleases: bool,

    /// Generate the manifest without committing it.
    pub dry_run: bool,
}

/// Plugin repository manifest generator.
#[derive(Debug)]
pub struct Generator<H>
where
    H: RepoHost,
{
    host: H,
    options: GenerateOptions,
}

impl<H> Generator<H>
where
    H: RepoHost,
{
    /// Construct new generator.
    pub fn new(host: H, options: GenerateOptions) -> Self {
        Self { host, options }
    }

    /// Hosting service the generator talks to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Build manifest out of plugin repository releases.
    ///
    /// # Errors
    ///
    /// - Return [`GenerateError::Load`] if plugin identity cannot be loaded.
    /// - Return [`GenerateError::Extract`] if releases cannot be listed, or
    ///   the build configuration of any release cannot be loaded.
    #[instrument(skip(self), level = "debug")]
    pub async fn build(&self) -> Result<PluginRepository> {
        let identity: PluginIdentity = load_build_config(&self.host, None).await?;
        info!("generate manifest for plugin {} ({})", identity.name, identity.guid);

        let filter = ReleaseFilter::new(self.options.ignore_prereleases);
        let releases = list_releases(&self.host, filter).await?;

        let extractor = ReleaseExtractor::new(&self.host);
        let mut versions = Vec::with_capacity(releases.len());
        for release in &releases {
            versions.push(extractor.extract(release).await?);
        }

        Ok(PluginManifest::new(identity, versions).into())
    }

    /// Build, render, and commit manifest.
    ///
    /// Skips the commit on a dry run. Returns the rendered manifest either way.
    ///
    /// # Errors
    ///
    /// - Return [`GenerateError::Load`] or [`GenerateError::Extract`] if the
    ///   manifest cannot be built.
    /// - Return [`GenerateError::Manifest`] if the manifest cannot be rendered.
    /// - Return [`GenerateError::Publish`] if the manifest cannot be committed.
    #[instrument(skip(self), level = "debug")]
    pub async fn run(&self) -> Result<String> {
        let rendered = self.build().await?.render()?;

        if self.options.dry_run {
            info!("dry run, skip commit of {}", self.options.pages_file);
            return Ok(rendered);
        }

        Publisher::new(
            &self.host,
            self.options.pages_branch.as_str(),
            self.options.pages_file.as_str(),
        )
        .publish(rendered.as_str())
        .await?;

        Ok(rendered)
    }
}

/// Generation error types.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Plugin identity cannot be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Release versions cannot be extracted.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Manifest cannot be rendered.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Manifest cannot be committed.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Friendly result alias :3
type Result<T, E = GenerateError> = std::result::Result<T, E>;
