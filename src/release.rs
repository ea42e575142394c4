// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Release enumeration and metadata extraction.
//!
//! Every release of the plugin repository that survives filtering becomes
//! exactly one [`VersionRecord`] in the generated manifest.
//!
//! # Filtering
//!
//! Draft releases never make it into the manifest. Pre-releases only make it
//! in when the caller has not asked to ignore them. The order the hosting
//! service lists releases in is kept as is.
//!
//! # Release Assets
//!
//! Each release is scanned for three kinds of assets in a single pass:
//!
//! 1. A ".zip" archive, whose download URL becomes the source URL.
//! 2. A ".md5" file, whose first 32 characters become the checksum.
//! 3. A "build.yaml" file, which overrides the build configuration committed
//!    at the release tag.
//!
//! If more than one asset of a kind exists, the last one listed wins. Failing
//! to download or read an asset is never fatal. The failure is logged and the
//! field it would have filled in stays empty, or in the case of "build.yaml",
//! the build configuration at the release tag is kept.

use crate::{
    config::{ReleaseConfig, BUILD_CONFIG_FILE},
    host::{Release, RepoHost},
    loader::{load_build_config, LoadError},
    manifest::VersionRecord,
};

use tracing::{debug, error, info, instrument};

/// Number of characters of the checksum file that make up the checksum.
pub const CHECKSUM_LEN: usize = 32;

/// Decides which releases make it into the manifest.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub struct ReleaseFilter {
    ignore_prereleases: bool,
}

impl ReleaseFilter {
    /// Construct new release filter.
    pub fn new(ignore_prereleases: bool) -> Self {
        Self { ignore_prereleases }
    }

    /// Check if release should become a manifest version.
    pub fn accepts(&self, release: &Release) -> bool {
        if release.draft {
            debug!("skip draft release {}", release.tag_name);
            return false;
        }

        if release.prerelease && self.ignore_prereleases {
            debug!("skip pre-release {}", release.tag_name);
            return false;
        }

        true
    }

    /// Keep only accepted releases, preserving their order.
    pub fn apply(&self, releases: impl IntoIterator<Item = Release>) -> Vec<Release> {
        releases
            .into_iter()
            .filter(|release| self.accepts(release))
            .collect()
    }
}

/// List releases of plugin repository that pass the filter.
///
/// # Errors
///
/// - Return [`ExtractError::Host`] if releases cannot be listed.
#[instrument(skip(host), level = "debug")]
pub async fn list_releases<H>(host: &H, filter: ReleaseFilter) -> Result<Vec<Release>>
where
    H: RepoHost + ?Sized,
{
    let releases = host.list_releases().await?;
    let total = releases.len();
    let releases = filter.apply(releases);
    info!("found {} of {total} releases to publish", releases.len());

    Ok(releases)
}

/// Turns releases into manifest versions.
#[derive(Debug)]
pub struct ReleaseExtractor<'h, H: ?Sized> {
    host: &'h H,
}

impl<'h, H> ReleaseExtractor<'h, H>
where
    H: RepoHost + ?Sized,
{
    /// Construct new release extractor.
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Extract version record out of release.
    ///
    /// # Errors
    ///
    /// - Return [`ExtractError::Load`] if build configuration at the release
    ///   tag cannot be loaded. Asset failures are logged instead.
    #[instrument(skip(self, release), fields(tag = %release.tag_name), level = "debug")]
    pub async fn extract(&self, release: &Release) -> Result<VersionRecord> {
        info!("extract version information of release {}", release.tag_name);
        let mut config: ReleaseConfig =
            load_build_config(self.host, Some(release.tag_name.as_str())).await?;
        let mut checksum = String::new();
        let mut source_url = String::new();

        for asset in &release.assets {
            if asset.name.ends_with(".zip") {
                debug!("found plugin archive {}", asset.name);
                source_url = asset.browser_download_url.clone();
            }

            if asset.name.ends_with(".md5") {
                match self.host.download(&asset.browser_download_url).await {
                    Ok(data) => checksum = checksum_prefix(&data),
                    Err(error) => error!("failed to download plugin checksum: {error}"),
                }
            }

            if asset.name == BUILD_CONFIG_FILE {
                info!(
                    "found release asset {BUILD_CONFIG_FILE}, using that instead of {}/{BUILD_CONFIG_FILE}",
                    release.tag_name
                );
                if let Some(asset_config) = self.asset_config(&asset.browser_download_url).await {
                    config = asset_config;
                }
            }
        }

        Ok(VersionRecord {
            changelog: release.body.clone().unwrap_or_default(),
            checksum,
            source_url,
            target_abi: config.target_abi,
            timestamp: release.published_at.clone().unwrap_or_default(),
            version: config.version,
        })
    }

    async fn asset_config(&self, url: &str) -> Option<ReleaseConfig> {
        let data = match self.host.download(url).await {
            Ok(data) => data,
            Err(error) => {
                error!("failed to download plugin build configuration: {error}");
                return None;
            }
        };

        match String::from_utf8_lossy(&data).parse() {
            Ok(config) => Some(config),
            Err(error) => {
                error!("failed to parse plugin build configuration: {error}");
                None
            }
        }
    }
}

/// Leading characters of checksum file content.
///
/// Checksum files usually hold the digest followed by the file name, so only
/// the first [`CHECKSUM_LEN`] characters are the digest.
pub fn checksum_prefix(data: &[u8]) -> String {
    String::from_utf8_lossy(data)
        .chars()
        .take(CHECKSUM_LEN)
        .collect()
}

/// Release extraction error types.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Releases cannot be listed.
    #[error(transparent)]
    Host(#[from] crate::host::HostError),

    /// Build configuration at release tag cannot be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Friendly result alias :3
type Result<T, E = ExtractError> = std::result::Result<T, E>;
