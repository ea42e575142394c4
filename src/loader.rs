// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Build configuration loading.
//!
//! Fetch the build configuration file from the plugin repository at a given
//! ref, and parse it into whichever typed view the caller asks for. Both a
//! missing file and a malformed file are fatal, there is no fallback.

use crate::{
    config::{ConfigError, BUILD_CONFIG_FILE},
    host::{HostError, RepoHost},
};

use std::str::FromStr;
use tracing::{debug, instrument};

/// Load build configuration from plugin repository.
///
/// Uses the default branch if `reference` is `None`, otherwise the tag or
/// branch named by it.
///
/// # Errors
///
/// - Return [`LoadError::Host`] if the file cannot be fetched.
/// - Return [`LoadError::Config`] if the file cannot be parsed.
#[instrument(skip(host), level = "debug")]
pub async fn load_build_config<H, T>(host: &H, reference: Option<&str>) -> Result<T>
where
    H: RepoHost + ?Sized,
    T: FromStr<Err = ConfigError>,
{
    let file = host.fetch_file(BUILD_CONFIG_FILE, reference).await?;
    debug!("loaded {BUILD_CONFIG_FILE} at revision {}", file.sha);

    file.text().parse().map_err(|source| LoadError::Config {
        reference: reference.unwrap_or("default branch").into(),
        source,
    })
}

/// Build configuration loading error types.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Build configuration cannot be fetched.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Build configuration cannot be parsed.
    #[error("invalid build.yaml at {reference}")]
    Config {
        reference: String,
        #[source]
        source: ConfigError,
    },
}

/// Friendly result alias :3
type Result<T, E = LoadError> = std::result::Result<T, E>;
