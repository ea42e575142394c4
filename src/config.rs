// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout for the plugin build configuration file, and the run
//! inputs that plugrepo is invoked with. Fetching the build configuration from
//! the hosting service is left to the [`loader`](crate::loader).
//!
//! # Build Configuration
//!
//! Every plugin repository carries a __build configuration__ at its top-level
//! named "build.yaml". It is a flat YAML mapping that describes the plugin as
//! a whole, e.g., its name, owner, unique identifier, etc., along with the
//! version and target ABI of the tree it was committed in. Plugrepo reads it
//! twice over: once at the default branch for the plugin's identity, and once
//! per release for that release's version information.
//!
//! Both reads are strongly typed. A build configuration missing any field the
//! caller needs is rejected outright rather than leaking empty values into the
//! generated manifest. Fields plugrepo does not care about are ignored.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Name of the build configuration file in the plugin repository.
///
/// Release assets with this exact name override the build configuration found
/// at the release tag.
pub const BUILD_CONFIG_FILE: &str = "build.yaml";

/// Static identity of a plugin.
///
/// Loaded once per run from the build configuration at the default branch.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct PluginIdentity {
    /// Unique identifier of the plugin.
    pub guid: String,

    /// Display name of the plugin.
    pub name: String,

    /// Category the plugin is listed under.
    pub category: String,

    /// One sentence description of the plugin.
    pub description: String,

    /// Longer overview text of the plugin.
    pub overview: String,

    /// Owner of the plugin.
    pub owner: String,
}

impl FromStr for PluginIdentity {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(data)?)
    }
}

/// Per-release version information.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ReleaseConfig {
    /// Version of the plugin at this release.
    pub version: String,

    /// Host ABI version the release was built against.
    #[serde(rename = "targetAbi")]
    pub target_abi: String,
}

impl FromStr for ReleaseConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(data)?)
    }
}

/// Repository identifier in `owner/repo` form.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RepoSlug {
    /// Account or organization owning the repository.
    pub owner: String,

    /// Name of the repository.
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self {
                    owner: owner.into(),
                    repo: repo.into(),
                })
            }
            _ => Err(ConfigError::InvalidRepository(data.into())),
        }
    }
}

impl Display for RepoSlug {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{}/{}", self.owner, self.repo)
    }
}

/// Parse boolean run input.
///
/// Follows the boolean input grammar of GitHub Actions, i.e., the YAML 1.2
/// core schema booleans. Nothing else is accepted.
///
/// # Errors
///
/// - Return [`ConfigError::InvalidBoolean`] if input is not a boolean.
pub fn parse_boolean_input(input: &str) -> Result<bool> {
    match input.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean(input.into())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize build configuration.
    #[error(transparent)]
    Deserialize(#[from] serde_yaml::Error),

    /// Repository identifier is not in `owner/repo` form.
    #[error("invalid repository {0:?}, expected owner/repo")]
    InvalidRepository(String),

    /// Boolean input is not one of the accepted spellings.
    #[error("invalid boolean input {0:?}, expected one of true, True, TRUE, false, False, FALSE")]
    InvalidBoolean(String),
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
