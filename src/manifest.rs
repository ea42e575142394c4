// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Plugin repository manifest layout.
//!
//! A __plugin repository manifest__ is the JSON document plugin hosts read to
//! find out which plugins a repository offers, and which versions of them can
//! be installed. Its top-level is a list of plugins. Plugrepo always generates
//! a manifest holding exactly one plugin.
//!
//! # Deterministic Output
//!
//! The manifest is committed back into a repository, so regenerating it from
//! unchanged releases must produce the exact same bytes. Keys of every object
//! are emitted in alphabetical order, indentation is fixed to two spaces, and
//! versions are always sorted newest first.

use crate::{config::PluginIdentity, version::compare_versions};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Error as FmtError, Formatter, Result as FmtResult};

/// Installable version of a plugin.
///
/// Fields are declared in alphabetical order of their serialized keys.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct VersionRecord {
    /// Release notes of the version.
    pub changelog: String,

    /// MD5 checksum of the plugin archive, empty if unknown.
    pub checksum: String,

    /// Download URL of the plugin archive, empty if unknown.
    #[serde(rename = "sourceUrl")]
    pub source_url: String,

    /// Host ABI version the plugin archive was built against.
    #[serde(rename = "targetAbi")]
    pub target_abi: String,

    /// Publish time of the release.
    pub timestamp: String,

    /// Plugin version.
    pub version: String,
}

/// Single plugin entry of the manifest.
///
/// Fields are declared in alphabetical order of their serialized keys.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct PluginManifest {
    pub category: String,
    pub description: String,
    pub guid: String,
    pub name: String,
    pub overview: String,
    pub owner: String,

    /// Available versions, newest first.
    pub versions: Vec<VersionRecord>,
}

impl PluginManifest {
    /// Construct new plugin entry out of its identity and versions.
    ///
    /// Versions are sorted newest first.
    pub fn new(identity: PluginIdentity, mut versions: Vec<VersionRecord>) -> Self {
        sort_versions(&mut versions);

        Self {
            category: identity.category,
            description: identity.description,
            guid: identity.guid,
            name: identity.name,
            overview: identity.overview,
            owner: identity.owner,
            versions,
        }
    }
}

/// Full plugin repository manifest.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PluginRepository(Vec<PluginManifest>);

impl PluginRepository {
    /// Plugins listed by the manifest.
    pub fn plugins(&self) -> &[PluginManifest] {
        &self.0
    }

    /// Render manifest as pretty printed JSON.
    ///
    /// # Errors
    ///
    /// - Return [`ManifestError::Serialize`] if serialization fails.
    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<PluginManifest> for PluginRepository {
    fn from(plugin: PluginManifest) -> Self {
        Self(vec![plugin])
    }
}

impl Display for PluginRepository {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.render()?.as_str())
    }
}

/// Sort versions newest first.
///
/// Versions comparing equal keep their relative order.
pub fn sort_versions(versions: &mut [VersionRecord]) {
    versions.sort_by(|lhs, rhs| compare_versions(&rhs.version, &lhs.version));
}

/// Manifest error types.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Failed to serialize manifest.
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl From<ManifestError> for FmtError {
    fn from(_: ManifestError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ManifestError> = std::result::Result<T, E>;
