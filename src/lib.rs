// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Plugin repository manifest generator.
//!
//! Plugrepo regenerates the plugin repository manifest of a plugin out of the
//! releases of its source repository, and commits the result back to the
//! branch the manifest is served from. It is meant to run as a CI step after
//! every release.

pub mod config;
pub mod generate;
pub mod host;
pub mod loader;
pub mod manifest;
pub mod publish;
pub mod release;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{PluginIdentity, ReleaseConfig, RepoSlug};
pub use generate::{GenerateError, GenerateOptions, Generator};
pub use host::{GithubHost, RepoHost};
pub use manifest::{PluginManifest, PluginRepository, VersionRecord};
