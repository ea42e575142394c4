// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use plugrepo::{
    config::{parse_boolean_input, RepoSlug},
    host::DEFAULT_API_URL,
    GenerateOptions, Generator, GithubHost,
};

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::process::exit;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Regenerate plugin repository manifest from GitHub releases.
///
/// Every input can also be given through the environment variables GitHub
/// Actions sets for action inputs.
#[derive(Debug, Clone, Parser)]
#[command(about, long_about, version)]
struct Cli {
    /// Token to access the GitHub API with.
    #[arg(long, env = "INPUT_GITHUBTOKEN", hide_env_values = true, value_name = "token")]
    pub github_token: String,

    /// Plugin repository to read releases from.
    #[arg(long, env = "INPUT_REPOSITORY", value_name = "owner/repo")]
    pub repository: RepoSlug,

    /// Branch to commit the manifest to.
    #[arg(long, env = "INPUT_PAGESBRANCH", value_name = "branch")]
    pub pages_branch: String,

    /// Path of the manifest file on the pages branch.
    #[arg(long, env = "INPUT_PAGESFILE", value_name = "path")]
    pub pages_file: String,

    /// Leave pre-releases out of the manifest.
    #[arg(
        long,
        env = "INPUT_IGNOREPRERELEASES",
        value_name = "bool",
        action = ArgAction::Set,
        required = true,
        value_parser = parse_boolean_input,
    )]
    pub ignore_prereleases: bool,

    /// Base URL of the GitHub API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, value_name = "url")]
    pub api_url: String,

    /// Print manifest to stdout instead of committing it.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    async fn run(self) -> Result<()> {
        info!("regenerate plugin repository of {}", self.repository);
        let host = GithubHost::with_api_url(&self.github_token, self.repository, &self.api_url)?;
        let options = GenerateOptions {
            pages_branch: self.pages_branch,
            pages_file: self.pages_file,
            ignore_prereleases: self.ignore_prereleases,
            dry_run: self.dry_run,
        };

        let rendered = Generator::new(host, options).run().await?;
        if self.dry_run {
            println!("{rendered}");
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run().await {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

async fn run() -> Result<()> {
    Cli::parse().run().await
}
