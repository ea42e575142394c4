// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! GitHub REST API access.

use crate::{
    config::RepoSlug,
    host::{
        model::{FileUpdate, Release, RemoteFile, Signature},
        HostError, RepoHost, Result,
    },
};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Response, StatusCode, Url,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Base URL of the public GitHub API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page size the releases endpoint allows.
const RELEASES_PER_PAGE: usize = 100;

/// Hosting service access through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubHost {
    client: Client,
    api_url: Url,
    slug: RepoSlug,
}

impl GithubHost {
    /// Construct new GitHub access for repository at target API base URL.
    ///
    /// GitHub Enterprise instances serve their API below `/api/v3` of the
    /// instance itself, so the base URL may carry a path.
    ///
    /// # Errors
    ///
    /// - Return [`HostError::InvalidApiUrl`] if API URL is not a usable base.
    /// - Return [`HostError::Header`] if token cannot be used as header.
    /// - Return [`HostError::Http`] if HTTP client cannot be built.
    pub fn with_api_url(
        token: impl AsRef<str>,
        slug: RepoSlug,
        api_url: impl AsRef<str>,
    ) -> Result<Self> {
        let api_url = Url::parse(api_url.as_ref())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| HostError::InvalidApiUrl(api_url.as_ref().into()))?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.as_ref()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_url,
            slug,
        })
    }

    fn repo_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| HostError::InvalidApiUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(["repos", self.slug.owner.as_str(), self.slug.repo.as_str()])
            .extend(segments);

        Ok(url)
    }

    fn contents_url(&self, path: &str) -> Result<Url> {
        self.repo_url(
            std::iter::once("contents").chain(path.split('/').filter(|part| !part.is_empty())),
        )
    }

    async fn fetch_entry(&self, path: &str, reference: Option<&str>) -> Result<ContentEntry> {
        let mut url = self.contents_url(path)?;
        if let Some(reference) = reference {
            url.query_pairs_mut().append_pair("ref", reference);
        }

        debug!("fetch {url}");
        let response = check_status(self.client.get(url).send().await?).await?;
        let value = response.json::<serde_json::Value>().await?;

        // INVARIANT: Directories come back as a listing of entries.
        if value.is_array() {
            return Err(HostError::NotAFile(path.into()));
        }

        let entry = serde_json::from_value::<ContentEntry>(value)?;
        if entry.kind != "file" {
            return Err(HostError::NotAFile(path.into()));
        }

        Ok(entry)
    }
}

#[async_trait]
impl RepoHost for GithubHost {
    #[instrument(skip(self), level = "debug")]
    async fn fetch_file(&self, path: &str, reference: Option<&str>) -> Result<RemoteFile> {
        let entry = self.fetch_entry(path, reference).await?;
        if entry.encoding.as_deref() != Some("base64") {
            return Err(HostError::Encoding {
                path: entry.path,
                encoding: entry.encoding.unwrap_or_default(),
            });
        }

        // INVARIANT: The API wraps base64 content into lines, so strip them.
        let encoded = entry
            .content
            .unwrap_or_default()
            .chars()
            .filter(|ch| !ch.is_ascii_whitespace())
            .collect::<String>();

        Ok(RemoteFile {
            path: entry.path,
            sha: entry.sha,
            content: STANDARD.decode(encoded)?,
        })
    }

    #[instrument(skip(self), level = "debug")]
    async fn file_revision(&self, path: &str, reference: Option<&str>) -> Result<String> {
        // Files above 1 MB come back with encoding "none" and no content, but
        // the revision is always present.
        Ok(self.fetch_entry(path, reference).await?.sha)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_releases(&self) -> Result<Vec<Release>> {
        let mut releases = Vec::new();
        let mut page = 1usize;

        loop {
            let mut url = self.repo_url(["releases"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &RELEASES_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            debug!("list releases page {page}");
            let response = check_status(self.client.get(url).send().await?).await?;
            let batch = response.json::<Vec<Release>>().await?;
            let exhausted = batch.len() < RELEASES_PER_PAGE;
            releases.extend(batch);

            if exhausted {
                break;
            }
            page += 1;
        }

        debug!("listed {} releases", releases.len());
        Ok(releases)
    }

    #[instrument(skip(self), level = "debug")]
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/octet-stream")
            .send()
            .await?;

        // INVARIANT: Only a plain 200 counts as a successful download.
        if response.status() != StatusCode::OK {
            return Err(status_error(response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }

    #[instrument(skip(self, update), fields(path = %update.path, branch = %update.branch), level = "debug")]
    async fn update_file(&self, update: &FileUpdate) -> Result<()> {
        let url = self.contents_url(&update.path)?;
        let body = UpdateRequest {
            message: &update.message,
            content: update.encoded_content(),
            sha: update.sha.as_deref(),
            branch: &update.branch,
            committer: &update.committer,
            author: &update.author,
        };

        debug!("put {url}");
        check_status(self.client.put(url).json(&body).send().await?).await?;

        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    Err(status_error(response).await)
}

async fn status_error(response: Response) -> HostError {
    let url = response.url().to_string();
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|error| error.message)
        .unwrap_or(body);

    HostError::Status {
        url,
        status,
        message,
    }
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    path: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
    committer: &'a Signature,
    author: &'a Signature,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_host(server: &MockServer) -> GithubHost {
        let slug = RepoSlug {
            owner: "jellyfin".into(),
            repo: "jellyfin-plugin-foo".into(),
        };
        GithubHost::with_api_url("t0k3n", slug, server.uri()).expect("valid host")
    }

    fn release_json(tag: &str) -> serde_json::Value {
        json!({
            "tag_name": tag,
            "draft": false,
            "prerelease": false,
            "body": format!("release {tag}"),
            "published_at": "2024-01-01T00:00:00Z",
            "assets": [],
        })
    }

    #[tokio::test]
    async fn fetch_file_decodes_wrapped_base64() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        let encoded = STANDARD.encode("version: \"1.0.0\"\ntargetAbi: \"10.8.0.0\"\n");
        let (head, tail) = encoded.split_at(12);

        Mock::given(method("GET"))
            .and(path("/repos/jellyfin/jellyfin-plugin-foo/contents/build.yaml"))
            .and(query_param("ref", "v1.0.0"))
            .and(header("authorization", "Bearer t0k3n"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "file",
                "encoding": "base64",
                "path": "build.yaml",
                "sha": "abc123",
                "content": format!("{head}\n{tail}\n"),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = test_host(&server)
            .fetch_file("build.yaml", Some("v1.0.0"))
            .await?;
        assert_eq!(file.sha, "abc123");
        assert_eq!(file.text(), "version: \"1.0.0\"\ntargetAbi: \"10.8.0.0\"\n");

        Ok(())
    }

    #[tokio::test]
    async fn fetch_file_rejects_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jellyfin/jellyfin-plugin-foo/contents/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"type": "file", "path": "docs/a.md", "sha": "1"},
            ])))
            .mount(&server)
            .await;

        let result = test_host(&server).fetch_file("docs", None).await;
        assert!(matches!(result, Err(HostError::NotAFile(_))));
    }

    #[tokio::test]
    async fn fetch_file_reports_missing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jellyfin/jellyfin-plugin-foo/contents/build.yaml"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
            })))
            .mount(&server)
            .await;

        let result = test_host(&server).fetch_file("build.yaml", None).await;
        match result {
            Err(HostError::Status {
                status, message, ..
            }) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_revision_skips_large_file_content() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jellyfin/jellyfin-plugin-foo/contents/manifest.json"))
            .and(query_param("ref", "heads/gh-pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "file",
                "encoding": "none",
                "path": "manifest.json",
                "sha": "abc",
                "content": "",
            })))
            .mount(&server)
            .await;

        let host = test_host(&server);
        let revision = host
            .file_revision("manifest.json", Some("heads/gh-pages"))
            .await?;
        assert_eq!(revision, "abc");

        let result = host.fetch_file("manifest.json", Some("heads/gh-pages")).await;
        assert!(matches!(
            result,
            Err(HostError::Encoding { encoding, .. }) if encoding == "none"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn list_releases_follows_pages_in_order()-> anyhow::Result<()> {
        let server = MockServer::start().await;
        let first = (0..RELEASES_PER_PAGE)
            .map(|n| release_json(&format!("1.0.{n}")))
            .collect::<Vec<_>>();

        Mock::given(method("GET"))
            .and(path("/repos/jellyfin/jellyfin-plugin-foo/releases"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(first))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/jellyfin/jellyfin-plugin-foo/releases"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([release_json("0.9.0")])))
            .expect(1)
            .mount(&server)
            .await;

        let releases = test_host(&server).list_releases().await?;
        assert_eq!(releases.len(), RELEASES_PER_PAGE + 1);
        assert_eq!(releases[0].tag_name, "1.0.0");
        assert_eq!(releases[RELEASES_PER_PAGE].tag_name, "0.9.0");

        Ok(())
    }

    #[tokio::test]
    async fn list_releases_accepts_null_body() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/jellyfin/jellyfin-plugin-foo/releases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "tag_name": "2.0.0",
                "draft": true,
                "prerelease": false,
                "body": null,
                "published_at": null,
                "assets": [],
            }])))
            .mount(&server)
            .await;

        let releases = test_host(&server).list_releases().await?;
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].body, None);
        assert!(releases[0].draft);

        Ok(())
    }

    #[tokio::test]
    async fn download_requires_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/download/plugin.md5"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let url = format!("{}/download/plugin.md5", server.uri());
        let result = test_host(&server).download(&url).await;
        assert!(matches!(
            result,
            Err(HostError::Status { status, .. }) if status == StatusCode::NO_CONTENT
        ));
    }

    #[tokio::test]
    async fn update_file_sends_encoded_commit() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        let bot = Signature {
            name: "bot".into(),
            email: "bot@example.com".into(),
        };

        Mock::given(method("PUT"))
            .and(path("/repos/jellyfin/jellyfin-plugin-foo/contents/repo/manifest.json"))
            .and(body_json(json!({
                "message": "update",
                "content": STANDARD.encode("[]"),
                "sha": "deadbeef",
                "branch": "gh-pages",
                "committer": {"name": "bot", "email": "bot@example.com"},
                "author": {"name": "bot", "email": "bot@example.com"},
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let update = FileUpdate {
            path: "repo/manifest.json".into(),
            branch: "gh-pages".into(),
            message: "update".into(),
            content: b"[]".to_vec(),
            sha: Some("deadbeef".into()),
            committer: bot.clone(),
            author: bot,
        };
        test_host(&server).update_file(&update).await?;

        Ok(())
    }

    #[tokio::test]
    async fn update_file_reports_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "message": "manifest.json does not match deadbeef",
            })))
            .mount(&server)
            .await;

        let bot = Signature {
            name: "bot".into(),
            email: "bot@example.com".into(),
        };
        let update = FileUpdate {
            path: "manifest.json".into(),
            branch: "gh-pages".into(),
            message: "update".into(),
            content: b"[]".to_vec(),
            sha: Some("deadbeef".into()),
            committer: bot.clone(),
            author: bot,
        };

        let result = test_host(&server).update_file(&update).await;
        assert!(matches!(
            result,
            Err(HostError::Status { status, .. }) if status == StatusCode::CONFLICT
        ));
    }

    #[test]
    fn reject_unusable_api_url() {
        let slug = RepoSlug {
            owner: "a".into(),
            repo: "b".into(),
        };
        let result = GithubHost::with_api_url("t0k3n", slug, "mailto:nobody@example.com");
        assert!(matches!(result, Err(HostError::InvalidApiUrl(_))));
    }
}
