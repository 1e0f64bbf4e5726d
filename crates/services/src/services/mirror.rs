//! Client for mirroring site folders into a repository on the hosting
//! service.
//!
//! A site's folder is represented by a zero-content marker file at
//! `{site_name}/.gitkeep` inside the repository named after the owning node.
//! This module wraps the hosting API's contents and commits endpoints; it
//! never rolls back partial work, callers surface failures as-is.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// File name of the zero-content placeholder that keeps an otherwise-empty
/// directory visible in the repository.
const MARKER_FILE: &str = ".gitkeep";

const MARKER_CONTENT: &str = "site folder placeholder\n";

/// Errors from the hosting API. All variants are infrastructure-level
/// failures for the request that triggered them.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Request to hosting API timed out")]
    Timeout,
    #[error("Request to hosting API failed: {0}")]
    Transport(String),
    #[error("Hosting API returned error: HTTP {status} - {body}")]
    Api { status: u16, body: String },
    #[error("No commits found for the site")]
    NoCommitsFound,
    #[error("Failed to parse hosting API response: {0}")]
    Parse(String),
}

/// Metadata of the most recent commit touching a site's folder path,
/// serialized into the audit log on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSnapshot {
    pub site_name: String,
    pub commit_message: String,
    pub author_name: String,
    pub commit_time: DateTime<Utc>,
    pub recent_committer_name: String,
}

#[derive(Debug, Deserialize)]
struct ContentInfo {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RepoCommit {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    author: Option<CommitIdentity>,
    committer: Option<CommitIdentity>,
}

#[derive(Debug, Deserialize)]
struct CommitIdentity {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteContentsBody<'a> {
    message: &'a str,
    sha: &'a str,
}

/// HTTP client for the folder-mirror side of the site lifecycle.
#[derive(Clone)]
pub struct FolderMirrorClient {
    http: Client,
    api_base: String,
    owner: String,
    token: SecretString,
}

impl std::fmt::Debug for FolderMirrorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderMirrorClient")
            .field("http", &"<reqwest::Client>")
            .field("api_base", &self.api_base)
            .field("owner", &self.owner)
            .field("token", &"<secret>")
            .finish()
    }
}

impl FolderMirrorClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(owner: String, token: SecretString) -> Self {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("cms-site-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            owner,
            token,
        }
    }

    /// Point the client at a different API base URL (tests use this to talk
    /// to a mock server).
    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Path of the marker file representing a site's folder.
    pub fn marker_path(site_name: &str) -> String {
        format!("{site_name}/{MARKER_FILE}")
    }

    fn contents_url(&self, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, repo, path
        )
    }

    /// Create the folder marker for `site_name` in `repo`. When the marker
    /// already exists its current revision hash is looked up first and sent
    /// along, so a retried create updates the file instead of failing on the
    /// conflict.
    pub async fn create_folder(&self, repo: &str, site_name: &str) -> Result<(), MirrorError> {
        let path = Self::marker_path(site_name);
        let sha = self.marker_sha(repo, &path).await?;

        tracing::debug!(repo = %repo, path = %path, updating = sha.is_some(), "creating folder marker");

        let body = PutContentsBody {
            message: "Create site folder",
            content: STANDARD.encode(MARKER_CONTENT),
            sha: sha.as_deref(),
        };

        let response = self
            .http
            .put(self.contents_url(repo, &path))
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        expect_success(response).await?;
        Ok(())
    }

    /// Rename a site folder by creating the marker at the new path and then
    /// deleting the one at the old path. The hosting API has no rename
    /// primitive for contents, so a failure between the two steps leaves both
    /// markers in place; that window is accepted, not repaired.
    pub async fn rename_folder(
        &self,
        repo: &str,
        old_site_name: &str,
        new_site_name: &str,
    ) -> Result<(), MirrorError> {
        self.create_folder(repo, new_site_name).await?;
        self.delete_folder(repo, old_site_name).await
    }

    /// Delete the folder marker. A missing marker counts as success, so
    /// deletion is idempotent.
    pub async fn delete_folder(&self, repo: &str, site_name: &str) -> Result<(), MirrorError> {
        let path = Self::marker_path(site_name);

        let Some(sha) = self.marker_sha(repo, &path).await? else {
            tracing::debug!(repo = %repo, path = %path, "folder marker absent, nothing to delete");
            return Ok(());
        };

        let body = DeleteContentsBody {
            message: "Delete site folder",
            sha: &sha,
        };

        let response = self
            .http
            .delete(self.contents_url(repo, &path))
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        expect_success(response).await?;
        Ok(())
    }

    /// Most recent commit in `repo`, optionally restricted to commits
    /// touching `path_filter`. `site_name` only labels the returned snapshot.
    pub async fn latest_commit(
        &self,
        repo: &str,
        site_name: &str,
        path_filter: Option<&str>,
    ) -> Result<CommitSnapshot, MirrorError> {
        let url = format!("{}/repos/{}/{}/commits", self.api_base, self.owner, repo);

        let mut query: Vec<(&str, &str)> = vec![("per_page", "1")];
        if let Some(path) = path_filter {
            query.push(("path", path));
        }

        let response = self
            .http
            .get(url)
            .query(&query)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let response = expect_success(response).await?;
        let commits: Vec<RepoCommit> = response
            .json()
            .await
            .map_err(|e| MirrorError::Parse(e.to_string()))?;

        let latest = commits.into_iter().next().ok_or(MirrorError::NoCommitsFound)?;

        let author_name = latest
            .commit
            .author
            .as_ref()
            .and_then(|a| a.name.clone())
            .unwrap_or_default();
        let committer_name = latest
            .commit
            .committer
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| author_name.clone());
        let commit_time = latest
            .commit
            .author
            .as_ref()
            .and_then(|a| a.date)
            .unwrap_or_else(Utc::now);

        Ok(CommitSnapshot {
            site_name: site_name.to_string(),
            commit_message: latest.commit.message,
            author_name,
            commit_time,
            recent_committer_name: committer_name,
        })
    }

    /// Current revision hash of the marker file, or `None` when it does not
    /// exist.
    async fn marker_sha(&self, repo: &str, path: &str) -> Result<Option<String>, MirrorError> {
        let response = self
            .http
            .get(self.contents_url(repo, path))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = expect_success(response).await?;
        let info: ContentInfo = response
            .json()
            .await
            .map_err(|e| MirrorError::Parse(e.to_string()))?;
        Ok(Some(info.sha))
    }
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, MirrorError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "hosting API returned error");
        Err(MirrorError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> MirrorError {
    if e.is_timeout() {
        MirrorError::Timeout
    } else {
        MirrorError::Transport(e.to_string())
    }
}
