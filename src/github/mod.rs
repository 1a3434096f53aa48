pub mod types;

pub use types::{ChangedFile, CommitEntry, Comparison};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use types::ContentResponse;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no base64 content in the response for '{path}'")]
    MissingContent { path: String },

    #[error("content of '{path}' is not valid base64: {source}")]
    Base64 {
        path: String,
        source: base64::DecodeError,
    },

    #[error("content of '{path}' is not valid UTF-8: {source}")]
    Utf8 {
        path: String,
        source: std::string::FromUtf8Error,
    },
}

impl GitHubError {
    /// HTTP status code, for failures that carry one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GitHubError::Status { status, .. } => Some(*status),
            GitHubError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Authenticated JSON client for the repository endpoints the inspection
/// stages consume. One instance per run, scoped to a single repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> GitHubClient {
        Self::with_base_url(&config.api_base, &config.owner, &config.repo, &config.token)
    }

    /// Construct against an arbitrary API root; tests point this at a mock
    /// server.
    pub fn with_base_url(base_url: &str, owner: &str, repo: &str, token: &str) -> GitHubClient {
        GitHubClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        }
    }

    /// Full file content at the given ref, base64-decoded to UTF-8 text.
    pub async fn file_content(&self, path: &str, git_ref: &str) -> Result<String, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.base_url, self.owner, self.repo, path, git_ref
        );
        let payload: ContentResponse = self.get_json(&url).await?;

        let encoded = match (&payload.content, payload.encoding.as_deref()) {
            (Some(content), Some("base64")) => content,
            _ => {
                return Err(GitHubError::MissingContent {
                    path: path.to_string(),
                })
            }
        };

        // The API wraps base64 bodies with newlines every 60 characters.
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|source| GitHubError::Base64 {
                path: path.to_string(),
                source,
            })?;
        String::from_utf8(bytes).map_err(|source| GitHubError::Utf8 {
            path: path.to_string(),
            source,
        })
    }

    /// Files changed in the pull request.
    pub async fn pr_files(&self, number: u64) -> Result<Vec<ChangedFile>, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/files",
            self.base_url, self.owner, self.repo, number
        );
        self.get_json(&url).await
    }

    /// Commits on the pull request, in the order the API returns them.
    pub async fn pr_commits(&self, number: u64) -> Result<Vec<CommitEntry>, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/commits",
            self.base_url, self.owner, self.repo, number
        );
        self.get_json(&url).await
    }

    /// Three-dot comparison between two commits.
    pub async fn compare(&self, base: &str, head: &str) -> Result<Comparison, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/compare/{}...{}",
            self.base_url, self.owner, self.repo, base, head
        );
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .header("User-Agent", "pr-inspector")
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
