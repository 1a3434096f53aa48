use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Failed to read event file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse event file as JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The GitHub Actions event descriptor. Only the `pull_request` entity is of
/// interest; everything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct EventDescriptor {
    pull_request: Option<PullRequest>,
}

/// The subset of the PR object the inspection stages consume.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    /// PR description; GitHub sends `null` for an empty description.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub head: Option<HeadRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadRef {
    pub sha: String,
}

impl PullRequest {
    /// Head commit sha, when the event carries one.
    pub fn head_sha(&self) -> Option<&str> {
        self.head.as_ref().map(|head| head.sha.as_str())
    }
}

/// Load the event descriptor and extract the pull request.
///
/// Returns `Ok(None)` when the payload has no `pull_request` key: the run
/// ends normally without touching the network, since the workflow was
/// triggered by some other event type.
pub fn load_pull_request(path: &Path) -> Result<Option<PullRequest>, EventError> {
    let contents = fs::read_to_string(path).map_err(|source| EventError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let event: EventDescriptor = serde_json::from_str(&contents)?;

    match &event.pull_request {
        Some(pr) => debug!(number = pr.number, head = ?pr.head_sha(), "loaded pull request from event"),
        None => debug!("event payload has no pull_request key"),
    }
    Ok(event.pull_request)
}
