use serde::Deserialize;

/// One file from the PR file listing or a comparison result.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    /// Path within the repository (e.g., "src/auth/config.rs")
    pub filename: String,
    /// Change status reported by the API ("added", "modified", "removed", ...)
    pub status: String,
    /// Total changed lines (additions + deletions)
    pub changes: u64,
    /// Unified diff for this file; absent for binary or very large files
    #[serde(default)]
    pub patch: Option<String>,
}

/// One entry from the PR commit listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
}

/// Result of a three-dot compare between two commits.
#[derive(Debug, Clone, Deserialize)]
pub struct Comparison {
    /// Distinct commits between the two points
    pub total_commits: u64,
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

/// Response from the contents endpoint. Both fields are optional so that an
/// unexpected shape surfaces as a per-file failure instead of a parse error.
#[derive(Debug, Deserialize)]
pub struct ContentResponse {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}
