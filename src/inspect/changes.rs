use tracing::{debug, warn};

use super::StageResult;
use crate::config::ReportMode;
use crate::event::PullRequest;
use crate::github::{ChangedFile, GitHubClient};

/// A changed file together with whatever the run managed to retrieve for it.
#[derive(Debug)]
pub struct FileReport {
    pub file: ChangedFile,
    pub content: FileContent,
}

#[derive(Debug)]
pub enum FileContent {
    /// Full file text at the head commit (content mode).
    Text(String),
    /// Render the unified diff embedded in the file listing (patch mode);
    /// a file without one prints empty.
    Patch,
    /// Content mode, but this file couldn't be retrieved. Non-fatal.
    Unavailable(String),
}

/// Fetch the PR file listing and, in content mode, each file's full text at
/// the head commit. A per-file fetch or decode failure is recorded on that
/// file and the loop moves on; only a failed listing fails the stage.
pub async fn report(
    client: &GitHubClient,
    pr: &PullRequest,
    mode: ReportMode,
) -> StageResult<Vec<FileReport>> {
    let files = match client.pr_files(pr.number).await {
        Ok(files) => files,
        Err(err) => {
            warn!(%err, "failed to list changed files");
            return StageResult::Failed(err.into());
        }
    };
    debug!(files = files.len(), "listed changed files");

    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let content = match mode {
            ReportMode::Patch => FileContent::Patch,
            ReportMode::Content => fetch_content(client, pr, &file.filename).await,
        };
        reports.push(FileReport { file, content });
    }
    StageResult::Ok(reports)
}

async fn fetch_content(client: &GitHubClient, pr: &PullRequest, filename: &str) -> FileContent {
    let Some(head_sha) = pr.head_sha() else {
        return FileContent::Unavailable("head commit sha not present in the event".to_string());
    };
    match client.file_content(filename, head_sha).await {
        Ok(text) => FileContent::Text(text),
        Err(err) => {
            warn!(file = filename, %err, "failed to fetch file content");
            FileContent::Unavailable(err.to_string())
        }
    }
}
