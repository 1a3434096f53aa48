pub mod changes;
pub mod commits;
pub mod compare;

pub use changes::{FileContent, FileReport};
pub use compare::ComparisonOutcome;

use tracing::info;

use crate::config::ReportMode;
use crate::event::PullRequest;
use crate::github::{CommitEntry, GitHubClient, GitHubError};

/// Outcome of one reporting stage. A failed stage never aborts the run;
/// later independent stages still execute.
#[derive(Debug)]
pub enum StageResult<T> {
    Ok(T),
    Failed(StageFailure),
}

impl<T> StageResult<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageResult::Failed(_))
    }
}

/// Why a stage (or a single item within it) failed.
#[derive(Debug)]
pub struct StageFailure {
    /// HTTP status code, when the failure came from a non-2xx response.
    pub status: Option<u16>,
    pub message: String,
}

impl From<GitHubError> for StageFailure {
    fn from(err: GitHubError) -> StageFailure {
        StageFailure {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

/// Everything the run found out about the pull request, ready for rendering.
#[derive(Debug)]
pub struct Inspection {
    pub pr: PullRequest,
    pub mode: ReportMode,
    pub changes: StageResult<Vec<FileReport>>,
    pub commits: StageResult<Vec<CommitEntry>>,
    pub comparison: ComparisonOutcome,
}

impl Inspection {
    /// True when any stage failed outright. Per-file content misses are
    /// reported but don't count; they mirror the file listing, which
    /// succeeded.
    pub fn has_failures(&self) -> bool {
        self.changes.is_failed()
            || self.commits.is_failed()
            || matches!(self.comparison, ComparisonOutcome::Failed(_))
    }
}

/// Run the three reporting stages in order: changed files, commit list,
/// comparison of the two most recent commits. Strictly sequential; each API
/// call completes before the next begins.
pub async fn run(client: &GitHubClient, pr: &PullRequest, mode: ReportMode) -> Inspection {
    info!(number = pr.number, ?mode, "inspecting pull request");

    let changes = changes::report(client, pr, mode).await;
    let commits = commits::report(client, pr.number).await;
    let comparison = compare::report(client, &commits).await;

    Inspection {
        pr: pr.clone(),
        mode,
        changes,
        commits,
        comparison,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::event::HeadRef;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn test_pr(head: Option<&str>) -> PullRequest {
        PullRequest {
            number: 5,
            body: Some("Test description".to_string()),
            head: head.map(|sha| HeadRef {
                sha: sha.to_string(),
            }),
        }
    }

    pub(crate) fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::with_base_url(&server.uri(), "octo", "repo", "t0ken")
    }

    pub(crate) async fn mount_commits(server: &MockServer, shas: &[&str]) {
        let body: Vec<_> = shas
            .iter()
            .map(|sha| json!({"sha": sha, "commit": {"message": format!("commit {sha}")}}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/repos/octo/repo/pulls/5/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    /// A files-stage 404 must not keep the commits stage from running.
    #[tokio::test]
    async fn test_files_failure_does_not_stop_commits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/repo/pulls/5/files"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;
        mount_commits(&server, &["a1"]).await;

        let client = client_for(&server);
        let inspection = run(&client, &test_pr(None), ReportMode::Patch).await;

        match &inspection.changes {
            StageResult::Failed(failure) => {
                assert_eq!(failure.status, Some(404));
                assert!(failure.message.contains("404"));
            }
            StageResult::Ok(_) => panic!("files stage should have failed"),
        }
        match &inspection.commits {
            StageResult::Ok(commits) => assert_eq!(commits.len(), 1),
            StageResult::Failed(_) => panic!("commits stage should still run and succeed"),
        }
        assert!(inspection.has_failures());
    }

    #[tokio::test]
    async fn test_all_stages_green() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/repo/pulls/5/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"filename": "a.rs", "status": "modified", "changes": 2,
                 "patch": "@@ -1 +1 @@\n-old\n+new"}
            ])))
            .mount(&server)
            .await;
        mount_commits(&server, &["a1", "b2"]).await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/repo/compare/a1...b2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_commits": 1,
                "files": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let inspection = run(&client, &test_pr(None), ReportMode::Patch).await;

        assert!(!inspection.has_failures());
        assert!(matches!(
            inspection.comparison,
            ComparisonOutcome::Compared { .. }
        ));
    }
}
