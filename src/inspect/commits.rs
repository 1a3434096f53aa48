use tracing::{debug, warn};

use super::StageResult;
use crate::github::{CommitEntry, GitHubClient};

/// Fetch the PR commit list, preserving the order the API returned.
/// Failure marks this stage failed; the run continues.
pub async fn report(client: &GitHubClient, number: u64) -> StageResult<Vec<CommitEntry>> {
    match client.pr_commits(number).await {
        Ok(commits) => {
            debug!(commits = commits.len(), "listed pull request commits");
            StageResult::Ok(commits)
        }
        Err(err) => {
            warn!(%err, "failed to list pull request commits");
            StageResult::Failed(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::tests::{client_for, mount_commits};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_commits_preserve_api_order() {
        let server = MockServer::start().await;
        mount_commits(&server, &["a1", "b2", "c3"]).await;

        let client = client_for(&server);
        let StageResult::Ok(commits) = report(&client, 5).await else {
            panic!("stage should succeed")
        };
        let shas: Vec<_> = commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, ["a1", "b2", "c3"]);
    }

    #[tokio::test]
    async fn test_listing_failure_is_stage_local() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/repo/pulls/5/commits"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let StageResult::Failed(failure) = report(&client, 5).await else {
            panic!("stage should fail")
        };
        assert_eq!(failure.status, Some(500));
        assert!(failure.message.contains("boom"));
    }
}
