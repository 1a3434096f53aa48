use tracing::{debug, warn};

use super::{StageFailure, StageResult};
use crate::github::{CommitEntry, Comparison, GitHubClient};

/// What came of comparing the two most recent commits.
#[derive(Debug)]
pub enum ComparisonOutcome {
    Compared {
        base: String,
        head: String,
        comparison: Comparison,
    },
    /// Fewer than two commits on the PR; nothing to compare.
    InsufficientCommits(usize),
    /// The commit listing itself failed, so no pair could be chosen.
    Skipped,
    Failed(StageFailure),
}

/// Base/head pair for the comparison: second-to-last and last commit as the
/// API listed them. The listing order is an upstream contract (assumed
/// oldest to newest) that we deliberately do not re-verify or re-sort.
fn select_range(commits: &[CommitEntry]) -> Option<(&str, &str)> {
    match commits {
        [.., base, head] => Some((base.sha.as_str(), head.sha.as_str())),
        _ => None,
    }
}

/// Compare the two most recent commits of the PR, when there are at least
/// two to compare. Runs only against a successfully fetched commit list.
pub async fn report(
    client: &GitHubClient,
    commits: &StageResult<Vec<CommitEntry>>,
) -> ComparisonOutcome {
    let commits = match commits {
        StageResult::Ok(commits) => commits,
        StageResult::Failed(_) => return ComparisonOutcome::Skipped,
    };
    let Some((base, head)) = select_range(commits) else {
        debug!(commits = commits.len(), "not enough commits to compare");
        return ComparisonOutcome::InsufficientCommits(commits.len());
    };

    debug!(base, head, "comparing the two most recent commits");
    match client.compare(base, head).await {
        Ok(comparison) => ComparisonOutcome::Compared {
            base: base.to_string(),
            head: head.to_string(),
            comparison,
        },
        Err(err) => {
            warn!(%err, "commit comparison failed");
            ComparisonOutcome::Failed(err.into())
        }
    }
}
