use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ReportMode;
use crate::github::{ChangedFile, CommitEntry};
use crate::inspect::{ComparisonOutcome, FileContent, FileReport, Inspection, StageResult};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

const FILE_RULE: &str = "----------------------------------------";

/// Render the inspection to the terminal (default) or to a markdown file.
#[instrument(skip(inspection), fields(pr = inspection.pr.number))]
pub fn output(inspection: &Inspection, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print!("{}", render_text(inspection));
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            std::fs::write(path, render_markdown(inspection))?;
            Ok(())
        }
    }
}

/// Plain-text report, section by section in stage order. This is the run's
/// primary product; everything else (logs) goes to stderr.
pub fn render_text(inspection: &Inspection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pull Request #{}", inspection.pr.number);
    let _ = writeln!(out, "Description:");
    let _ = writeln!(
        out,
        "{}",
        inspection.pr.body.as_deref().unwrap_or("(no description)")
    );
    let _ = writeln!(out, "{}", "=".repeat(50));

    let _ = writeln!(out, "\n{}", section("Changed Files"));
    match &inspection.changes {
        StageResult::Ok(reports) if reports.is_empty() => {
            let _ = writeln!(out, "No files changed.");
        }
        StageResult::Ok(reports) => {
            for report in reports {
                render_file_text(&mut out, report);
            }
        }
        StageResult::Failed(failure) => {
            let _ = writeln!(out, "{} {}", "Stage failed:".red().bold(), failure.message);
        }
    }

    let _ = writeln!(out, "\n{}", section("Commits"));
    match &inspection.commits {
        StageResult::Ok(commits) if commits.is_empty() => {
            let _ = writeln!(out, "No commits returned.");
        }
        StageResult::Ok(commits) => {
            for commit in commits {
                render_commit_text(&mut out, commit);
            }
        }
        StageResult::Failed(failure) => {
            let _ = writeln!(out, "{} {}", "Stage failed:".red().bold(), failure.message);
        }
    }

    let _ = writeln!(out, "\n{}", section("Latest Commit Comparison"));
    match &inspection.comparison {
        ComparisonOutcome::Compared {
            base,
            head,
            comparison,
        } => {
            let _ = writeln!(out, "Base commit: {base}");
            let _ = writeln!(out, "Head commit: {head}");
            let _ = writeln!(out, "Total commits: {}", comparison.total_commits);
            let _ = writeln!(out, "Compared files:");
            for file in &comparison.files {
                let _ = writeln!(out, "\n{}", describe_file(file));
                let _ = writeln!(out, "Patch:");
                let _ = writeln!(out, "{}", file.patch.as_deref().unwrap_or(""));
                let _ = writeln!(out, "{FILE_RULE}");
            }
        }
        ComparisonOutcome::InsufficientCommits(count) => {
            let _ = writeln!(out, "Fewer than two commits to compare (found {count}).");
        }
        ComparisonOutcome::Skipped => {
            let _ = writeln!(out, "Skipped: the commit listing failed.");
        }
        ComparisonOutcome::Failed(failure) => {
            let _ = writeln!(
                out,
                "{} {}",
                "Comparison failed:".red().bold(),
                failure.message
            );
        }
    }

    out
}

fn render_file_text(out: &mut String, report: &FileReport) {
    let _ = writeln!(out, "\n{}", describe_file(&report.file));
    match &report.content {
        FileContent::Text(text) => {
            let _ = writeln!(out, "Full content:");
            let _ = writeln!(out, "{text}");
        }
        FileContent::Patch => {
            let _ = writeln!(out, "Patch:");
            let _ = writeln!(out, "{}", report.file.patch.as_deref().unwrap_or(""));
        }
        FileContent::Unavailable(reason) => {
            let _ = writeln!(out, "{} {}", "Content unavailable:".yellow().bold(), reason);
        }
    }
    let _ = writeln!(out, "{FILE_RULE}");
}

fn render_commit_text(out: &mut String, commit: &CommitEntry) {
    let _ = writeln!(out, "\nCommit: {}", commit.sha);
    let _ = writeln!(out, "Message:");
    let _ = writeln!(out, "{}", commit.commit.message);
    let _ = writeln!(out, "{FILE_RULE}");
}

fn describe_file(file: &ChangedFile) -> String {
    format!(
        "File: {} ({}, {} changed lines)",
        file.filename, file.status, file.changes
    )
}

fn section(title: &str) -> String {
    format!("═══ {} ═══", title.bold())
}

/// Markdown rendering for --output, same content as the terminal report.
pub fn render_markdown(inspection: &Inspection) -> String {
    let mode = match inspection.mode {
        ReportMode::Content => "content",
        ReportMode::Patch => "patch",
    };
    let mut md = String::new();
    let _ = writeln!(md, "# Pull Request #{}\n", inspection.pr.number);
    let _ = writeln!(md, "**Mode:** {mode}\n");
    let _ = writeln!(md, "## Description\n");
    let _ = writeln!(
        md,
        "{}\n",
        inspection.pr.body.as_deref().unwrap_or("_(no description)_")
    );

    let _ = writeln!(md, "## Changed files\n");
    match &inspection.changes {
        StageResult::Ok(reports) if reports.is_empty() => {
            let _ = writeln!(md, "No files changed.\n");
        }
        StageResult::Ok(reports) => {
            for report in reports {
                let file = &report.file;
                let _ = writeln!(
                    md,
                    "### `{}` — {}, {} changed lines\n",
                    file.filename, file.status, file.changes
                );
                match &report.content {
                    FileContent::Text(text) => {
                        let _ = writeln!(md, "```\n{text}\n```\n");
                    }
                    FileContent::Patch => {
                        let _ = writeln!(
                            md,
                            "```diff\n{}\n```\n",
                            file.patch.as_deref().unwrap_or("")
                        );
                    }
                    FileContent::Unavailable(reason) => {
                        let _ = writeln!(md, "_Content unavailable: {reason}_\n");
                    }
                }
            }
        }
        StageResult::Failed(failure) => {
            let _ = writeln!(md, "**Stage failed:** {}\n", failure.message);
        }
    }

    let _ = writeln!(md, "## Commits\n");
    match &inspection.commits {
        StageResult::Ok(commits) => {
            for commit in commits {
                let _ = writeln!(md, "- `{}` {}", commit.sha, commit.commit.message);
            }
            let _ = writeln!(md);
        }
        StageResult::Failed(failure) => {
            let _ = writeln!(md, "**Stage failed:** {}\n", failure.message);
        }
    }

    let _ = writeln!(md, "## Latest commit comparison\n");
    match &inspection.comparison {
        ComparisonOutcome::Compared {
            base,
            head,
            comparison,
        } => {
            let _ = writeln!(
                md,
                "`{base}`...`{head}` — {} commits\n",
                comparison.total_commits
            );
            for file in &comparison.files {
                let _ = writeln!(
                    md,
                    "### `{}` — {}, {} changed lines\n",
                    file.filename, file.status, file.changes
                );
                let _ = writeln!(
                    md,
                    "```diff\n{}\n```\n",
                    file.patch.as_deref().unwrap_or("")
                );
            }
        }
        ComparisonOutcome::InsufficientCommits(count) => {
            let _ = writeln!(md, "Fewer than two commits to compare (found {count}).\n");
        }
        ComparisonOutcome::Skipped => {
            let _ = writeln!(md, "Skipped: the commit listing failed.\n");
        }
        ComparisonOutcome::Failed(failure) => {
            let _ = writeln!(md, "**Comparison failed:** {}\n", failure.message);
        }
    }

    md
}
