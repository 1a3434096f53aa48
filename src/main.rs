mod config;
mod event;
mod github;
mod inspect;
mod report;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{Config, ReportMode};
use github::GitHubClient;

/// PR Inspector — CI reporting tool that reads a GitHub Actions pull-request
/// event and prints the PR description, its changed files (full contents at
/// the head commit or unified diffs), the commit list, and a comparison of
/// the two most recent commits.
#[derive(Parser, Debug)]
#[command(name = "pr-inspector", version, about)]
struct Cli {
    /// How changed files are reported
    #[arg(long, value_enum)]
    mode: Option<ReportMode>,

    /// Optional output file path for a markdown report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Event file to inspect, overriding GITHUB_EVENT_PATH (for local runs)
    #[arg(long)]
    event_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(%err, "run aborted");
            eprintln!("pr-inspector: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    info!("loading configuration");
    let config = Config::load(cli.event_path, cli.mode)?;

    info!(path = %config.event_path.display(), "loading event descriptor");
    let Some(pr) = event::load_pull_request(&config.event_path)? else {
        println!("This event is not a pull_request event; nothing to inspect.");
        return Ok(ExitCode::SUCCESS);
    };

    let client = GitHubClient::new(&config);
    let inspection = inspect::run(&client, &pr, config.mode).await;

    report::output(&inspection, cli.output.as_deref())?;

    if inspection.has_failures() {
        info!("one or more stages failed");
        Ok(ExitCode::FAILURE)
    } else {
        info!("done");
        Ok(ExitCode::SUCCESS)
    }
}
