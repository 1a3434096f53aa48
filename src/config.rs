use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GITHUB_EVENT_PATH is not set and no --event-path was given")]
    MissingEventPath,

    #[error("GITHUB_REPOSITORY is not set")]
    MissingRepository,

    #[error("GITHUB_REPOSITORY is not in owner/repo form: {0:?}")]
    MalformedRepository(String),

    #[error("GITHUB_TOKEN is not set and .pr-inspector.toml provides no token")]
    MissingToken,

    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How changed files are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Fetch each file's full content at the PR head commit.
    #[default]
    Content,
    /// Use the unified diff embedded in the file listing; no extra requests.
    Patch,
}

/// Everything the run needs, resolved once at startup and passed into each
/// stage explicitly. Nothing reads the process environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON event descriptor (GITHUB_EVENT_PATH).
    pub event_path: PathBuf,
    /// Repository owner, from the `owner/repo` GITHUB_REPOSITORY value.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// API credential, sent as `Authorization: token <TOKEN>`.
    pub token: String,
    /// Changed-file reporting mode.
    pub mode: ReportMode,
    /// API root; overridden in tests to point at a mock server.
    pub api_base: String,
}

/// Optional `.pr-inspector.toml` layered under the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub github: GitHubSection,

    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubSection {
    /// Fallback API token used when GITHUB_TOKEN is absent.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSection {
    /// Default report mode when --mode is not given.
    pub mode: Option<ReportMode>,
}

impl FileConfig {
    /// Load `.pr-inspector.toml` from the current directory, or defaults if
    /// the file doesn't exist.
    pub fn load() -> Result<FileConfig, ConfigError> {
        let path = Path::new(".pr-inspector.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(FileConfig::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

impl Config {
    /// Build the run configuration from the process environment, the optional
    /// config file, and CLI overrides. Missing event path, repository, or
    /// token is fatal.
    pub fn load(
        event_path: Option<PathBuf>,
        mode: Option<ReportMode>,
    ) -> Result<Config, ConfigError> {
        let file = FileConfig::load()?;
        Self::resolve(|key| std::env::var(key).ok(), &file, event_path, mode)
    }

    /// Resolution logic with an injectable environment lookup, so tests never
    /// touch the real process environment.
    fn resolve(
        env: impl Fn(&str) -> Option<String>,
        file: &FileConfig,
        event_path: Option<PathBuf>,
        mode: Option<ReportMode>,
    ) -> Result<Config, ConfigError> {
        let event_path = event_path
            .or_else(|| env("GITHUB_EVENT_PATH").map(PathBuf::from))
            .ok_or(ConfigError::MissingEventPath)?;

        let repository = env("GITHUB_REPOSITORY").ok_or(ConfigError::MissingRepository)?;
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
            .ok_or_else(|| ConfigError::MalformedRepository(repository.clone()))?;

        let token = env("GITHUB_TOKEN")
            .or_else(|| file.github.token.clone())
            .ok_or(ConfigError::MissingToken)?;

        let mode = mode.or(file.report.mode).unwrap_or_default();

        Ok(Config {
            event_path,
            owner: owner.to_string(),
            repo: repo.to_string(),
            token,
            mode,
            api_base: "https://api.github.com".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    const FULL_ENV: &[(&str, &str)] = &[
        ("GITHUB_EVENT_PATH", "/tmp/event.json"),
        ("GITHUB_REPOSITORY", "octo/hello-world"),
        ("GITHUB_TOKEN", "t0ken"),
    ];

    #[test]
    fn test_resolve_full_environment() {
        let config =
            Config::resolve(env_with(FULL_ENV), &FileConfig::default(), None, None).unwrap();
        assert_eq!(config.event_path, PathBuf::from("/tmp/event.json"));
        assert_eq!(config.owner, "octo");
        assert_eq!(config.repo, "hello-world");
        assert_eq!(config.token, "t0ken");
        assert_eq!(config.mode, ReportMode::Content);
    }

    #[test]
    fn test_missing_event_path() {
        let env = env_with(&FULL_ENV[1..]);
        let err = Config::resolve(env, &FileConfig::default(), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEventPath));
        assert!(err.to_string().contains("GITHUB_EVENT_PATH"));
    }

    #[test]
    fn test_missing_repository() {
        let env = env_with(&[("GITHUB_EVENT_PATH", "/tmp/e.json"), ("GITHUB_TOKEN", "t")]);
        let err = Config::resolve(env, &FileConfig::default(), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRepository));
    }

    #[test]
    fn test_missing_token() {
        let env = env_with(&[
            ("GITHUB_EVENT_PATH", "/tmp/e.json"),
            ("GITHUB_REPOSITORY", "octo/repo"),
        ]);
        let err = Config::resolve(env, &FileConfig::default(), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn test_malformed_repository() {
        let env = env_with(&[
            ("GITHUB_EVENT_PATH", "/tmp/e.json"),
            ("GITHUB_REPOSITORY", "no-slash-here"),
            ("GITHUB_TOKEN", "t"),
        ]);
        let err = Config::resolve(env, &FileConfig::default(), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedRepository(_)));
    }

    #[test]
    fn test_token_falls_back_to_file() {
        let env = env_with(&[
            ("GITHUB_EVENT_PATH", "/tmp/e.json"),
            ("GITHUB_REPOSITORY", "octo/repo"),
        ]);
        let file: FileConfig = toml::from_str("[github]\ntoken = \"from-file\"").unwrap();
        let config = Config::resolve(env, &file, None, None).unwrap();
        assert_eq!(config.token, "from-file");
    }

    #[test]
    fn test_mode_precedence_cli_over_file() {
        let file: FileConfig = toml::from_str("[report]\nmode = \"patch\"").unwrap();
        let config =
            Config::resolve(env_with(FULL_ENV), &file, None, Some(ReportMode::Content)).unwrap();
        assert_eq!(config.mode, ReportMode::Content);

        let config = Config::resolve(env_with(FULL_ENV), &file, None, None).unwrap();
        assert_eq!(config.mode, ReportMode::Patch);
    }

    #[test]
    fn test_event_path_override_wins() {
        let config = Config::resolve(
            env_with(FULL_ENV),
            &FileConfig::default(),
            Some(PathBuf::from("/elsewhere/event.json")),
            None,
        )
        .unwrap();
        assert_eq!(config.event_path, PathBuf::from("/elsewhere/event.json"));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[github]
token = "abc"

[report]
mode = "content"
"#;
        let file: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(file.github.token.as_deref(), Some("abc"));
        assert_eq!(file.report.mode, Some(ReportMode::Content));
    }
}
