//! Configuration loader and validator for the job tracker client.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub api: Api,
}

/// Local settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub data_dir: String,
    pub poll_interval_secs: u64,
}

/// Backend REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Ensure required directories exist (creates `app.data_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.app.data_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.app.data_dir)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.app.poll_interval_secs)
    }

    /// SQLite URL for the preferences database inside `app.data_dir`.
    pub fn database_url(&self) -> String {
        let path: PathBuf = Path::new(&self.app.data_dir).join("job-tracker.db");
        format!("sqlite://{}", path.display())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: App {
                data_dir: "./data".into(),
                poll_interval_secs: crate::poller::DEFAULT_POLL_INTERVAL.as_secs(),
            },
            api: Api {
                base_url: crate::api::DEFAULT_BASE_URL.into(),
                timeout_secs: crate::api::DEFAULT_TIMEOUT.as_secs(),
            },
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Like [`load`], but a missing file yields the built-in defaults.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    match load(Some(path)) {
        Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            Ok(Config::default())
        }
        other => other,
    }
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.data_dir must be non-empty"));
    }
    if cfg.app.poll_interval_secs == 0 {
        return Err(ConfigError::Invalid("app.poll_interval_secs must be > 0"));
    }

    let url = Url::parse(cfg.api.base_url.trim())
        .map_err(|_| ConfigError::Invalid("api.base_url must be an absolute URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid("api.base_url must use http or https"));
    }
    if cfg.api.timeout_secs == 0 {
        return Err(ConfigError::Invalid("api.timeout_secs must be > 0"));
    }

    Ok(())
}

/// Sample configuration with the built-in defaults.
pub fn example() -> &'static str {
    r#"app:
  data_dir: "./data"
  poll_interval_secs: 60

api:
  base_url: "https://localhost:7223/api"
  timeout_secs: 30
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.poll_interval(), Duration::from_secs(60));
        assert_eq!(cfg.api.timeout_secs, 30);
    }

    #[test]
    fn invalid_base_url() {
        let mut cfg = Config::default();
        cfg.api.base_url = "localhost:7223".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        cfg.api.base_url = "ftp://tracker.example/api".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("http or https")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn zero_intervals_rejected() {
        let mut cfg = Config::default();
        cfg.app.poll_interval_secs = 0;
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("poll_interval_secs")),
            _ => panic!("wrong error"),
        }

        let mut cfg = Config::default();
        cfg.api.timeout_secs = 0;
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn empty_data_dir_rejected() {
        let mut cfg = Config::default();
        cfg.app.data_dir = "  ".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn ensure_dirs_creates_data_dir() {
        let td = tempdir().unwrap();
        let data_path = td.path().join("data");
        let mut cfg = Config::default();
        cfg.app.data_dir = data_path.to_string_lossy().to_string();
        cfg.ensure_dirs().unwrap();
        assert!(data_path.exists());
        assert!(cfg.database_url().ends_with("job-tracker.db"));
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, example().replace("60", "15")).unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.app.poll_interval_secs, 15);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let td = tempdir().unwrap();
        let cfg = load_or_default(&td.path().join("absent.yaml")).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
