//! Configuration management for waktu.
//!
//! Configuration is read from `~/.config/waktu/config.toml` when present and
//! then overridden by environment variables (`WS_*` plus the variables an
//! Alfred workflow exports) and finally by command-line flags.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "WS_";

pub const DEFAULT_ZONE: &str = "WLY01";

/// Settings key under which the user's preferred zone is stored.
pub const ZONE_SETTING_KEY: &str = "ZONE_ID";

/// Where command output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Colored text for a terminal
    #[default]
    Cli,
    /// Alfred script-filter JSON
    Alfred,
}

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_zone: String,
    pub db_path: Option<PathBuf>,
    pub debug: bool,
    pub output: OutputMode,
    pub remote: RemoteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_zone: DEFAULT_ZONE.to_string(),
            db_path: None,
            debug: false,
            output: OutputMode::Cli,
            remote: RemoteConfig::default(),
        }
    }
}

/// Endpoints and HTTP client settings for the remote authority.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Page carrying the `<select id="inputZone">` zone catalog
    pub catalog_url: String,

    /// Yearly schedule endpoint; `zone` and `period` are appended as query parameters
    pub schedule_url: String,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            catalog_url: "https://www.e-solat.gov.my/index.php?siteId=24&pageId=24".to_string(),
            schedule_url: "https://www.e-solat.gov.my/index.php?r=esolatApi/takwimsolat"
                .to_string(),
            timeout_secs: 30,
            user_agent: concat!("waktu/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, then apply environment overrides.
    ///
    /// A missing config file is not an error; every field falls back to its default.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
                path: config_path.clone(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: config_path,
                source: e,
            })?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Get the default config file path: `~/.config/waktu/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("waktu").join("config.toml"))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.is_empty());

        if let Some(debug) = var("DEBUG") {
            self.debug = is_truthy(&debug);
        }
        if let Some(output) = output_from_env(&lookup) {
            self.output = output;
        }
        if let Some(db) = var("DB") {
            self.db_path = Some(PathBuf::from(db));
        }
        if let Some(zone) = var("ZONE") {
            self.default_zone = zone.to_uppercase();
        }

        // Exported by Alfred when running inside a workflow
        if lookup("alfred_debug").as_deref() == Some("1") {
            self.debug = true;
        }
    }

    /// Database file location: configured path or `<cache_dir>/waktu/waktu.db`.
    pub fn resolve_db_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::NoCacheDir)?;
        let waktu_dir = cache_dir.join("waktu");
        fs::create_dir_all(&waktu_dir).map_err(|e| ConfigError::Io {
            path: waktu_dir.clone(),
            source: e,
        })?;
        Ok(waktu_dir.join("waktu.db"))
    }

    pub fn is_alfred(&self) -> bool {
        self.output == OutputMode::Alfred
    }
}

/// Output mode requested by the environment, if any.
///
/// Readable before the config file is, so a failing load can still be
/// reported in the mode the caller expects. A non-empty
/// `alfred_workflow_uid` wins over `WS_MODE`.
pub fn output_from_env<F>(lookup: F) -> Option<OutputMode>
where
    F: Fn(&str) -> Option<String>,
{
    if lookup("alfred_workflow_uid").is_some_and(|v| !v.is_empty()) {
        return Some(OutputMode::Alfred);
    }

    let mode = lookup(&format!("{ENV_PREFIX}MODE")).filter(|v| !v.is_empty())?;
    match mode.to_ascii_lowercase().as_str() {
        "cli" => Some(OutputMode::Cli),
        "alfred" => Some(OutputMode::Alfred),
        other => {
            tracing::warn!("Ignoring unknown output mode {other:?}");
            None
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine cache directory")]
    NoCacheDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.default_zone, "WLY01");
        assert_eq!(config.output, OutputMode::Cli);
        assert_eq!(config.remote.timeout_secs, 30);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
default_zone = "SGR01"
output = "alfred"

[remote]
timeout_secs = 5
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");
        assert_eq!(config.default_zone, "SGR01");
        assert!(config.is_alfred());
        assert_eq!(config.remote.timeout_secs, 5);
        // Default value
        assert!(config.remote.catalog_url.starts_with("https://www.e-solat.gov.my"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("WS_DEBUG", "true"),
            ("WS_MODE", "alfred"),
            ("WS_DB", "/tmp/waktu.db"),
            ("WS_ZONE", "jhr02"),
        ]));

        assert!(config.debug);
        assert!(config.is_alfred());
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/waktu.db")));
        assert_eq!(config.default_zone, "JHR02");
    }

    #[test]
    fn test_alfred_workflow_variables() {
        let mut config = Config::default();
        config.apply_env(env(&[("alfred_debug", "1"), ("alfred_workflow_uid", "user.workflow.X")]));
        assert!(config.debug);
        assert_eq!(config.output, OutputMode::Alfred);
    }

    #[test]
    fn test_unknown_mode_keeps_current() {
        let mut config = Config::default();
        config.apply_env(env(&[("WS_MODE", "json"), ("WS_DEBUG", "nope")]));
        assert_eq!(config.output, OutputMode::Cli);
        assert!(!config.debug);
    }

    #[test]
    fn test_output_from_env() {
        assert_eq!(output_from_env(env(&[])), None);
        assert_eq!(output_from_env(env(&[("WS_MODE", "CLI")])), Some(OutputMode::Cli));
        assert_eq!(
            output_from_env(env(&[("WS_MODE", "cli"), ("alfred_workflow_uid", "user.workflow.X")])),
            Some(OutputMode::Alfred)
        );
        assert_eq!(output_from_env(env(&[("alfred_workflow_uid", "")])), None);
    }

    #[test]
    fn test_configured_db_path_wins() {
        let config = Config {
            db_path: Some(PathBuf::from("/var/lib/waktu.db")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_db_path().unwrap(),
            PathBuf::from("/var/lib/waktu.db")
        );
    }
}
