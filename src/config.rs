//! Configuration loading.
//!
//! Sources, highest precedence first: environment variables
//! (`STATUSCTL_TOKEN`, `STATUSCTL_DATABASE_ID`), a `.statusctl.yaml` found
//! by walking up from the working directory, `~/.statusctl/config.yaml`,
//! then built-in defaults. A missing file is never an error; an explicit
//! `--config` path that cannot be read is.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".statusctl.yaml";
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer credential for the document database API.
    #[serde(default)]
    pub token: String,
    /// Database holding the status change log.
    #[serde(default)]
    pub database_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            token: String::new(),
            database_id: String::new(),
            base_url: default_base_url(),
            version: default_api_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Cleanup stays in dry-run mode unless this is flipped off.
    #[serde(default = "default_true")]
    pub dry_run: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        RetentionConfig { dry_run: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Default look-back window, in days, for context bundles.
    #[serde(default = "default_feed_days")]
    pub default_days: u32,
    /// Cap on records included in a context bundle.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            default_days: default_feed_days(),
            max_records: default_max_records(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_feed_days() -> u32 {
    30
}

fn default_max_records() -> usize {
    100
}

impl Config {
    /// Load configuration, optionally from an explicit file path.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => match discover_config_file() {
                Some(path) => Self::from_file(&path)?,
                None => Config::default(),
            },
        };
        config.apply_overrides(
            std::env::var("STATUSCTL_TOKEN").ok(),
            std::env::var("STATUSCTL_DATABASE_ID").ok(),
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in config file: {}", path.display()))
    }

    fn apply_overrides(&mut self, token: Option<String>, database_id: Option<String>) {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.api.token = token;
        }
        if let Some(database_id) = database_id.filter(|d| !d.is_empty()) {
            self.api.database_id = database_id;
        }
    }

    /// Directory reports and bundles are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("reports"))
    }
}

/// Find `.statusctl.yaml` by walking up from the current directory, falling
/// back to `~/.statusctl/config.yaml` if present.
fn discover_config_file() -> Option<PathBuf> {
    find_config_walking_up().or_else(|| {
        let candidate = dirs::home_dir()?.join(".statusctl").join("config.yaml");
        candidate.exists().then_some(candidate)
    })
}

fn find_config_walking_up() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Starter configuration written by `statusctl init`.
pub fn starter_yaml() -> &'static str {
    r#"# statusctl configuration
#
# STATUSCTL_TOKEN and STATUSCTL_DATABASE_ID environment variables
# override the values below.

api:
  token: ""
  database_id: ""

# Where reports and context bundles are written.
output_dir: reports

retention:
  # Cleanup only simulates deletion while this is true.
  dry_run: true

feed:
  # Default look-back window for `statusctl context`, in days.
  default_days: 30
  # Cap on records included in a context bundle.
  max_records: 100
"#
}
