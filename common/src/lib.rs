/*!
common/src/lib.rs

Shared configuration types for timestories.

This file provides:
- Config data structures (deserialized from TOML, every key defaulted)
- An async loader merging a default file and an override file
- Environment variable overrides and validation
*/

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://time.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; TimeLatestStoriesBot/1.0; +http://example.com/bot)";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_STORY_LIMIT: usize = 6;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Where the homepage lives and how we ask for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root origin. Relative links resolve against it and accepted links must start with it.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Anchor scanning backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractStrategy {
    /// Walk anchor elements of a parsed HTML tree.
    #[default]
    Dom,
    /// Regex tag scanning over the raw text.
    Scan,
}

impl FromStr for ExtractStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dom" => Ok(ExtractStrategy::Dom),
            "scan" => Ok(ExtractStrategy::Scan),
            other => Err(anyhow!("unknown extraction strategy '{}' (expected dom or scan)", other)),
        }
    }
}

impl fmt::Display for ExtractStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractStrategy::Dom => f.write_str("dom"),
            ExtractStrategy::Scan => f.write_str("scan"),
        }
    }
}

/// Extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of stories returned per request
    pub limit: usize,
    pub strategy: ExtractStrategy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_STORY_LIMIT,
            strategy: ExtractStrategy::default(),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub extraction: ExtractionConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence). Missing keys
    /// fall back to the built-in defaults.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Startup loader used by the binaries.
    ///
    /// Reads `config.default.toml` if present, then the override file: `cli_path` when given
    /// (it must exist), else `CONFIG_PATH`, else `./config.toml`. Environment overrides are
    /// applied last and the result is validated.
    pub async fn load(cli_path: Option<&Path>) -> Result<Self> {
        let default_path = PathBuf::from("config.default.toml");

        let override_path = match cli_path {
            Some(p) if !p.exists() => bail!("Config file not found: {}", p.display()),
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var("CONFIG_PATH")
                .map(PathBuf::from)
                .ok()
                .filter(|p| p.exists())
                .or_else(|| Some(PathBuf::from("config.toml")).filter(|p| p.exists())),
        };

        let mut cfg = Self::load_with_defaults(Some(&default_path), override_path.as_deref()).await?;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `TIMESTORIES_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TIMESTORIES_BASE_URL") {
            self.source.base_url = v;
        }
        if let Some(v) = lookup("TIMESTORIES_USER_AGENT") {
            self.source.user_agent = v;
        }
        if let Some(v) = lookup("TIMESTORIES_TIMEOUT_SECONDS") {
            self.source.timeout_seconds = parse_env("TIMESTORIES_TIMEOUT_SECONDS", &v)?;
        }
        if let Some(v) = lookup("TIMESTORIES_STORY_LIMIT") {
            self.extraction.limit = parse_env("TIMESTORIES_STORY_LIMIT", &v)?;
        }
        if let Some(v) = lookup("TIMESTORIES_STRATEGY") {
            self.extraction.strategy = v.parse()?;
        }
        if let Some(v) = lookup("TIMESTORIES_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = lookup("TIMESTORIES_PORT") {
            self.server.port = parse_env("TIMESTORIES_PORT", &v)?;
        }
        Ok(())
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.source.base_url)
            .with_context(|| format!("invalid source.base_url: {}", self.source.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("source.base_url must be http or https, got {}", base.scheme());
        }
        if self.source.timeout_seconds == 0 {
            bail!("source.timeout_seconds must be greater than zero");
        }
        if self.source.user_agent.trim().is_empty() {
            bail!("source.user_agent must not be empty");
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow!("invalid value for {}: '{}' ({})", key, value, e))
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
