use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub together: TogetherConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TogetherConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Comments go through a separate API gateway host.
    #[serde(default = "default_comment_api_base")]
    pub comment_api_base: String,
    /// Listing sort order. Discovery's seen-boundary assumes it stays
    /// newest-first.
    #[serde(default = "default_sort")]
    pub sort: String,
    /// Cache-buster the listing endpoint expects.
    #[serde(default = "default_list_seed")]
    pub list_seed: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://together.kakao.com".to_string()
}
fn default_comment_api_base() -> String {
    "https://together-api-gw.kakao.com".to_string()
}
fn default_sort() -> String {
    "FUNDRAISING_START_AT".to_string()
}
fn default_list_seed() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 10_000 }
fn default_request_timeout() -> u64 { 30_000 }

impl Default for TogetherConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            comment_api_base: default_comment_api_base(),
            sort: default_sort(),
            list_seed: 2,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Hard ceiling on listing pages fetched in one run.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_page_size() -> u32 { 10 }
fn default_max_pages() -> u32 { 50 }

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_pages: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PacingConfig {
    /// Pause before each like/comment, drawn uniformly from the range.
    #[serde(default = "default_action_delay_min")]
    pub action_delay_min_ms: u64,
    #[serde(default = "default_action_delay_max")]
    pub action_delay_max_ms: u64,
    /// Extra back-off after a failed like or comment.
    #[serde(default = "default_failure_delay")]
    pub failure_delay_ms: u64,
    #[serde(default = "default_page_delay_min")]
    pub page_delay_min_ms: u64,
    #[serde(default = "default_page_delay_max")]
    pub page_delay_max_ms: u64,
}

fn default_action_delay_min() -> u64 { 1000 }
fn default_action_delay_max() -> u64 { 2000 }
fn default_failure_delay() -> u64 { 1000 }
fn default_page_delay_min() -> u64 { 200 }
fn default_page_delay_max() -> u64 { 500 }

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            action_delay_min_ms: 1000,
            action_delay_max_ms: 2000,
            failure_delay_ms: 1000,
            page_delay_min_ms: 200,
            page_delay_max_ms: 500,
        }
    }
}

impl PacingConfig {
    /// Every delay zeroed. Keeps tests fast; the real platform expects
    /// human pacing, so never run this against it.
    pub fn none() -> Self {
        Self {
            action_delay_min_ms: 0,
            action_delay_max_ms: 0,
            failure_delay_ms: 0,
            page_delay_min_ms: 0,
            page_delay_max_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// Minutes between scheduled runs. 360 = every six hours.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

fn default_interval_minutes() -> u64 { 360 }

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_minutes: 360 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("state.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert_eq!(config.discovery.page_size, 10);
        assert_eq!(config.discovery.max_pages, 50);
        assert_eq!(config.pacing.action_delay_min_ms, 1000);
        assert_eq!(config.pacing.action_delay_max_ms, 2000);
        assert_eq!(config.schedule.interval_minutes, 360);
        assert!(config.together.api_base.starts_with("https://"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.together.sort, "FUNDRAISING_START_AT");
        assert_eq!(config.together.list_seed, 2);
        assert_eq!(config.pacing.page_delay_min_ms, 200);
        assert_eq!(config.store.path, PathBuf::from("state.json"));
        assert!(config.notify.webhook_url.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[discovery]\npage_size = 3\n").unwrap();
        assert_eq!(config.discovery.page_size, 3);
        assert_eq!(config.discovery.max_pages, 50);
    }
}
