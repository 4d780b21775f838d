use std::path::Path;

use chrono::{DateTime, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub github: GithubConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub hackathons: Vec<HackathonConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// Optional bearer credential; absent means anonymous, low-rate-limit access.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "GithubConfig::default_user_agent")]
    pub user_agent: String,
}

impl GithubConfig {
    fn default_user_agent() -> String {
        "hackathon-stats-collector".to_string()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            user_agent: Self::default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "CollectorConfig::default_page_size")]
    pub page_size: u32,
    #[serde(default = "CollectorConfig::default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "CollectorConfig::default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "CollectorConfig::default_leaderboard_size")]
    pub leaderboard_size: usize,
    #[serde(default = "CollectorConfig::default_output_dir")]
    pub output_dir: String,
}

impl CollectorConfig {
    const fn default_page_size() -> u32 {
        100
    }

    const fn default_max_pages() -> u32 {
        20
    }

    const fn default_cache_ttl_secs() -> u64 {
        300
    }

    const fn default_leaderboard_size() -> usize {
        10
    }

    fn default_output_dir() -> String {
        "hackathon-data".to_string()
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            max_pages: Self::default_max_pages(),
            cache_ttl_secs: Self::default_cache_ttl_secs(),
            leaderboard_size: Self::default_leaderboard_size(),
            output_dir: Self::default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HackathonConfig {
    pub slug: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub repositories: Vec<String>,
}

impl HackathonConfig {
    /// A hackathon keeps updating until it has ended.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now <= self.end_time
    }
}
