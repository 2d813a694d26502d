use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::constants::{self, squad};
use crate::error::AppError;
use crate::roster::Position;
use crate::selection::{GroupLimit, SquadRules};

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// URL of the market-valuation feed (JSON). Unset means the feed must
    /// be supplied as a local file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_url: Option<String>,
    /// URL of the fantasy-cost feed (semicolon CSV).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fantasy_url: Option<String>,
    /// Path to the log file. If not specified, logs go to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for feed requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Wall-clock budget for the solver in seconds. Expiry is reported as a
    /// timeout, distinct from infeasibility.
    #[serde(default = "default_solver_timeout")]
    pub solver_timeout_seconds: u64,
    /// Squad composition rules.
    #[serde(default)]
    pub squad: SquadConfig,
    /// Known cross-feed naming mismatches: fantasy display name → valuation
    /// display name. Data, not code, so corrections never touch matching
    /// logic.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub name_overrides: HashMap<String, String>,
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

/// Default solver timeout in seconds
fn default_solver_timeout() -> u64 {
    constants::DEFAULT_SOLVER_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            market_url: None,
            fantasy_url: None,
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            solver_timeout_seconds: default_solver_timeout(),
            squad: SquadConfig::default(),
            name_overrides: HashMap::new(),
        }
    }
}

/// Squad composition rules as they appear in the config file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SquadConfig {
    /// Total number of players to select.
    pub squad_size: u32,
    /// Budget cap on total in-game cost, in euros.
    pub budget_cap: f64,
    /// Exact required count per position.
    pub position_quotas: BTreeMap<Position, u32>,
    /// Window applied to every observed group without an explicit entry.
    pub group_limit: Option<GroupLimit>,
    /// Explicit per-group windows.
    pub group_quotas: BTreeMap<String, GroupLimit>,
}

impl Default for SquadConfig {
    fn default() -> Self {
        let mut position_quotas = BTreeMap::new();
        position_quotas.insert(Position::Goalkeeper, squad::GOALKEEPERS);
        position_quotas.insert(Position::Defender, squad::DEFENDERS);
        position_quotas.insert(Position::Midfielder, squad::MIDFIELDERS);
        position_quotas.insert(Position::Forward, squad::FORWARDS);
        SquadConfig {
            squad_size: squad::SQUAD_SIZE,
            budget_cap: squad::BUDGET_CAP,
            position_quotas,
            group_limit: Some(GroupLimit {
                min: squad::GROUP_MIN,
                max: squad::GROUP_MAX,
            }),
            group_quotas: BTreeMap::new(),
        }
    }
}

impl SquadConfig {
    /// Converts the file representation into the builder's rule set.
    pub fn to_rules(&self) -> SquadRules {
        SquadRules {
            squad_size: self.squad_size,
            budget_cap: self.budget_cap,
            position_quotas: self.position_quotas.clone(),
            group_quotas: self.group_quotas.clone(),
            default_group_limit: self.group_limit,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists, writes one with default values.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `SQUAD_MARKET_URL` - Override the market feed URL
    /// - `SQUAD_FANTASY_URL` - Override the fantasy feed URL
    /// - `SQUAD_LOG_FILE` - Override log file path
    /// - `SQUAD_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save().await?;
            tracing::info!("Wrote default configuration to {config_path}");
            config
        };

        // Override with environment variables if present
        if let Ok(market_url) = std::env::var(constants::env_vars::MARKET_URL) {
            config.market_url = Some(market_url);
        }

        if let Ok(fantasy_url) = std::env::var(constants::env_vars::FANTASY_URL) {
            config.fantasy_url = Some(fantasy_url);
        }

        if let Ok(log_file_path) = std::env::var(constants::env_vars::LOG_FILE) {
            config.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(constants::env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.http_timeout_seconds = timeout;
        }

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration settings, including the squad rules.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(&self.market_url, &self.fantasy_url, &self.log_file_path)?;
        self.squad.to_rules().validate()
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("Market Feed URL:");
            println!("{}", config.market_url.as_deref().unwrap_or("(not set)"));
            println!("────────────────────────────────────");
            println!("Fantasy Feed URL:");
            println!("{}", config.fantasy_url.as_deref().unwrap_or("(not set)"));
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Solver Timeout:");
            println!("{} seconds", config.solver_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Squad Rules:");
            println!(
                "{} players, budget {:.2} Mio. €",
                config.squad.squad_size,
                config.squad.budget_cap / 1_000_000.0
            );
            for (position, count) in &config.squad.position_quotas {
                println!("  {position}: {count}");
            }
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/squad_optimizer.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and ensures
    /// configured feed URLs carry an https:// prefix.
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let mut to_save = self.clone();
        to_save.market_url = to_save.market_url.as_deref().map(ensure_https);
        to_save.fantasy_url = to_save.fantasy_url.as_deref().map(ensure_https);

        let content = toml::to_string_pretty(&to_save)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path (for testing).
    #[allow(dead_code)] // Used in tests
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn ensure_https(url: &str) -> String {
    if url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url.trim_start_matches("http://"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
market_url = "https://feeds.example.com/market.json"
fantasy_url = "https://feeds.example.com/players.csv"
log_file_path = "/custom/log/path"
"#;
        tokio::fs::write(&config_path, config_content)
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(
            config.market_url.as_deref(),
            Some("https://feeds.example.com/market.json")
        );
        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        // Unspecified sections fall back to defaults.
        assert_eq!(config.http_timeout_seconds, default_http_timeout());
        assert_eq!(config.squad, SquadConfig::default());
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let mut original = Config::default();
        original.market_url = Some("https://feeds.example.com/market.json".to_string());
        original.fantasy_url = Some("https://feeds.example.com/players.csv".to_string());
        original
            .name_overrides
            .insert("T. Alcántara".to_string(), "Thiago".to_string());
        original.squad.group_quotas.insert(
            "fc-bayern".to_string(),
            GroupLimit { min: 0, max: 2 },
        );

        original.save_to_path(&config_path_str).await.unwrap();
        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_save_adds_https_prefix() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let mut config = Config::default();
        config.market_url = Some("feeds.example.com/market.json".to_string());
        config.fantasy_url = Some("http://feeds.example.com/players.csv".to_string());
        config.save_to_path(&config_path_str).await.unwrap();

        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(
            loaded.market_url.as_deref(),
            Some("https://feeds.example.com/market.json")
        );
        assert_eq!(
            loaded.fantasy_url.as_deref(),
            Some("https://feeds.example.com/players.csv")
        );
    }

    #[tokio::test]
    async fn test_config_save_creates_directory() {
        let temp_dir = tempdir().unwrap();
        let config_dir = temp_dir.path().join("squad_optimizer");
        let config_path = config_dir.join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        Config::default().save_to_path(&config_path_str).await.unwrap();
        assert!(config_dir.exists());
        assert!(config_path.exists());
    }

    #[tokio::test]
    async fn test_config_malformed_toml_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("malformed_config.toml");
        let config_path_str = config_path.to_string_lossy();

        let malformed_content = r#"
market_url = "https://feeds.example.com"
[invalid_section
malformed = "data
"#;
        tokio::fs::write(&config_path, malformed_content)
            .await
            .unwrap();

        let result = Config::load_from_path(&config_path_str).await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[tokio::test]
    async fn test_config_with_extra_fields() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("extra_fields_config.toml");
        let config_path_str = config_path.to_string_lossy();

        let extra_fields_content = r#"
market_url = "https://feeds.example.com/market.json"
extra_field = "this should be ignored"
another_extra = 123
"#;
        tokio::fs::write(&config_path, extra_fields_content)
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(
            config.market_url.as_deref(),
            Some("https://feeds.example.com/market.json")
        );
    }

    #[test]
    fn test_default_squad_config_is_consistent() {
        let rules = SquadConfig::default().to_rules();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.squad_size, 15);
        let quota_sum: u32 = rules.position_quotas.values().sum();
        assert_eq!(quota_sum, 15);
    }

    #[test]
    fn test_inconsistent_squad_config_fails_validation() {
        let mut config = Config::default();
        config.squad.squad_size = 12; // quotas still sum to 15
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_position_quotas_parse_from_toml() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let content = r#"
[squad]
squad_size = 3
budget_cap = 10000000.0

[squad.position_quotas]
goalkeeper = 1
forward = 2
"#;
        tokio::fs::write(&config_path, content).await.unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(config.squad.squad_size, 3);
        assert_eq!(
            config.squad.position_quotas.get(&Position::Goalkeeper),
            Some(&1)
        );
        assert_eq!(
            config.squad.position_quotas.get(&Position::Forward),
            Some(&2)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains("squad_optimizer"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let log_dir_path = Config::get_log_dir_path();
        assert!(log_dir_path.contains("squad_optimizer"));
        assert!(log_dir_path.ends_with("logs"));
    }
}
