//! Configuration management module
//!
//! TOML-based configuration with the following search order:
//! 1. ./async-modal.toml
//! 2. ~/.config/async-modal/config.toml
//! 3. Default configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::{
    error::{AppError, AppResult},
    modal::OverlapPolicy,
};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "./async-modal.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Modal interaction behaviour
    pub modal: ModalConfig,
    /// UI configuration
    pub ui: UIConfig,
}

impl Config {
    /// Load configuration from default locations
    pub async fn load() -> AppResult<Self> {
        info!("Loading application configuration");

        if Path::new(LOCAL_CONFIG_FILE).exists() {
            let config = Self::load_from_file(LOCAL_CONFIG_FILE).await?;
            info!("Loaded configuration from {}", LOCAL_CONFIG_FILE);
            return Ok(config);
        }

        if let Some(config_path) = Self::user_config_path() {
            if config_path.exists() {
                let config = Self::load_from_file(&config_path).await?;
                info!("Loaded configuration from {}", config_path.display());
                return Ok(config);
            }
        }

        info!("Using default configuration");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path).await?;
        let config = Self::from_toml(&content)?;

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let path = path.as_ref();
        debug!("Saving configuration to: {}", path.display());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).await?;

        info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> AppResult<()> {
        debug!("Validating configuration");

        if !(10..=100).contains(&self.ui.modal_width_percent) {
            return Err(AppError::config(
                "modal_width_percent must be between 10 and 100",
            ));
        }

        if !(10..=100).contains(&self.ui.modal_height_percent) {
            return Err(AppError::config(
                "modal_height_percent must be between 10 and 100",
            ));
        }

        if self.ui.refresh_rate_ms == 0 {
            return Err(AppError::config("refresh_rate_ms must be greater than 0"));
        }

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Get user configuration file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("async-modal");
            path.push("config.toml");
            path
        })
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name, shown in the header
    pub name: String,
    /// Log file used while the terminal UI owns stdout
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Async Modal Demo".to_string(),
            log_file: None,
        }
    }
}

/// Modal interaction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// What `show_modal` does while an interaction is still pending
    pub overlap_policy: OverlapPolicy,
    /// Reject pending interactions with `Dismissal::Closed` when the host exits
    pub dismiss_on_exit: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::default(),
            dismiss_on_exit: true,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    /// Theme name
    pub theme: String,
    /// Modal width as a percentage of the terminal
    pub modal_width_percent: u16,
    /// Modal height as a percentage of the terminal
    pub modal_height_percent: u16,
    /// Input poll interval in milliseconds
    pub refresh_rate_ms: u64,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            modal_width_percent: 50,
            modal_height_percent: 30,
            refresh_rate_ms: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [modal]
            overlap_policy = "refuse"
            "#,
        )
        .unwrap();

        assert_eq!(config.modal.overlap_policy, OverlapPolicy::Refuse);
        assert!(config.modal.dismiss_on_exit);
        assert_eq!(config.ui.theme, "default");
    }

    #[test]
    fn test_validation_rejects_zero_refresh_rate() {
        let result = Config::from_toml(
            r#"
            [ui]
            refresh_rate_ms = 0
            "#,
        );

        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[test]
    fn test_unknown_policy_is_a_parse_error() {
        let result = Config::from_toml(
            r#"
            [modal]
            overlap_policy = "queue"
            "#,
        );

        assert!(matches!(result, Err(AppError::ConfigParse(_))));
    }
}
