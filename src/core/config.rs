use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

const APP_DIR: &str = "notecart";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_format() -> String {
    "markdown".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
            log_level: default_log_level(),
        }
    }
}

/// Named generation presets trading answer length for cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Minimal,
    Balanced,
    Detailed,
}

impl Profile {
    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::Minimal => 1000,
            Self::Balanced => 2000,
            Self::Detailed => 4000,
        }
    }

    pub fn temperature(&self) -> f64 {
        match self {
            Self::Minimal | Self::Balanced => 0.0,
            Self::Detailed => 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    pub api_key: Option<String>,
    pub profile: Option<Profile>,
    /// Override for the Messages API URL
    pub endpoint: Option<String>,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}
fn default_max_tokens() -> u32 {
    4000
}
fn default_temperature() -> f64 {
    0.1
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_key: None,
            profile: None,
            endpoint: None,
        }
    }
}

impl ModelConfig {
    /// `(max_tokens, temperature)` after applying the profile, if any.
    pub fn generation(&self) -> (u32, f64) {
        match self.profile {
            Some(profile) => (profile.max_tokens(), profile.temperature()),
            None => (self.max_tokens, self.temperature),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub save_to_file: bool,
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

fn default_true() -> bool {
    true
}
fn default_output_directory() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_to_file: true,
            output_directory: default_output_directory(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_cost_log")]
    pub cost_log: PathBuf,
    #[serde(default = "default_item_cache")]
    pub item_cache: PathBuf,
}

fn default_cost_log() -> PathBuf {
    AppConfig::data_dir().join("cost_log.json")
}
fn default_item_cache() -> PathBuf {
    AppConfig::data_dir().join("item_cache.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cost_log: default_cost_log(),
            item_cache: default_item_cache(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join(APP_DIR).join("config.toml")
    }

    /// Directory for the cost log and item cache, respecting XDG_DATA_HOME
    pub fn data_dir() -> PathBuf {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".local")
                    .join("share")
            });
        data_dir.join(APP_DIR)
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["json", "markdown", "text"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'json', 'markdown', or 'text')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if tracing_subscriber::EnvFilter::try_new(&self.settings.log_level).is_err() {
            issues.push(format!("Invalid log_level: '{}'", self.settings.log_level));
        }
        if self.model.model.trim().is_empty() {
            issues.push("Model name is empty".to_string());
        } else if crate::core::cost::pricing::lookup(&self.model.model).is_none() {
            issues.push(format!(
                "No pricing known for model '{}'; costs will use the default tier",
                self.model.model
            ));
        }
        if self.model.max_tokens == 0 {
            issues.push("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.model.temperature) {
            issues.push(format!(
                "Invalid temperature: {} (must be between 0.0 and 1.0)",
                self.model.temperature
            ));
        }
        if let Some(endpoint) = &self.model.endpoint {
            if let Err(e) = crate::core::providers::validate_endpoint(endpoint) {
                issues.push(e.to_string());
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let config = AppConfig::default();
        let issues = config.validate();
        assert!(issues.is_empty(), "Default config should be valid, got: {:?}", issues);
    }

    #[test]
    fn default_format_is_markdown() {
        let settings = Settings::default();
        assert_eq!(settings.default_format, "markdown");
        assert_eq!(settings.color, "auto");
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn default_model_settings() {
        let model = ModelConfig::default();
        assert_eq!(model.model, "claude-sonnet-4-20250514");
        assert_eq!(model.generation(), (4000, 0.1));
    }

    #[test]
    fn profile_overrides_generation() {
        let model = ModelConfig {
            profile: Some(Profile::Minimal),
            ..ModelConfig::default()
        };
        assert_eq!(model.generation(), (1000, 0.0));
        assert_eq!(Profile::Balanced.max_tokens(), 2000);
        assert_eq!(Profile::Detailed.temperature(), 0.1);
    }

    #[test]
    fn validate_catches_invalid_format() {
        let mut config = AppConfig::default();
        config.settings.default_format = "xml".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("default_format")));
    }

    #[test]
    fn validate_catches_invalid_color() {
        let mut config = AppConfig::default();
        config.settings.color = "blue".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("color")));
    }

    #[test]
    fn validate_flags_unpriced_model() {
        let mut config = AppConfig::default();
        config.model.model = "gpt-4o".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("No pricing")));
    }

    #[test]
    fn validate_catches_bad_temperature() {
        let mut config = AppConfig::default();
        config.model.temperature = 1.5;
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("temperature")));
    }

    #[test]
    fn validate_rejects_http_endpoint() {
        let mut config = AppConfig::default();
        config.model.endpoint = Some("http://localhost:8080/v1/messages".to_string());
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("HTTPS")));
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[settings]
default_format = "json"
color = "always"

[model]
model = "claude-3-haiku-20240307"
profile = "balanced"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.settings.default_format, "json");
        assert_eq!(config.settings.color, "always");
        assert_eq!(config.model.model, "claude-3-haiku-20240307");
        assert_eq!(config.model.profile, Some(Profile::Balanced));
        assert!(config.output.save_to_file);
    }

    #[test]
    fn parse_storage_and_output_toml() {
        let toml = r#"
[output]
save_to_file = false
output_directory = "/tmp/lists"

[storage]
cost_log = "/tmp/costs.json"
item_cache = "/tmp/items.json"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert!(!config.output.save_to_file);
        assert_eq!(config.output.output_directory, PathBuf::from("/tmp/lists"));
        assert_eq!(config.storage.cost_log, PathBuf::from("/tmp/costs.json"));
        assert_eq!(config.storage.item_cache, PathBuf::from("/tmp/items.json"));
    }

    #[test]
    fn parse_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.settings.default_format, "markdown");
        assert_eq!(config.model.max_tokens, 4000);
        assert!(config.storage.cost_log.ends_with("notecart/cost_log.json"));
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.settings.default_format, "markdown");
    }

    #[test]
    fn load_from_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings\ncolor = ").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.model.profile = Some(Profile::Detailed);
        config.settings.default_format = "text".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.model.profile, Some(Profile::Detailed));
        assert_eq!(loaded.settings.default_format, "text");
    }

    #[test]
    fn config_path_and_load_use_xdg_when_set() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
        let path = AppConfig::config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[settings]\ndefault_format = \"text\"\n").unwrap();
        let loaded = AppConfig::load();
        std::env::remove_var("XDG_CONFIG_HOME");

        assert_eq!(path, dir.path().join("notecart").join("config.toml"));
        assert_eq!(loaded.unwrap().settings.default_format, "text");
    }
}
