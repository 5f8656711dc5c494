//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Default config file content for `--config-init`.
pub const DEFAULT_CONFIG: &str = r#"# Datesift configuration
# See: datesift --help for all options

# Disable colored output
no_color = false

# Print JSON instead of the pretty report
json = false

# Extraction strategies to turn off (ids or aliases: pattern, entity, month)
disabled = []

# Entity recognizer: "context" (built-in rules) or "none"
recognizer = "context"
"#;

/// Which entity recognizer backs the entity strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    #[default]
    Context,
    None,
}

impl std::str::FromStr for RecognizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "context" => Ok(Self::Context),
            "none" | "off" => Ok(Self::None),
            other => Err(format!("unknown recognizer '{}'", other)),
        }
    }
}

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub no_color: Option<bool>,
    pub json: Option<bool>,
    pub disabled: Option<Vec<String>>,
    pub recognizer: Option<RecognizerKind>,
}

impl Config {
    /// Get the config file path.
    ///
    /// - Linux/macOS: `~/.config/datesift/config.toml`
    /// - Windows: `%APPDATA%\datesift\config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("datesift").join("config.toml"))
    }

    /// Load config from file. Returns default if file doesn't exist.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Read value from environment variable.
    fn env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok()?.parse().ok()
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        // NO_COLOR is a standard - presence means disable color
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        if std::env::var("DATESIFT_NO_COLOR").is_ok() {
            return true;
        }
        self.no_color.unwrap_or(false)
    }

    /// Get json with precedence: env > config > default.
    pub fn json(&self) -> bool {
        Self::env_var("DATESIFT_JSON")
            .or(self.json)
            .unwrap_or(false)
    }

    /// Get disabled strategies with precedence: env > config > default.
    ///
    /// The env var is a comma-separated list.
    pub fn disabled(&self) -> Vec<String> {
        if let Ok(list) = std::env::var("DATESIFT_DISABLE") {
            return split_list(&list);
        }
        self.disabled.clone().unwrap_or_default()
    }

    /// Get recognizer with precedence: env > config > default.
    pub fn recognizer(&self) -> RecognizerKind {
        Self::env_var("DATESIFT_RECOGNIZER")
            .or(self.recognizer)
            .unwrap_or_default()
    }
}

/// Split a comma-separated list, dropping empty entries.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;

    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    // Create parent directory
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(&path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid_toml() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).expect("DEFAULT_CONFIG should parse");
        assert_eq!(config.no_color, Some(false));
        assert_eq!(config.json, Some(false));
        assert_eq!(config.disabled, Some(vec![]));
        assert_eq!(config.recognizer, Some(RecognizerKind::Context));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
disabled = ["month"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.disabled, Some(vec!["month".to_string()]));
        assert_eq!(config.recognizer, None);
        assert_eq!(config.json, None);
    }

    #[test]
    fn test_recognizer_none() {
        let config: Config = toml::from_str(r#"recognizer = "none""#).unwrap();
        assert_eq!(config.recognizer, Some(RecognizerKind::None));
        assert!(toml::from_str::<Config>(r#"recognizer = "spacy""#).is_err());
    }

    #[test]
    fn test_recognizer_from_str() {
        assert_eq!(
            "Context".parse::<RecognizerKind>(),
            Ok(RecognizerKind::Context)
        );
        assert_eq!("off".parse::<RecognizerKind>(), Ok(RecognizerKind::None));
        assert!("ner".parse::<RecognizerKind>().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let config: Config = toml::from_str("json = false\ndisabled = [\"entity\"]").unwrap();

        std::env::set_var("DATESIFT_JSON", "true");
        std::env::set_var("DATESIFT_DISABLE", "month, pattern");
        std::env::set_var("DATESIFT_RECOGNIZER", "none");
        let json = config.json();
        let disabled = config.disabled();
        let recognizer = config.recognizer();
        std::env::remove_var("DATESIFT_JSON");
        std::env::remove_var("DATESIFT_DISABLE");
        std::env::remove_var("DATESIFT_RECOGNIZER");

        assert!(json);
        assert_eq!(disabled, vec!["month", "pattern"]);
        assert_eq!(recognizer, RecognizerKind::None);

        assert!(!config.json());
        assert_eq!(config.disabled(), vec!["entity"]);
        assert_eq!(config.recognizer(), RecognizerKind::Context);
    }

    #[test]
    #[serial]
    fn test_unparseable_env_falls_back() {
        let config: Config = toml::from_str("json = true").unwrap();
        std::env::set_var("DATESIFT_JSON", "yes please");
        let json = config.json();
        std::env::remove_var("DATESIFT_JSON");
        assert!(json);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("month, entity,,"), vec!["month", "entity"]);
        assert!(split_list("").is_empty());
    }
}
