use crate::error::{Result, SmartRiceError};
use crate::models::DuplicatePolicy;
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub farm: FarmConfig,
    #[serde(default)]
    pub rainfall: RainfallConfig,
    /// Overrides the XDG data directory for the SQLite database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FarmConfig {
    pub name: String,
    pub location: String,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            name: "My Farm".into(),
            location: "Bayombong, Nueva Vizcaya".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RainfallConfig {
    /// How repeated dates in imported rainfall lists are resolved
    #[serde(default)]
    pub duplicate_dates: DuplicatePolicy,
}

impl Config {
    pub fn load(config_override: Option<&Path>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.to_path_buf(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(SmartRiceError::Config(format!(
                "Config file not found at {:?}. Run `smartrice init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| SmartRiceError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Load the config file if one exists, otherwise fall back to defaults.
    /// An explicit path that does not exist is still an error.
    pub fn load_or_default(config_override: Option<&Path>) -> Result<Self> {
        if config_override.is_none() && !Self::exists(None) {
            tracing::info!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(config_override)
    }

    /// Parse YAML after `${VAR}` substitution
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;
        serde_yaml::from_str(&content)
            .map_err(|e| SmartRiceError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&Path>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/smartrice/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SmartRiceError::Config("Cannot determine config directory".into()))?
            .join("smartrice");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive(target: Option<&Path>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up SmartRice!");
        println!();

        println!("Farm");
        let name: String = Input::new()
            .with_prompt("  Farm name")
            .default("My Farm".into())
            .interact_text()
            .map_err(|e| SmartRiceError::Config(format!("Input error: {}", e)))?;

        let location: String = Input::new()
            .with_prompt("  Location")
            .default("Bayombong, Nueva Vizcaya".into())
            .interact_text()
            .map_err(|e| SmartRiceError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Rainfall data");
        let policies = [
            DuplicatePolicy::LastWins,
            DuplicatePolicy::Sum,
            DuplicatePolicy::Reject,
        ];
        let labels = [
            "last-wins: a later reading for the same date replaces the earlier one",
            "sum: readings for the same date are added together",
            "reject: an import with a repeated date is refused",
        ];
        let choice = Select::new()
            .with_prompt("  Repeated dates in imports")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| SmartRiceError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            farm: FarmConfig { name, location },
            rainfall: RainfallConfig {
                duplicate_dates: policies[choice],
            },
            data_dir: None,
        };

        let config_path = match target {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };
        config.write_to(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;

        let content = format!(
            "# SmartRice Configuration\n# Generated by `smartrice init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| SmartRiceError::Config(format!("Bad substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    /// Data directory: CLI override, then `SMARTRICE_DATA_DIR`, then the
    /// config file, then the XDG data directory. Created if missing.
    pub fn data_dir(&self, data_dir_override: Option<&Path>) -> Result<PathBuf> {
        let dir = if let Some(dir) = data_dir_override {
            dir.to_path_buf()
        } else if let Ok(dir) = std::env::var("SMARTRICE_DATA_DIR") {
            PathBuf::from(dir)
        } else if let Some(ref dir) = self.data_dir {
            dir.clone()
        } else {
            dirs::data_dir()
                .ok_or_else(|| SmartRiceError::Config("Cannot determine data directory".into()))?
                .join("smartrice")
        };

        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn db_path(&self, data_dir_override: Option<&Path>) -> Result<PathBuf> {
        Ok(self.data_dir(data_dir_override)?.join("smartrice.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
farm:
  name: Dela Cruz Farm
  location: Solano
rainfall:
  duplicate_dates: sum
data_dir: /tmp/smartrice-test
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.farm.name, "Dela Cruz Farm");
        assert_eq!(config.rainfall.duplicate_dates, DuplicatePolicy::Sum);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/smartrice-test")));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = Config::from_yaml("farm:\n  name: A\n  location: B\n").unwrap();
        assert_eq!(config.rainfall.duplicate_dates, DuplicatePolicy::LastWins);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = Config::from_yaml("rainfall:\n  duplicate_dates: average\n").unwrap_err();
        assert!(matches!(err, SmartRiceError::Config(_)));
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("SMARTRICE_TEST_FARM_NAME", "Env Farm");
        let yaml = "farm:\n  name: ${SMARTRICE_TEST_FARM_NAME}\n  location: ${SMARTRICE_TEST_UNSET_VAR}\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.farm.name, "Env Farm");
        // Unset variables are left as-is
        assert_eq!(config.farm.location, "${SMARTRICE_TEST_UNSET_VAR}");
    }

    #[test]
    fn write_then_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("smartrice-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.yaml");
        let config = Config {
            rainfall: RainfallConfig {
                duplicate_dates: DuplicatePolicy::Reject,
            },
            ..Config::default()
        };
        config.write_to(&path).unwrap();
        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let path = std::env::temp_dir().join("smartrice-does-not-exist/config.yaml");
        assert!(Config::load_or_default(Some(&path)).is_err());
    }

    #[test]
    fn data_dir_override_wins() {
        let dir = std::env::temp_dir().join(format!("smartrice-data-{}", uuid::Uuid::new_v4()));
        let config = Config::default();
        let db_path = config.db_path(Some(&dir)).unwrap();
        assert_eq!(db_path, dir.join("smartrice.db"));
        assert!(dir.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
