//! # Configuration Management for sqldialect
//!
//! This crate provides the configuration structures for the dialect
//! registry: bootstrap switches, database-id overrides, dynamic dialect
//! registrations and data-only dialect profiles.
//!
//! ## Quick Start
//!
//! ### TOML File Configuration
//! ```toml
//! [registry]
//! load_builtins = true
//! database_id_file = "database-id.properties"
//!
//! [database_ids]
//! "Microsoft SQL Server" = "sqlserver"
//!
//! [[dialects]]
//! implementation = "acme::VerticaDialect"
//! name = "vertica"
//!
//! [[profiles]]
//! name = "exasol"
//! supports_variable_limit = true
//! supports_limit_offset = true
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from SQLDIALECT_CONFIG, ./sqldialect.toml, or defaults
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use dialect_profile::CapabilityProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./sqldialect.toml";
const CONFIG_PATH_VAR: &str = "SQLDIALECT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    /// Keyword -> canonical dialect name overrides
    pub database_ids: BTreeMap<String, String>,
    pub dialects: Vec<DialectRegistration>,
    pub profiles: Vec<ProfileConfig>,
}

/// Registry bootstrap configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub load_builtins: bool,
    /// Optional properties resource with `keyword = name` lines
    pub database_id_file: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            load_builtins: true,
            database_id_file: None,
        }
    }
}

/// Dialect registered by implementation type name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectRegistration {
    pub implementation: String,
    /// Extra name the dialect is also registered under
    #[serde(default)]
    pub name: Option<String>,
}

/// Dialect defined only by its capability flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    #[serde(flatten)]
    pub profile: CapabilityProfile,
}

impl AppConfig {
    /// Load configuration from the file named in the environment (or .env),
    /// from the default path, or fall back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::check_dotenv(dotenvy::dotenv())?;

        let config = match env::var(CONFIG_PATH_VAR) {
            Ok(config_path) => Self::from_file(&config_path)?,
            Err(env::VarError::NotPresent) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(env::VarError::NotPresent) => Self::default(),
            Err(err) => return Err(err.into()),
        };

        config.validate()?;
        Ok(config)
    }

    /// A missing .env file is fine, an unreadable or malformed one is not
    fn check_dotenv<T>(result: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
        match result {
            Ok(_) => Ok(()),
            Err(err) if err.not_found() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.registry.database_id_file {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "Registry database_id_file cannot be empty".to_string(),
                ));
            }
        }

        for (keyword, name) in &self.database_ids {
            if keyword.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "Database id keyword cannot be empty".to_string(),
                ));
            }
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Database id for keyword '{}' cannot be empty",
                    keyword
                )));
            }
        }

        for dialect in &self.dialects {
            if dialect.implementation.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "Dialect implementation cannot be empty".to_string(),
                ));
            }
            if dialect.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "Dialect name for '{}' cannot be empty",
                    dialect.implementation
                )));
            }
        }

        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "Profile name cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl DialectRegistration {
    /// Create a new registration
    pub fn new(implementation: String, name: Option<String>) -> Self {
        Self {
            implementation,
            name,
        }
    }
}

impl ProfileConfig {
    /// Create a new data-only dialect configuration
    pub fn new(name: String, profile: CapabilityProfile) -> Self {
        Self { name, profile }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.registry.load_builtins);
        assert!(config.registry.database_id_file.is_none());
    }

    #[test]
    fn test_full_document() {
        let config = AppConfig::from_toml_str(
            r#"
            [registry]
            load_builtins = false
            database_id_file = "ids.properties"

            [database_ids]
            "Microsoft SQL Server" = "sqlserver"

            [[dialects]]
            implementation = "acme::VerticaDialect"
            name = "vertica"

            [[dialects]]
            implementation = "acme::ExasolDialect"

            [[profiles]]
            name = "exasol"
            supports_variable_limit = true
            supports_limit_offset = true
            "#,
        )
        .unwrap();

        assert!(!config.registry.load_builtins);
        assert_eq!(config.registry.database_id_file.as_deref(), Some("ids.properties"));
        assert_eq!(
            config.database_ids.get("Microsoft SQL Server"),
            Some(&"sqlserver".to_string())
        );
        assert_eq!(config.dialects.len(), 2);
        assert_eq!(config.dialects[1].name, None);

        let profile = &config.profiles[0].profile;
        assert!(profile.supports_variable_limit());
        assert!(profile.supports_limit_offset());
        assert!(!profile.use_max_for_limit());
    }

    #[test]
    fn test_blank_implementation_is_invalid() {
        let result = AppConfig::from_toml_str(
            r#"
            [[dialects]]
            implementation = " "
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_blank_dialect_name_is_invalid() {
        let result = AppConfig::from_toml_str(
            r#"
            [[dialects]]
            implementation = "acme::VerticaDialect"
            name = ""
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_blank_database_id_is_invalid() {
        let result = AppConfig::from_toml_str(
            r#"
            [database_ids]
            MySQL = ""
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_blank_profile_name_is_invalid() {
        let mut config = AppConfig::default();
        config.profiles.push(ProfileConfig::new(String::new(), CapabilityProfile::new()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_toml_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[registry"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_malformed_env_file_is_a_dotenvy_error() {
        let path = std::env::temp_dir().join(format!("sqldialect-{}.env", std::process::id()));
        std::fs::write(&path, "THIS IS NOT A VALID LINE\n").unwrap();

        let result = AppConfig::check_dotenv(dotenvy::from_path(&path));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::Dotenvy(_))));
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let result = AppConfig::check_dotenv(dotenvy::from_path("/definitely/not/here.env"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        assert!(matches!(
            AppConfig::from_file("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
