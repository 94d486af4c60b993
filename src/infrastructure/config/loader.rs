use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Directory, relative to the project root, holding configuration and data.
pub const CONFIG_DIR: &str = ".comprehension";

/// Prefix for environment overrides; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "COMPREHENSION_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid min_similarity: {0}. Must be between -1.0 and 1.0")]
    InvalidMinSimilarity(f64),

    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the current directory
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .comprehension/config.yaml
    /// 3. .comprehension/local.yaml (optional local overrides)
    /// 4. COMPREHENSION_* environment variables
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Same as [`load`](Self::load), rooted at `root` instead of the working directory.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let dir = root.as_ref().join(CONFIG_DIR);

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let min_similarity = config.similarity.min_similarity;
        if !(-1.0..=1.0).contains(&min_similarity) {
            return Err(ConfigError::InvalidMinSimilarity(min_similarity));
        }

        if config.similarity.default_limit == 0 {
            return Err(ConfigError::ValidationFailed(
                "similarity.default_limit must be at least 1".to_string(),
            ));
        }

        if config.similarity.overfetch_factor == 0 {
            return Err(ConfigError::ValidationFailed(
                "similarity.overfetch_factor must be at least 1".to_string(),
            ));
        }

        if config.accumulation.min_domains == 0 || config.accumulation.min_connections == 0 {
            return Err(ConfigError::ValidationFailed(
                "accumulation thresholds must be at least 1".to_string(),
            ));
        }

        if config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidDimension(config.embedding.dimension));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, ".comprehension/beliefs.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.similarity.default_limit, 5);
        assert_eq!(config.similarity.overfetch_factor, 3);
        assert_eq!(config.accumulation.min_domains, 2);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/beliefs.db
  max_connections: 8
logging:
  level: debug
  format: pretty
similarity:
  min_similarity: 0.6
accumulation:
  min_domains: 3
embedding:
  dimension: 256
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.database.path, "/custom/beliefs.db");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.logging.format, "pretty");
        assert!((config.similarity.min_similarity - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.similarity.default_limit, 5, "unset fields keep defaults");
        assert_eq!(config.accumulation.min_domains, 3);
        assert_eq!(config.accumulation.min_connections, 3);
        assert_eq!(config.embedding.dimension, 256);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::InvalidLogFormat(_))));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = "  ".to_string();
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::EmptyDatabasePath)));
    }

    #[test]
    fn test_validate_zero_max_connections() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_validate_min_similarity_range() {
        let mut config = Config::default();
        config.similarity.min_similarity = 1.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMinSimilarity(_))
        ));

        config.similarity.min_similarity = f64::NAN;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_validate_zero_thresholds() {
        let mut config = Config::default();
        config.accumulation.min_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ValidationFailed(_))
        ));

        let mut config = Config::default();
        config.embedding.dimension = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidDimension(0))
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.yaml"),
            "logging:\n  level: info\n  format: pretty\nsimilarity:\n  default_limit: 7\n",
        )
        .unwrap();
        fs::write(dir.join("local.yaml"), "logging:\n  level: debug\n").unwrap();

        let config = temp_env::with_vars_unset(
            ["COMPREHENSION_LOGGING__LEVEL", "COMPREHENSION_SIMILARITY__DEFAULT_LIMIT"],
            || ConfigLoader::load_from_dir(root.path()).unwrap(),
        );

        assert_eq!(config.logging.level, "debug", "local.yaml should win");
        assert_eq!(config.logging.format, "pretty", "config.yaml value should persist");
        assert_eq!(config.similarity.default_limit, 7);
    }

    #[test]
    fn test_env_override() {
        let root = tempfile::tempdir().unwrap();

        let config = temp_env::with_vars(
            [
                ("COMPREHENSION_LOGGING__LEVEL", Some("warn")),
                ("COMPREHENSION_SIMILARITY__MIN_SIMILARITY", Some("0.5")),
                ("COMPREHENSION_EMBEDDING__DIMENSION", Some("64")),
            ],
            || ConfigLoader::load_from_dir(root.path()).unwrap(),
        );

        assert_eq!(config.logging.level, "warn");
        assert!((config.similarity.min_similarity - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.embedding.dimension, 64);
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("bad.yaml");
        fs::write(&path, "embedding:\n  dimension: 0\n").unwrap();
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
