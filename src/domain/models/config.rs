use serde::{Deserialize, Serialize};

/// Main configuration structure for the belief store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cross-domain similarity search defaults
    #[serde(default)]
    pub similarity: SimilarityConfig,

    /// Hotspot aggregation defaults
    #[serde(default)]
    pub accumulation: AccumulationConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".comprehension/beliefs.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// `sqlx` connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rotated log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Number of days to retain logs
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

const fn default_retention_days() -> u32 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            retention_days: default_retention_days(),
        }
    }
}

/// Similarity search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimilarityConfig {
    /// Matches returned by "reminds me of" when the caller has no preference
    #[serde(default = "default_similarity_limit")]
    pub default_limit: usize,

    /// Similarity floor (`1 - cosine distance`)
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Candidates fetched per requested match, absorbing same-domain filtering
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: usize,
}

const fn default_similarity_limit() -> usize {
    5
}

const fn default_min_similarity() -> f64 {
    0.75
}

const fn default_overfetch_factor() -> usize {
    3
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            default_limit: default_similarity_limit(),
            min_similarity: default_min_similarity(),
            overfetch_factor: default_overfetch_factor(),
        }
    }
}

/// Hotspot thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccumulationConfig {
    /// Minimum distinct source domains
    #[serde(default = "default_min_domains")]
    pub min_domains: u64,

    /// Minimum incoming edges
    #[serde(default = "default_min_connections")]
    pub min_connections: u64,
}

const fn default_min_domains() -> u64 {
    2
}

const fn default_min_connections() -> u64 {
    3
}

impl Default for AccumulationConfig {
    fn default() -> Self {
        Self {
            min_domains: default_min_domains(),
            min_connections: default_min_connections(),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Vector length produced by the embedding provider and accepted by the index
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

const fn default_dimension() -> usize {
    384
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
        }
    }
}
