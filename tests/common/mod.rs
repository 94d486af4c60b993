//! Common test utilities for integration tests

use std::path::PathBuf;
use std::sync::Arc;

use comprehension::adapters::sqlite::create_migrated_test_pool;
use comprehension::domain::models::{Belief, BeliefPrior, ConfidenceLevel, Config};
use comprehension::BeliefStore;
use tempfile::TempDir;

/// Embedding dimension used by integration tests.
#[allow(dead_code)]
pub const TEST_DIM: usize = 128;

/// Create a temporary test database
///
/// Returns the path to a SQLite database file in a temporary directory.
#[allow(dead_code)]
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("beliefs.db");
    (dir, db_path)
}

/// Config pointing at `db_path` with the test embedding dimension.
#[allow(dead_code)]
pub fn test_config(db_path: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.database.path = db_path.display().to_string();
    config.embedding.dimension = TEST_DIM;
    config
}

/// A belief store over a fresh in-memory database.
#[allow(dead_code)]
pub async fn memory_store() -> Arc<BeliefStore> {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    let mut config = Config::default();
    config.embedding.dimension = TEST_DIM;
    Arc::new(BeliefStore::from_pool(pool, &config))
}

#[allow(dead_code)]
pub fn belief(id: &str, domain: &str, statement: &str, confidence: ConfidenceLevel) -> Belief {
    Belief::new(
        id,
        format!("{domain} behavior"),
        domain,
        BeliefPrior::new(statement, confidence, "training"),
    )
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
