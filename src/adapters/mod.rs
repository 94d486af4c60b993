//! Infrastructure adapters implementing the domain ports.

pub mod embeddings;
pub mod sqlite;
pub mod vector;
