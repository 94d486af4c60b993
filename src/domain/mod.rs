//! Domain layer for the comprehension belief store
//!
//! This module contains core domain models, errors and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
