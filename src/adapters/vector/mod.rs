//! Vector index adapters and the distance math they share.

pub mod in_memory;

pub use in_memory::InMemoryVectorIndex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::Neighbor;

/// Distance reported when two vectors cannot be compared.
pub const MAX_COSINE_DISTANCE: f32 = 2.0;

/// Cosine distance `1 - cos(a, b)`, clamped to `[0, 2]`.
///
/// Mismatched lengths and zero vectors are maximally distant.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return MAX_COSINE_DISTANCE;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return MAX_COSINE_DISTANCE;
    }

    (1.0 - dot / (mag_a * mag_b)).clamp(0.0, MAX_COSINE_DISTANCE)
}

/// Serialize a vector as little-endian `f32` bytes.
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Inverse of [`embedding_to_bytes`].
pub fn bytes_to_embedding(bytes: &[u8]) -> DomainResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(DomainError::SerializationError(format!(
            "Invalid embedding bytes length: {}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

pub(crate) fn check_dimension(expected: usize, vector: &[f32]) -> DomainResult<()> {
    if vector.len() != expected {
        return Err(DomainError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}

/// Nearest first; equal distances fall back to key order so results are stable.
pub(crate) fn nearest(mut candidates: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.key.cmp(&b.key)));
    candidates.truncate(k);
    candidates
}
