//! Observation domain model: raw evidence without interpretation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Schema tag carried by every serialized observation.
pub const OBSERVATION_SCHEMA: &str = "observation/v1";

/// What happened, captured as an immutable piece of evidence.
///
/// Observations are inputs to belief updates, not conclusions. Their
/// content may be pruned once incorporated; their ids live on in every
/// belief that used them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Agent or system that made the observation.
    pub source: String,
    pub event: String,
    #[serde(default)]
    pub context: BTreeMap<String, serde_json::Value>,
    /// Reference to a full execution trace, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_ref: Option<String>,
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_schema() -> String {
    OBSERVATION_SCHEMA.to_string()
}

impl Observation {
    /// Create an observation with a generated `obs-<uuid>` id.
    pub fn new(source: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            id: format!("obs-{}", Uuid::new_v4()),
            timestamp: Utc::now(),
            source: source.into(),
            event: event.into(),
            context: BTreeMap::new(),
            trace_ref: None,
            schema: default_schema(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    pub fn with_trace_ref(mut self, trace_ref: impl Into<String>) -> Self {
        self.trace_ref = Some(trace_ref.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Observation id cannot be empty".to_string());
        }
        if self.source.trim().is_empty() {
            return Err("Observation source cannot be empty".to_string());
        }
        if self.event.trim().is_empty() {
            return Err("Observation event cannot be empty".to_string());
        }
        Ok(())
    }
}
