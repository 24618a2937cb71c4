//! Domain models for the graphweave extraction pipeline.
//!
//! This module contains the graph records produced by extraction:
//!
//! - [`Node`] - A graph node with id, label and properties
//! - [`Edge`] - A directed edge between two node ids

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Node
// =============================================================================

/// A graph node produced by a transformer.
///
/// Properties are plain strings copied from table cells; the map is ordered
/// so serialized output is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    /// Node identifier yielded by a transformer.
    pub id: String,
    /// Node type label (the `target` of the mapping rule).
    pub label: String,
    /// Property columns copied from the source row.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Node {
    /// Create a node without properties.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property, returning self for chaining.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Key used for deduplication during extraction.
    pub fn dedup_key(&self) -> (String, String) {
        (self.id.clone(), self.label.clone())
    }
}

// =============================================================================
// Edge
// =============================================================================

/// A directed edge connecting a subject node to a target node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    /// Id of the source node.
    pub source: String,
    /// Id of the target node.
    pub target: String,
    /// Edge type label (the `edge` of the mapping rule).
    pub label: String,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }
}
