//! Mapping document definition.
//!
//! A mapping describes how a table becomes a subgraph: a `subject` rule
//! creates one node per row, and each `columns` rule creates target nodes
//! linked to the subject by an edge. Documents are JSON and are checked
//! against an embedded JSON Schema (Draft 7) before deserialization so
//! malformed documents fail with readable errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{MappingError, MappingResult};
use crate::transform::transformers::TransformerSpec;

/// A complete mapping document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    /// Version of the mapping format.
    #[serde(default = "default_version")]
    pub version: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Rule producing the per-row subject node.
    pub subject: SubjectRule,

    /// Rules producing target nodes and subject→target edges.
    #[serde(default)]
    pub columns: Vec<ColumnRule>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Rule for the per-row subject node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRule {
    /// Transformer yielding the subject id(s).
    pub transformer: TransformerSpec,

    /// Columns the transformer reads.
    #[serde(default)]
    pub columns: Vec<String>,

    /// Node type label of the subject.
    pub target: String,

    /// Columns copied onto the subject node as properties.
    #[serde(default)]
    pub properties: Vec<String>,
}

/// Rule for a target node linked to the subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRule {
    /// Transformer yielding the target id(s).
    pub transformer: TransformerSpec,

    /// Columns the transformer reads.
    #[serde(default)]
    pub columns: Vec<String>,

    /// Node type label of the targets.
    pub target: String,

    /// Edge type label connecting subject to target. Without it only
    /// nodes are created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<String>,

    /// Columns copied onto the target nodes as properties.
    #[serde(default)]
    pub properties: Vec<String>,
}

impl Mapping {
    /// Parse a mapping from a JSON string.
    pub fn from_json(json: &str) -> MappingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a mapping from a JSON value.
    pub fn from_value(value: &Value) -> MappingResult<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> MappingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a mapping file, schema-checking it first.
    pub fn load(path: &Path) -> MappingResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        validate_document(&value)?;
        Self::from_value(&value)
    }

    /// All table columns referenced by the mapping (deduplicated, sorted).
    pub fn source_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .subject
            .columns
            .iter()
            .chain(self.subject.properties.iter())
            .cloned()
            .collect();

        for rule in &self.columns {
            columns.extend(rule.columns.iter().cloned());
            columns.extend(rule.properties.iter().cloned());
        }

        columns.sort();
        columns.dedup();
        columns
    }

    /// Validate that all referenced source columns exist in the table headers.
    pub fn validate_headers(&self, headers: &[String]) -> MappingResult<()> {
        let missing: Vec<String> = self
            .source_columns()
            .into_iter()
            .filter(|col| !headers.iter().any(|h| h == col))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MappingError::MissingColumns(missing))
        }
    }
}

// =============================================================================
// Schema validation
// =============================================================================

/// Validate a JSON value against the embedded mapping schema.
pub fn validate_document(value: &Value) -> MappingResult<()> {
    let schema: Value = serde_json::from_str(include_str!("../../schemas/mapping.json"))
        .expect("invalid embedded mapping schema");

    let validator = jsonschema::draft7::new(&schema)
        .map_err(|e| MappingError::SchemaError {
            errors: vec![e.to_string()],
        })?;

    let errors: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(MappingError::SchemaError { errors })
    }
}

/// Quick check against the mapping schema.
pub fn is_valid_document(value: &Value) -> bool {
    validate_document(value).is_ok()
}

/// Generate an example mapping for documentation.
pub fn example_mapping() -> Mapping {
    let mut translations = HashMap::new();
    translations.insert("P53".to_string(), "TP53".to_string());
    translations.insert("HER2".to_string(), "ERBB2".to_string());

    Mapping {
        version: default_version(),
        description: "Example mapping: one patient node per row, linked to samples and variants".to_string(),
        subject: SubjectRule {
            transformer: TransformerSpec::RowIndex,
            columns: vec![],
            target: "patient".to_string(),
            properties: vec!["age".to_string()],
        },
        columns: vec![
            ColumnRule {
                transformer: TransformerSpec::Map,
                columns: vec!["sample_id".to_string()],
                target: "sample".to_string(),
                edge: Some("patient_has_sample".to_string()),
                properties: vec![],
            },
            ColumnRule {
                transformer: TransformerSpec::Split {
                    separator: ";".to_string(),
                },
                columns: vec!["variants".to_string()],
                target: "variant".to_string(),
                edge: Some("patient_has_variant".to_string()),
                properties: vec![],
            },
            ColumnRule {
                transformer: TransformerSpec::Translate {
                    translations: Some(translations),
                    translations_file: None,
                    translate_from: None,
                    translate_to: None,
                    delimiter: None,
                },
                columns: vec!["gene".to_string()],
                target: "gene".to_string(),
                edge: Some("patient_has_gene".to_string()),
                properties: vec![],
            },
        ],
    }
}
