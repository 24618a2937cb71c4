//! Mapping extractor.
//!
//! Runs a compiled mapping over parsed table rows to produce graph nodes
//! and edges. The walk is strictly sequential: one subject per row, then
//! each column rule in order.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult, TransformResult};
use crate::mapping::{ColumnRule, Mapping, SubjectRule};
use crate::models::{Edge, Node};
use crate::parser::{parse_csv_file, parse_csv_file_auto};
use crate::transform::transformers::{cell_str, valid, Transformer};

/// Result of extracting a table.
#[derive(Debug, Default)]
pub struct ExtractResult {
    /// Produced nodes, deduplicated by (id, label).
    pub nodes: Vec<Node>,
    /// Produced edges.
    pub edges: Vec<Edge>,
    /// Errors encountered on individual rules (extraction continues).
    pub errors: Vec<ExtractError>,
    /// Rows that produced no subject node.
    pub skipped: Vec<usize>,
}

/// An error raised by one rule on one row.
#[derive(Debug, Clone)]
pub struct ExtractError {
    pub row: usize,
    pub target: String,
    pub message: String,
}

impl ExtractResult {
    /// Check if extraction completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get summary statistics.
    pub fn summary(&self) -> String {
        format!(
            "Extracted: {} nodes, {} edges, {} errors, {} rows skipped",
            self.nodes.len(),
            self.edges.len(),
            self.errors.len(),
            self.skipped.len()
        )
    }
}

// =============================================================================
// Compiled mapping
// =============================================================================

/// A mapping with all transformers compiled and translate tables resolved.
pub struct CompiledMapping {
    subject: CompiledRule,
    columns: Vec<CompiledRule>,
}

struct CompiledRule {
    transformer: Transformer,
    columns: Vec<String>,
    target: String,
    edge: Option<String>,
    properties: Vec<String>,
}

impl CompiledRule {
    fn from_subject(rule: &SubjectRule) -> TransformResult<Self> {
        Ok(Self {
            transformer: rule.transformer.compile()?,
            columns: rule.columns.clone(),
            target: rule.target.clone(),
            edge: None,
            properties: rule.properties.clone(),
        })
    }

    fn from_column(rule: &ColumnRule) -> TransformResult<Self> {
        Ok(Self {
            transformer: rule.transformer.compile()?,
            columns: rule.columns.clone(),
            target: rule.target.clone(),
            edge: rule.edge.clone(),
            properties: rule.properties.clone(),
        })
    }

    fn make_node(&self, id: &str, row: &Map<String, Value>) -> Node {
        let mut node = Node::new(id, &self.target);
        for column in &self.properties {
            if let Some(cell) = row.get(column) {
                if valid(cell) {
                    node.properties.insert(column.clone(), cell_str(cell));
                }
            }
        }
        node
    }
}

impl CompiledMapping {
    /// Compile a mapping document. Fails on misconfigured transformers
    /// (e.g. unreadable translation files).
    pub fn compile(mapping: &Mapping) -> TransformResult<Self> {
        Ok(Self {
            subject: CompiledRule::from_subject(&mapping.subject)?,
            columns: mapping
                .columns
                .iter()
                .map(CompiledRule::from_column)
                .collect::<TransformResult<Vec<_>>>()?,
        })
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract nodes and edges from parsed rows using a mapping document.
pub fn extract(records: &[Value], mapping: &Mapping) -> TransformResult<ExtractResult> {
    let compiled = CompiledMapping::compile(mapping)?;
    Ok(extract_compiled(records, &compiled))
}

/// Extract nodes and edges using an already-compiled mapping.
pub fn extract_compiled(records: &[Value], mapping: &CompiledMapping) -> ExtractResult {
    let mut result = ExtractResult::default();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for (row_idx, record) in records.iter().enumerate() {
        let row = match record.as_object() {
            Some(obj) => obj,
            None => {
                result.errors.push(ExtractError {
                    row: row_idx,
                    target: mapping.subject.target.clone(),
                    message: "Row is not a JSON object".to_string(),
                });
                result.skipped.push(row_idx);
                continue;
            }
        };

        // Subject node(s) for this row
        let subject_ids = match mapping
            .subject
            .transformer
            .apply(row, row_idx, &mapping.subject.columns)
        {
            Ok(ids) => ids,
            Err(e) => {
                result.errors.push(ExtractError {
                    row: row_idx,
                    target: mapping.subject.target.clone(),
                    message: e.to_string(),
                });
                result.skipped.push(row_idx);
                continue;
            }
        };

        if subject_ids.is_empty() {
            result.skipped.push(row_idx);
            continue;
        }

        for id in &subject_ids {
            push_node(&mut result, &mut seen, mapping.subject.make_node(id, row));
        }

        // Target nodes and edges
        for rule in &mapping.columns {
            let target_ids = match rule.transformer.apply(row, row_idx, &rule.columns) {
                Ok(ids) => ids,
                Err(e) => {
                    result.errors.push(ExtractError {
                        row: row_idx,
                        target: rule.target.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            for target_id in &target_ids {
                push_node(&mut result, &mut seen, rule.make_node(target_id, row));

                if let Some(ref edge_label) = rule.edge {
                    for subject_id in &subject_ids {
                        result
                            .edges
                            .push(Edge::new(subject_id, target_id, edge_label));
                    }
                }
            }
        }
    }

    result
}

fn push_node(result: &mut ExtractResult, seen: &mut HashSet<(String, String)>, node: Node) {
    if seen.insert(node.dedup_key()) {
        result.nodes.push(node);
    }
}

// =============================================================================
// File pipeline
// =============================================================================

/// Extract a CSV file end to end: parse, check headers, run the mapping.
///
/// This is the main entry point used by the CLI. It:
/// 1. Parses the CSV (auto-detecting encoding/delimiter unless given)
/// 2. Validates the mapping's source columns against the headers
/// 3. Compiles and runs the mapping
pub fn extract_file(
    path: &Path,
    mapping: &Mapping,
    delimiter: Option<char>,
) -> PipelineResult<ExtractResult> {
    let parsed = match delimiter {
        Some(d) => parse_csv_file(path, d)?,
        None => parse_csv_file_auto(path)?,
    };

    if parsed.records.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    mapping.validate_headers(&parsed.headers)?;

    Ok(extract(&parsed.records, mapping)?)
}
