//! # Graphweave - table to knowledge-graph extraction
//!
//! Graphweave maps tabular records (CSV) into graph nodes and edges using a
//! declarative mapping document, and ships a one-shot ontology normalization
//! pass that rewrites OWL class labels for a downstream graph database.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Extractor   │────▶│ Nodes/Edges │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (mapping doc)│     │   (JSON)    │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graphweave::{extract_file, example_mapping};
//! use std::path::Path;
//!
//! fn main() {
//!     let mapping = example_mapping();
//!     let result = extract_file(Path::new("input.csv"), &mapping, None).unwrap();
//!     println!("{}", result.summary());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Graph records (Node, Edge)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`mapping`] - Mapping document and schema validation
//! - [`transform`] - Row transformers and the extractor
//! - [`ontology`] - OWL label normalization

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Mapping documents
pub mod mapping;

// Extraction
pub mod transform;

// Ontology normalization
pub mod ontology;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError,
    MappingError,
    OntologyError,
    PipelineError,
    TransformError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Edge, Node};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    csv_to_json,
    detect_delimiter,
    detect_encoding,
    decode_content,
    parse_bytes_auto,
    parse_csv_file,
    parse_csv_file_auto,
    resolve_delimiter,
    ParseResult,
};

// =============================================================================
// Re-exports - Mapping
// =============================================================================

pub use mapping::{
    example_mapping,
    is_valid_document,
    validate_document,
    ColumnRule,
    Mapping,
    SubjectRule,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    extract,
    extract_file,
    transformers_description,
    ExtractError,
    ExtractResult,
    Transformer,
    TransformerSpec,
};

// =============================================================================
// Re-exports - Ontology
// =============================================================================

pub use ontology::{
    normalize_label,
    normalize_ontology,
    normalize_xml,
    ClassMapping,
    NormalizeReport,
    NormalizedOntology,
};
