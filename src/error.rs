//! Error types for the graphweave extraction pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV parsing errors
//! - [`MappingError`] - Mapping document errors
//! - [`TransformError`] - Row transformer errors
//! - [`OntologyError`] - Ontology normalization errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    ParseError(String),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        CsvError::ParseError(e.to_string())
    }
}

// =============================================================================
// Mapping Document Errors
// =============================================================================

/// Errors in a mapping document.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Document does not satisfy the mapping schema.
    #[error("Invalid mapping document: {errors:?}")]
    SchemaError { errors: Vec<String> },

    /// Source columns referenced by the mapping are absent from the table.
    #[error("Missing source columns: {0:?}")]
    MissingColumns(Vec<String>),

    /// JSON serialization/deserialization error.
    #[error("Mapping JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error while reading the document.
    #[error("Mapping IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Transformer Errors
// =============================================================================

/// Errors while configuring or running a row transformer.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Transformer declared without any column.
    #[error("No column declared for the `{0}` transformer, did you forget to add a `columns` keyword?")]
    NoColumns(String),

    /// A declared column is absent from the row.
    #[error("Column '{0}' not found in data")]
    MissingColumn(String),

    /// Invalid cell content where the transformer requires a valid value.
    #[error("Invalid content in column `{column}`: `{value}`")]
    InvalidContent { column: String, value: String },

    /// Format transformer without a template.
    #[error("Format template not defined for `format` transformer. Define a `template` or use the `concat` transformer.")]
    MissingTemplate,

    /// Format template references an unknown column.
    #[error("Format template references unknown column `{0}`")]
    UnknownPlaceholder(String),

    /// Translate transformer configured with both inline and file translations.
    #[error("Cannot have both `translations` and `translations_file` defined in a translate transformer")]
    ConflictingTranslations,

    /// Translate transformer configured with neither source of translations.
    #[error("A translate transformer must define either `translations` or `translations_file`")]
    NoTranslations,

    /// A translate file column declaration is missing.
    #[error("No `{keyword}` column declared for the translate transformer using translations_file=`{file}`")]
    MissingTranslateColumn { keyword: String, file: String },

    /// A declared translate column is absent from the translations file.
    #[error("Column `{column}` not found in translations file `{file}`, available headers: `{available}`")]
    TranslateColumnNotFound {
        column: String,
        file: String,
        available: String,
    },

    /// The resolved translation table is empty.
    #[error("No translation found, did you forget the `translations` keyword?")]
    EmptyTranslations,

    /// Failed to read a translations file.
    #[error("Cannot read translations file: {0}")]
    TranslationsFile(#[from] CsvError),
}

// =============================================================================
// Ontology Errors
// =============================================================================

/// Errors during ontology normalization.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// Failed to read or write an ontology file.
    #[error("Ontology IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed RDF/XML.
    #[error("Invalid ontology XML: {0}")]
    XmlError(String),

    /// The document contains no OWL classes.
    #[error("No OWL classes found in ontology")]
    NoClasses,

    /// JSON error while writing the class mapping.
    #[error("Class mapping JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for OntologyError {
    fn from(e: quick_xml::Error) -> Self {
        OntologyError::XmlError(e.to_string())
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::extract_file`].
/// It wraps all lower-level errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Mapping document error.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Transformer error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Ontology normalization error.
    #[error("Ontology error: {0}")]
    Ontology(#[from] OntologyError),

    /// No rows to extract from.
    #[error("No rows to extract")]
    EmptyInput,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for transformer operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for ontology operations.
pub type OntologyResult<T> = Result<T, OntologyError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
