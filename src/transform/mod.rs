//! Transformation module.
//!
//! This module handles table to graph extraction:
//! - Transformers: row-to-identifier strategies
//! - Extractor: mapping walk producing nodes and edges

pub mod extractor;
pub mod transformers;

pub use extractor::{extract, extract_compiled, extract_file, CompiledMapping, ExtractError, ExtractResult};
pub use transformers::{cell_str, transformers_description, valid, Transformer, TransformerSpec};
