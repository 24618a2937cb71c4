//! Row transformers
//!
//! Strategies that turn a table row into zero or more node identifiers.
//! A transformer is declared in the mapping document as a tagged JSON object
//! and compiled into an executable form before extraction (translate tables
//! are resolved from disk at compile time).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{TransformError, TransformResult};
use crate::parser::{parse_csv_file, parse_csv_file_auto, resolve_delimiter};

/// Placeholder pattern for `format` templates: `{column name}`.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("invalid placeholder regex"));

/// Tokens treated as missing values in table cells.
const MISSING_TOKENS: &[&str] = &["nan", "na", "n/a", "none", "null"];

/// Check whether a cell holds usable content.
///
/// Null cells, empty or whitespace-only strings and missing-value tokens
/// (`nan`, `none`, ...) are invalid; numbers and booleans are always valid.
pub fn valid(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty()
                && !MISSING_TOKENS
                    .iter()
                    .any(|t| trimmed.eq_ignore_ascii_case(t))
        }
        Value::Number(_) | Value::Bool(_) => true,
        _ => false,
    }
}

/// Render a cell as a string identifier.
pub fn cell_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// Declared form (mapping document)
// =============================================================================

/// A transformer as declared in a mapping document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformerSpec {
    /// Yield each configured column's cell value verbatim.
    Map,

    /// Split cell values at a separator and yield each piece.
    Split {
        #[serde(default = "default_separator")]
        separator: String,
    },

    /// Concatenate the cell values of the configured columns.
    Concat,

    /// Render a template with `{column}` placeholders from the row.
    Format {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template: Option<String>,
    },

    /// Yield the row index.
    RowIndex,

    /// Rewrite cells through a lookup table, then behave like `map`.
    Translate {
        /// Inline translation table (mutually exclusive with `translations_file`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translations: Option<HashMap<String, String>>,

        /// Delimited file holding the translation table.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translations_file: Option<PathBuf>,

        /// Column of the file holding the source values.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translate_from: Option<String>,

        /// Column of the file holding the translated values.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translate_to: Option<String>,

        /// Delimiter of the file (single char or `TAB`, auto-detected if absent).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delimiter: Option<String>,
    },
}

fn default_separator() -> String {
    ",".to_string()
}

impl TransformerSpec {
    /// Name used in error messages and listings.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TransformerSpec::Map => "map",
            TransformerSpec::Split { .. } => "split",
            TransformerSpec::Concat => "concat",
            TransformerSpec::Format { .. } => "format",
            TransformerSpec::RowIndex => "row_index",
            TransformerSpec::Translate { .. } => "translate",
        }
    }

    /// Compile into an executable transformer, resolving translation files.
    pub fn compile(&self) -> TransformResult<Transformer> {
        match self {
            TransformerSpec::Map => Ok(Transformer::Map),

            TransformerSpec::Split { separator } => Ok(Transformer::Split {
                separator: separator.clone(),
            }),

            TransformerSpec::Concat => Ok(Transformer::Concat),

            TransformerSpec::Format { template } => {
                let template = template.clone().ok_or(TransformError::MissingTemplate)?;
                let placeholders: Vec<String> = PLACEHOLDER_RE
                    .captures_iter(&template)
                    .map(|c| c[1].to_string())
                    .collect();
                Ok(Transformer::Format {
                    template,
                    placeholders,
                })
            }

            TransformerSpec::RowIndex => Ok(Transformer::RowIndex),

            TransformerSpec::Translate {
                translations,
                translations_file,
                translate_from,
                translate_to,
                delimiter,
            } => {
                let table = match (translations, translations_file) {
                    (Some(_), Some(_)) => return Err(TransformError::ConflictingTranslations),
                    (None, None) => return Err(TransformError::NoTranslations),
                    (Some(inline), None) => {
                        debug!(entries = inline.len(), "using inline translations");
                        inline.clone()
                    }
                    (None, Some(file)) => load_translations(
                        file,
                        translate_from.as_deref(),
                        translate_to.as_deref(),
                        delimiter.as_deref(),
                    )?,
                };

                if table.is_empty() {
                    return Err(TransformError::EmptyTranslations);
                }

                Ok(Transformer::Translate { table })
            }
        }
    }
}

/// Load a translation table from a delimited file.
fn load_translations(
    file: &PathBuf,
    translate_from: Option<&str>,
    translate_to: Option<&str>,
    delimiter: Option<&str>,
) -> TransformResult<HashMap<String, String>> {
    let file_display = file.display().to_string();

    let from = translate_from.ok_or_else(|| TransformError::MissingTranslateColumn {
        keyword: "translate_from".to_string(),
        file: file_display.clone(),
    })?;
    let to = translate_to.ok_or_else(|| TransformError::MissingTranslateColumn {
        keyword: "translate_to".to_string(),
        file: file_display.clone(),
    })?;

    debug!(file = %file_display, from, to, "loading translations file");

    let parsed = match delimiter.and_then(resolve_delimiter) {
        Some(d) => parse_csv_file(file, d)?,
        None => parse_csv_file_auto(file)?,
    };

    for column in [from, to] {
        if !parsed.headers.iter().any(|h| h == column) {
            return Err(TransformError::TranslateColumnNotFound {
                column: column.to_string(),
                file: file_display,
                available: parsed.headers.join(","),
            });
        }
    }

    let mut table = HashMap::new();
    for (i, row) in parsed.records.iter().enumerate() {
        let source = &row[from];
        let target = &row[to];
        if valid(source) && valid(target) {
            table.insert(cell_str(source), cell_str(target));
        } else {
            warn!(
                row = i,
                file = %file_display,
                "invalid translation values, ignoring this translation"
            );
        }
    }

    Ok(table)
}

// =============================================================================
// Compiled form
// =============================================================================

/// An executable row transformer.
#[derive(Debug, Clone)]
pub enum Transformer {
    Map,
    Split {
        separator: String,
    },
    Concat,
    Format {
        template: String,
        placeholders: Vec<String>,
    },
    RowIndex,
    Translate {
        table: HashMap<String, String>,
    },
}

impl Transformer {
    /// Run the transformer on a row, yielding node identifiers.
    ///
    /// `columns` are the table columns the transformer reads and `index` is
    /// the position of the row in the table. Invalid cells are skipped with a
    /// warning except where noted on the individual strategies.
    pub fn apply(
        &self,
        row: &Map<String, Value>,
        index: usize,
        columns: &[String],
    ) -> TransformResult<Vec<String>> {
        match self {
            Transformer::Map => self.apply_map(row, index, columns),
            Transformer::Split { separator } => self.apply_split(row, index, columns, separator),
            Transformer::Concat => self.apply_concat(row, index, columns),
            Transformer::Format {
                template,
                placeholders,
            } => self.apply_format(row, columns, template, placeholders),
            Transformer::RowIndex => Ok(vec![index.to_string()]),
            Transformer::Translate { table } => self.apply_translate(row, index, columns, table),
        }
    }

    fn get<'a>(&self, row: &'a Map<String, Value>, column: &str) -> TransformResult<&'a Value> {
        row.get(column)
            .ok_or_else(|| TransformError::MissingColumn(column.to_string()))
    }

    fn apply_map(
        &self,
        row: &Map<String, Value>,
        index: usize,
        columns: &[String],
    ) -> TransformResult<Vec<String>> {
        if columns.is_empty() {
            return Err(TransformError::NoColumns("map".to_string()));
        }

        let mut ids = Vec::new();
        for column in columns {
            let cell = self.get(row, column)?;
            if valid(cell) {
                ids.push(cell_str(cell));
            } else {
                warn!(row = index, column = %column, value = %cell, "invalid cell content, skipping");
            }
        }
        Ok(ids)
    }

    fn apply_split(
        &self,
        row: &Map<String, Value>,
        index: usize,
        columns: &[String],
        separator: &str,
    ) -> TransformResult<Vec<String>> {
        let mut ids = Vec::new();
        for column in columns {
            let cell = self.get(row, column)?;
            if valid(cell) {
                let text = cell_str(cell);
                ids.extend(text.split(separator).map(|item| item.trim().to_string()));
            } else {
                warn!(row = index, column = %column, value = %cell, "invalid cell content, skipping");
            }
        }
        Ok(ids)
    }

    fn apply_concat(
        &self,
        row: &Map<String, Value>,
        index: usize,
        columns: &[String],
    ) -> TransformResult<Vec<String>> {
        let mut joined = String::new();
        for column in columns {
            let cell = self.get(row, column)?;
            if valid(cell) {
                joined.push_str(&cell_str(cell));
            } else {
                warn!(row = index, column = %column, value = %cell, "invalid cell content, skipping");
            }
        }
        Ok(vec![joined])
    }

    fn apply_format(
        &self,
        row: &Map<String, Value>,
        columns: &[String],
        template: &str,
        placeholders: &[String],
    ) -> TransformResult<Vec<String>> {
        // Any invalid declared cell is a hard error here: a partially
        // rendered identifier would silently corrupt the graph.
        for column in columns {
            let cell = row.get(column).cloned().unwrap_or(Value::Null);
            if !valid(&cell) {
                return Err(TransformError::InvalidContent {
                    column: column.clone(),
                    value: cell_str(&cell),
                });
            }
        }

        let mut rendered = template.to_string();
        for name in placeholders {
            let cell = row
                .get(name)
                .ok_or_else(|| TransformError::UnknownPlaceholder(name.clone()))?;
            rendered = rendered.replace(&format!("{{{name}}}"), &cell_str(cell));
        }

        Ok(vec![rendered])
    }

    fn apply_translate(
        &self,
        row: &Map<String, Value>,
        index: usize,
        columns: &[String],
        table: &HashMap<String, String>,
    ) -> TransformResult<Vec<String>> {
        if columns.is_empty() {
            return Err(TransformError::NoColumns("translate".to_string()));
        }

        let mut translated = row.clone();
        for column in columns {
            let cell = self.get(row, column)?;
            let key = cell_str(cell);
            match table.get(&key) {
                Some(value) => {
                    translated.insert(column.clone(), Value::String(value.clone()));
                }
                None => {
                    warn!(row = index, column = %column, value = %key, "nothing to translate");
                }
            }
        }

        self.apply_map(&translated, index, columns)
    }
}

/// Describe the available transformer types (for the CLI listing).
pub fn transformers_description() -> String {
    r#"Available transformers:

| Type | Description | Parameters |
|-----------|-------------|------------|
| map | Yield each column's cell value as a node id | - |
| split | Split cell values and yield each piece | separator: split string (default ",") |
| concat | Concatenate the cells of all columns into one id | - |
| format | Render a template with {column} placeholders | template: format template |
| row_index | Yield the row index as a node id | - |
| translate | Rewrite cells through a lookup table, then map | translations: {from: to}, or translations_file + translate_from + translate_to (+ delimiter) |

Example transformers in JSON:
[
  {"type": "map"},
  {"type": "split", "separator": ";"},
  {"type": "format", "template": "{sample}_{patient}"},
  {"type": "translate", "translations": {"P53": "TP53"}}
]"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_valid_cells() {
        assert!(valid(&json!("TP53")));
        assert!(valid(&json!(42)));
        assert!(valid(&json!(true)));
        assert!(!valid(&json!("")));
        assert!(!valid(&json!("   ")));
        assert!(!valid(&json!("nan")));
        assert!(!valid(&json!("NaN")));
        assert!(!valid(&json!("None")));
        assert!(!valid(&json!("N/A")));
        assert!(!valid(&Value::Null));
    }

    #[test]
    fn test_map_yields_cells() {
        let t = TransformerSpec::Map.compile().unwrap();
        let r = row(json!({"gene": "TP53", "variant": "R175H"}));
        let ids = t
            .apply(&r, 0, &["gene".to_string(), "variant".to_string()])
            .unwrap();
        assert_eq!(ids, vec!["TP53", "R175H"]);
    }

    #[test]
    fn test_map_skips_invalid_cells() {
        let t = TransformerSpec::Map.compile().unwrap();
        let r = row(json!({"gene": "TP53", "variant": "nan"}));
        let ids = t
            .apply(&r, 0, &["gene".to_string(), "variant".to_string()])
            .unwrap();
        assert_eq!(ids, vec!["TP53"]);
    }

    #[test]
    fn test_map_requires_columns() {
        let t = TransformerSpec::Map.compile().unwrap();
        let r = row(json!({"gene": "TP53"}));
        let err = t.apply(&r, 0, &[]).unwrap_err();
        assert!(matches!(err, TransformError::NoColumns(_)));
    }

    #[test]
    fn test_map_missing_column_is_error() {
        let t = TransformerSpec::Map.compile().unwrap();
        let r = row(json!({"gene": "TP53"}));
        let err = t.apply(&r, 0, &["variant".to_string()]).unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn(_)));
    }

    #[test]
    fn test_split() {
        let t = TransformerSpec::Split {
            separator: ";".to_string(),
        }
        .compile()
        .unwrap();
        let r = row(json!({"variants": "R175H; R248Q;R273H"}));
        let ids = t.apply(&r, 0, &["variants".to_string()]).unwrap();
        assert_eq!(ids, vec!["R175H", "R248Q", "R273H"]);
    }

    #[test]
    fn test_split_invalid_cell_yields_nothing() {
        let t = TransformerSpec::Split {
            separator: ";".to_string(),
        }
        .compile()
        .unwrap();
        let r = row(json!({"variants": ""}));
        let ids = t.apply(&r, 0, &["variants".to_string()]).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_concat() {
        let t = TransformerSpec::Concat.compile().unwrap();
        let r = row(json!({"chrom": "17", "pos": "7674220"}));
        let ids = t
            .apply(&r, 0, &["chrom".to_string(), "pos".to_string()])
            .unwrap();
        assert_eq!(ids, vec!["177674220"]);
    }

    #[test]
    fn test_concat_skips_invalid() {
        let t = TransformerSpec::Concat.compile().unwrap();
        let r = row(json!({"chrom": "17", "pos": "nan"}));
        let ids = t
            .apply(&r, 0, &["chrom".to_string(), "pos".to_string()])
            .unwrap();
        assert_eq!(ids, vec!["17"]);
    }

    #[test]
    fn test_format() {
        let t = TransformerSpec::Format {
            template: Some("{gene}:{variant}".to_string()),
        }
        .compile()
        .unwrap();
        let r = row(json!({"gene": "TP53", "variant": "R175H"}));
        let ids = t
            .apply(&r, 0, &["gene".to_string(), "variant".to_string()])
            .unwrap();
        assert_eq!(ids, vec!["TP53:R175H"]);
    }

    #[test]
    fn test_format_invalid_cell_is_error() {
        let t = TransformerSpec::Format {
            template: Some("{gene}:{variant}".to_string()),
        }
        .compile()
        .unwrap();
        let r = row(json!({"gene": "TP53", "variant": ""}));
        let err = t
            .apply(&r, 0, &["gene".to_string(), "variant".to_string()])
            .unwrap_err();
        assert!(matches!(err, TransformError::InvalidContent { .. }));
    }

    #[test]
    fn test_format_without_template() {
        let err = TransformerSpec::Format { template: None }.compile().unwrap_err();
        assert!(matches!(err, TransformError::MissingTemplate));
    }

    #[test]
    fn test_format_unknown_placeholder() {
        let t = TransformerSpec::Format {
            template: Some("{missing}".to_string()),
        }
        .compile()
        .unwrap();
        let r = row(json!({"gene": "TP53"}));
        let err = t.apply(&r, 0, &["gene".to_string()]).unwrap_err();
        assert!(matches!(err, TransformError::UnknownPlaceholder(_)));
    }

    #[test]
    fn test_row_index() {
        let t = TransformerSpec::RowIndex.compile().unwrap();
        let r = row(json!({"any": "thing"}));
        assert_eq!(t.apply(&r, 7, &[]).unwrap(), vec!["7"]);
    }

    #[test]
    fn test_translate_inline() {
        let mut translations = HashMap::new();
        translations.insert("P53".to_string(), "TP53".to_string());

        let t = TransformerSpec::Translate {
            translations: Some(translations),
            translations_file: None,
            translate_from: None,
            translate_to: None,
            delimiter: None,
        }
        .compile()
        .unwrap();

        let r = row(json!({"gene": "P53"}));
        assert_eq!(t.apply(&r, 0, &["gene".to_string()]).unwrap(), vec!["TP53"]);
    }

    #[test]
    fn test_translate_passthrough_when_unmapped() {
        let mut translations = HashMap::new();
        translations.insert("P53".to_string(), "TP53".to_string());

        let t = TransformerSpec::Translate {
            translations: Some(translations),
            translations_file: None,
            translate_from: None,
            translate_to: None,
            delimiter: None,
        }
        .compile()
        .unwrap();

        let r = row(json!({"gene": "KRAS"}));
        assert_eq!(t.apply(&r, 0, &["gene".to_string()]).unwrap(), vec!["KRAS"]);
    }

    #[test]
    fn test_translate_requires_one_source() {
        let err = TransformerSpec::Translate {
            translations: None,
            translations_file: None,
            translate_from: None,
            translate_to: None,
            delimiter: None,
        }
        .compile()
        .unwrap_err();
        assert!(matches!(err, TransformError::NoTranslations));

        let err = TransformerSpec::Translate {
            translations: Some(HashMap::new()),
            translations_file: Some(PathBuf::from("x.csv")),
            translate_from: None,
            translate_to: None,
            delimiter: None,
        }
        .compile()
        .unwrap_err();
        assert!(matches!(err, TransformError::ConflictingTranslations));
    }

    #[test]
    fn test_translate_empty_table_is_error() {
        let err = TransformerSpec::Translate {
            translations: Some(HashMap::new()),
            translations_file: None,
            translate_from: None,
            translate_to: None,
            delimiter: None,
        }
        .compile()
        .unwrap_err();
        assert!(matches!(err, TransformError::EmptyTranslations));
    }

    #[test]
    fn test_translate_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alias;symbol").unwrap();
        writeln!(file, "P53;TP53").unwrap();
        writeln!(file, "HER2;ERBB2").unwrap();
        writeln!(file, ";IGNORED").unwrap();
        file.flush().unwrap();

        let t = TransformerSpec::Translate {
            translations: None,
            translations_file: Some(file.path().to_path_buf()),
            translate_from: Some("alias".to_string()),
            translate_to: Some("symbol".to_string()),
            delimiter: Some(";".to_string()),
        }
        .compile()
        .unwrap();

        let r = row(json!({"gene": "HER2"}));
        assert_eq!(t.apply(&r, 0, &["gene".to_string()]).unwrap(), vec!["ERBB2"]);
    }

    #[test]
    fn test_translate_file_missing_column_declaration() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alias;symbol").unwrap();
        writeln!(file, "P53;TP53").unwrap();
        file.flush().unwrap();

        let err = TransformerSpec::Translate {
            translations: None,
            translations_file: Some(file.path().to_path_buf()),
            translate_from: None,
            translate_to: Some("symbol".to_string()),
            delimiter: Some(";".to_string()),
        }
        .compile()
        .unwrap_err();
        assert!(matches!(err, TransformError::MissingTranslateColumn { .. }));
    }

    #[test]
    fn test_translate_file_unknown_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alias;symbol").unwrap();
        writeln!(file, "P53;TP53").unwrap();
        file.flush().unwrap();

        let err = TransformerSpec::Translate {
            translations: None,
            translations_file: Some(file.path().to_path_buf()),
            translate_from: Some("nope".to_string()),
            translate_to: Some("symbol".to_string()),
            delimiter: Some(";".to_string()),
        }
        .compile()
        .unwrap_err();
        assert!(matches!(err, TransformError::TranslateColumnNotFound { .. }));
    }

    #[test]
    fn test_spec_serde_roundtrip() {
        let json = r#"{"type": "split", "separator": ";"}"#;
        let spec: TransformerSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            spec,
            TransformerSpec::Split {
                separator: ";".to_string()
            }
        );
        assert_eq!(spec.kind_name(), "split");
    }
}
