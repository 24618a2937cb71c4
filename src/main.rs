//! Graphweave CLI - Map tabular records into knowledge-graph nodes and edges
//!
//! # Main Commands
//!
//! ```bash
//! graphweave extract input.csv -m mapping.json   # CSV -> nodes/edges JSON
//! graphweave normalize-ontology ./onto onto.owl  # Rewrite OWL class labels
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! graphweave parse input.csv            # Just parse CSV to JSON
//! graphweave validate-mapping map.json  # Schema-check a mapping document
//! graphweave example-mapping            # Show an example mapping document
//! graphweave transformers               # Show available transformers
//! ```

use clap::{Parser, Subcommand};
use graphweave::{
    example_mapping, extract_file, normalize_ontology, parse_csv_file, parse_csv_file_auto,
    resolve_delimiter, transformers_description, validate_document, Mapping,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphweave")]
#[command(about = "Map tabular records into knowledge-graph nodes and edges", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file and output JSON rows
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter, single char or TAB (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract nodes and edges from a CSV file using a mapping document
    Extract {
        /// Input CSV file
        input: PathBuf,

        /// Mapping document (JSON)
        #[arg(short, long)]
        mapping: PathBuf,

        /// CSV delimiter, single char or TAB (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Output file for nodes (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for edges
        #[arg(short, long)]
        edges: Option<PathBuf>,
    },

    /// Validate a mapping document against the mapping schema
    ValidateMapping {
        /// Mapping document (JSON)
        input: PathBuf,
    },

    /// Show an example mapping document
    ExampleMapping,

    /// Show available transformers
    Transformers,

    /// Normalize an OWL ontology for the graph database naming convention
    NormalizeOntology {
        /// Directory holding the ontology (outputs are written next to it)
        directory: PathBuf,

        /// Ontology file name within the directory
        file: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter.as_deref(), output.as_deref()),

        Commands::Extract {
            input,
            mapping,
            delimiter,
            output,
            edges,
        } => cmd_extract(
            &input,
            &mapping,
            delimiter.as_deref(),
            output.as_deref(),
            edges.as_deref(),
        ),

        Commands::ValidateMapping { input } => cmd_validate_mapping(&input),

        Commands::ExampleMapping => cmd_example_mapping(),

        Commands::Transformers => cmd_transformers(),

        Commands::NormalizeOntology { directory, file } => cmd_normalize_ontology(&directory, &file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_delimiter_arg(spec: Option<&str>) -> Result<Option<char>, Box<dyn std::error::Error>> {
    match spec {
        None => Ok(None),
        Some(s) => resolve_delimiter(s)
            .map(Some)
            .ok_or_else(|| format!("Invalid delimiter: '{}'", s).into()),
    }
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing CSV: {}", input.display());

    let result = match parse_delimiter_arg(delimiter)? {
        Some(d) => parse_csv_file(input, d)?,
        None => parse_csv_file_auto(input)?,
    };

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_extract(
    input: &Path,
    mapping_path: &Path,
    delimiter: Option<&str>,
    output: Option<&Path>,
    edges_output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Processing: {}", input.display());
    eprintln!("   Mapping: {}", mapping_path.display());

    let mapping = Mapping::load(mapping_path)?;
    let delimiter = parse_delimiter_arg(delimiter)?;

    let result = extract_file(input, &mapping, delimiter)?;

    eprintln!("{}", result.summary());

    if !result.errors.is_empty() {
        for err in result.errors.iter().take(5) {
            eprintln!("   row {} [{}]: {}", err.row, err.target, err.message);
        }
        if result.errors.len() > 5 {
            eprintln!("   ... +{} more", result.errors.len() - 5);
        }
    }

    let nodes_json = serde_json::to_string_pretty(&result.nodes)?;
    write_output(&nodes_json, output)?;

    if let Some(edges_path) = edges_output {
        let edges_json = serde_json::to_string_pretty(&result.edges)?;
        fs::write(edges_path, edges_json)?;
        eprintln!("Edges written to: {}", edges_path.display());
    }

    Ok(())
}

fn cmd_validate_mapping(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    match validate_document(&value) {
        Ok(()) => {
            eprintln!("Mapping document is valid");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_example_mapping() -> Result<(), Box<dyn std::error::Error>> {
    let mapping = example_mapping();
    println!("{}", mapping.to_json()?);
    Ok(())
}

fn cmd_transformers() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", transformers_description());
    Ok(())
}

fn cmd_normalize_ontology(directory: &Path, file: &str) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Loading ontology: {}", directory.join(file).display());

    let report = normalize_ontology(directory, file)?;

    eprintln!("   Classes renamed: {}", report.classes);
    eprintln!("   Classes reparented: {}", report.reparented);
    eprintln!("Ontology written to: {}", report.ontology_path.display());
    eprintln!("Mapping written to: {}", report.mapping_path.display());

    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
