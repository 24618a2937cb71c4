//! Ontology label normalization.
//!
//! One-shot pass over an OWL (RDF/XML) ontology that rewrites class labels
//! so they satisfy the downstream graph database naming convention:
//! spaces, `%` and `-` removed, `_x` camelized to `X`, first character
//! lowercased. Classes sitting directly under `owl:Thing` are reparented
//! under a fresh `BcRootClass` root. Alongside the rewritten ontology a
//! `bc_classes_mapping.json` file records, for every class IRI, the original
//! labels and the new label.
//!
//! The rewrite runs as two streaming passes: a first pass collects classes,
//! labels and parents; a second pass copies the document event by event,
//! replacing labels and subclass axioms as it goes, so every other axiom in
//! the file is preserved byte for byte.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{OntologyError, OntologyResult};

/// Characters stripped from labels.
const CHARS_TO_REMOVE: &[char] = &[' ', '%', '-'];

/// Label given to (and IRI fragment of) the injected root class.
const ROOT_CLASS_NAME: &str = "BcRootClass";

const OWL_THING_IRI: &str = "http://www.w3.org/2002/07/owl#Thing";

// =============================================================================
// Label helpers
// =============================================================================

/// Remove every occurrence of the given characters.
pub fn remove_characters(s: &str, chars: &[char]) -> String {
    s.chars().filter(|c| !chars.contains(c)).collect()
}

/// Camelize underscores: each `_x` becomes `X`, a trailing `_` is dropped.
pub fn camelize_underscores(s: &str) -> String {
    let mut out = s.to_string();
    while let Some(p) = out.find('_') {
        let rest = out[p + 1..].to_string();
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) => {
                out = format!("{}{}{}", &out[..p], c.to_uppercase(), chars.as_str());
            }
            None => out.truncate(p),
        }
    }
    out
}

/// Lowercase the first character, leaving the rest untouched.
pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Derive a label from an IRI: the fragment after `#`, else the last path
/// segment, else the IRI itself.
pub fn label_from_iri(iri: &str) -> &str {
    if let Some(p) = iri.rfind('#') {
        if p > 0 {
            return &iri[p + 1..];
        }
    }
    if let Some(p) = iri.rfind('/') {
        if p > 0 {
            return &iri[p + 1..];
        }
    }
    iri
}

/// Full label cleanup: strip characters, camelize, lowercase the head.
pub fn normalize_label(s: &str) -> String {
    let cleaned = remove_characters(s, CHARS_TO_REMOVE);
    lowercase_first(&camelize_underscores(&cleaned))
}

fn is_thing(resource: &str) -> bool {
    resource == OWL_THING_IRI || resource.ends_with("#Thing")
}

// =============================================================================
// Class mapping output
// =============================================================================

/// One entry of `bc_classes_mapping.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassMapping {
    /// Labels carried by the class in the original ontology.
    pub labels: Vec<String>,
    /// Label written into the normalized ontology.
    pub bc_label: String,
}

/// In-memory result of normalizing an ontology document.
#[derive(Debug)]
pub struct NormalizedOntology {
    /// Rewritten RDF/XML document.
    pub xml: String,
    /// Old-labels to new-label mapping, keyed by class IRI (sorted).
    pub mapping: BTreeMap<String, ClassMapping>,
    /// Number of classes reparented under the root class.
    pub reparented: usize,
}

/// Files written by [`normalize_ontology`].
#[derive(Debug)]
pub struct NormalizeReport {
    /// Number of classes renamed.
    pub classes: usize,
    /// Number of classes reparented under the root class.
    pub reparented: usize,
    /// Path of the rewritten ontology.
    pub ontology_path: PathBuf,
    /// Path of the class mapping JSON file.
    pub mapping_path: PathBuf,
}

// =============================================================================
// Pass 1: collect classes
// =============================================================================

#[derive(Debug)]
struct OwlClass {
    iri: String,
    labels: Vec<String>,
    /// Has at least one parent that is not owl:Thing.
    has_named_parent: bool,
}

#[derive(Debug, Default)]
struct Collected {
    classes: Vec<OwlClass>,
    ontology_iri: Option<String>,
}

fn class_iri(e: &BytesStart) -> OntologyResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| OntologyError::XmlError(e.to_string()))?;
        match attr.key.as_ref() {
            b"rdf:about" => {
                let value = attr
                    .unescape_value()
                    .map_err(|e| OntologyError::XmlError(e.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
            b"rdf:ID" => {
                let value = attr
                    .unescape_value()
                    .map_err(|e| OntologyError::XmlError(e.to_string()))?;
                return Ok(Some(format!("#{value}")));
            }
            _ => {}
        }
    }
    Ok(None)
}

fn resource_attr(e: &BytesStart) -> OntologyResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| OntologyError::XmlError(e.to_string()))?;
        if attr.key.as_ref() == b"rdf:resource" {
            let value = attr
                .unescape_value()
                .map_err(|e| OntologyError::XmlError(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn collect_classes(xml: &str) -> OntologyResult<Collected> {
    let mut reader = Reader::from_str(xml);
    let mut collected = Collected::default();

    // (class, depth at which the declaration was opened)
    let mut current: Option<(OwlClass, usize)> = None;
    let mut depth: usize = 0;
    let mut in_label = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match e.name().as_ref() {
                    b"owl:Class" if current.is_none() => {
                        if let Some(iri) = class_iri(&e)? {
                            current = Some((
                                OwlClass {
                                    iri,
                                    labels: Vec::new(),
                                    has_named_parent: false,
                                },
                                depth,
                            ));
                        }
                    }
                    b"owl:Ontology" => {
                        if let Some(iri) = class_iri(&e)? {
                            collected.ontology_iri = Some(iri);
                        }
                    }
                    b"rdfs:label" => {
                        if matches!(current, Some((_, d)) if d + 1 == depth) {
                            in_label = true;
                        }
                    }
                    b"rdfs:subClassOf" => {
                        if let Some((ref mut class, d)) = current {
                            if d + 1 == depth {
                                match resource_attr(&e)? {
                                    Some(resource) if is_thing(&resource) => {}
                                    // A nested class expression also counts
                                    // as a named parent.
                                    _ => class.has_named_parent = true,
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }

            Event::Empty(e) => match e.name().as_ref() {
                b"rdfs:subClassOf" => {
                    if let Some((ref mut class, d)) = current {
                        if d == depth {
                            match resource_attr(&e)? {
                                Some(resource) if is_thing(&resource) => {}
                                Some(_) => class.has_named_parent = true,
                                None => {}
                            }
                        }
                    }
                }
                b"owl:Class" if current.is_none() => {
                    if let Some(iri) = class_iri(&e)? {
                        collected.classes.push(OwlClass {
                            iri,
                            labels: Vec::new(),
                            has_named_parent: false,
                        });
                    }
                }
                b"owl:Ontology" => {
                    if let Some(iri) = class_iri(&e)? {
                        collected.ontology_iri = Some(iri);
                    }
                }
                _ => {}
            },

            Event::Text(t) => {
                if in_label {
                    if let Some((ref mut class, _)) = current {
                        let text = t
                            .unescape()
                            .map_err(|e| OntologyError::XmlError(e.to_string()))?;
                        let text = text.trim();
                        if !text.is_empty() {
                            class.labels.push(text.to_string());
                        }
                    }
                }
            }

            Event::End(e) => {
                if e.name().as_ref() == b"rdfs:label" {
                    in_label = false;
                }
                if let Some((_, d)) = current {
                    if d == depth {
                        let (class, _) = current.take().expect("class context");
                        collected.classes.push(class);
                    }
                }
                depth = depth.saturating_sub(1);
            }

            Event::Eof => break,
            _ => {}
        }
    }

    // RDF/XML may declare the same IRI in several blocks; merge them in
    // document order so labels accumulate and any named parent counts.
    let mut merged: Vec<OwlClass> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for class in collected.classes {
        match seen.get(&class.iri) {
            Some(&i) => {
                merged[i].labels.extend(class.labels);
                merged[i].has_named_parent |= class.has_named_parent;
            }
            None => {
                seen.insert(class.iri.clone(), merged.len());
                merged.push(class);
            }
        }
    }
    collected.classes = merged;

    Ok(collected)
}

// =============================================================================
// Pass 2: rewrite
// =============================================================================

struct Plan {
    /// iri -> (new label, reparent under root)
    classes: BTreeMap<String, (String, bool)>,
    root_iri: String,
}

fn build_plan(collected: &Collected) -> (Plan, BTreeMap<String, ClassMapping>) {
    let mut classes = BTreeMap::new();
    let mut mapping = BTreeMap::new();

    for class in &collected.classes {
        let source = class
            .labels
            .first()
            .cloned()
            .unwrap_or_else(|| label_from_iri(&class.iri).to_string());
        let new_label = normalize_label(&source);

        if new_label.is_empty() {
            warn!(iri = %class.iri, "class label is empty after cleanup");
        }

        mapping.insert(
            class.iri.clone(),
            ClassMapping {
                labels: class.labels.clone(),
                bc_label: new_label.clone(),
            },
        );
        classes.insert(class.iri.clone(), (new_label, !class.has_named_parent));
    }

    let root_iri = root_class_iri(
        collected.ontology_iri.as_deref(),
        collected.classes.first().map(|c| c.iri.as_str()),
    );

    (Plan { classes, root_iri }, mapping)
}

fn root_class_iri(ontology_iri: Option<&str>, first_class_iri: Option<&str>) -> String {
    if let Some(base) = ontology_iri {
        if base.ends_with('#') || base.ends_with('/') {
            return format!("{base}{ROOT_CLASS_NAME}");
        }
        return format!("{base}#{ROOT_CLASS_NAME}");
    }
    if let Some(iri) = first_class_iri {
        if let Some(p) = iri.rfind(['#', '/']) {
            return format!("{}{}", &iri[..=p], ROOT_CLASS_NAME);
        }
    }
    format!("#{ROOT_CLASS_NAME}")
}

fn write_label<W: std::io::Write>(writer: &mut Writer<W>, label: &str) -> OntologyResult<()> {
    writer.write_event(Event::Start(BytesStart::new("rdfs:label")))?;
    writer.write_event(Event::Text(BytesText::new(label)))?;
    writer.write_event(Event::End(BytesEnd::new("rdfs:label")))?;
    Ok(())
}

fn write_subclass_of<W: std::io::Write>(
    writer: &mut Writer<W>,
    resource: &str,
) -> OntologyResult<()> {
    let mut e = BytesStart::new("rdfs:subClassOf");
    e.push_attribute(("rdf:resource", resource));
    writer.write_event(Event::Empty(e))?;
    Ok(())
}

fn write_root_class<W: std::io::Write>(writer: &mut Writer<W>, iri: &str) -> OntologyResult<()> {
    let mut start = BytesStart::new("owl:Class");
    start.push_attribute(("rdf:about", iri));
    writer.write_event(Event::Start(start))?;
    write_label(writer, ROOT_CLASS_NAME)?;
    write_subclass_of(writer, OWL_THING_IRI)?;
    writer.write_event(Event::End(BytesEnd::new("owl:Class")))?;
    Ok(())
}

fn rewrite(xml: &str, plan: &Plan) -> OntologyResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    // (iri, reparent, depth of the declaration)
    let mut current: Option<(String, bool, usize)> = None;
    let mut depth: usize = 0;
    // Depth at which a dropped subtree started.
    let mut skip_from: Option<usize> = None;
    // IRIs whose new label and parent have already been written; later
    // declarations of the same class pass through untouched.
    let mut emitted: HashSet<String> = HashSet::new();
    let inject_root = plan.classes.values().any(|(_, reparent)| *reparent);

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) => {
                depth += 1;

                if skip_from.is_some() {
                    continue;
                }

                let name = e.name().as_ref().to_vec();

                if name == b"owl:Class" && current.is_none() {
                    if let Some(iri) = class_iri(e)? {
                        if let Some((new_label, reparent)) = plan.classes.get(&iri) {
                            writer.write_event(event.borrow())?;
                            if emitted.insert(iri.clone()) {
                                write_label(&mut writer, new_label)?;
                                if *reparent {
                                    write_subclass_of(&mut writer, &plan.root_iri)?;
                                }
                            }
                            current = Some((iri, *reparent, depth));
                            continue;
                        }
                    }
                    writer.write_event(event.borrow())?;
                    continue;
                }

                if let Some((_, reparent, d)) = &current {
                    if *d + 1 == depth {
                        // Old labels are replaced by the one written above.
                        if name == b"rdfs:label" {
                            skip_from = Some(depth);
                            continue;
                        }
                        // Thing parents of reparented classes are dropped.
                        if name == b"rdfs:subClassOf" && *reparent {
                            if let Some(resource) = resource_attr(e)? {
                                if is_thing(&resource) {
                                    skip_from = Some(depth);
                                    continue;
                                }
                            }
                        }
                    }
                }

                writer.write_event(event.borrow())?;
            }

            Event::Empty(ref e) => {
                if skip_from.is_some() {
                    continue;
                }

                // An attribute-only class declaration still needs its new
                // label and parent, so it becomes a regular element.
                if e.name().as_ref() == b"owl:Class" && current.is_none() {
                    if let Some(iri) = class_iri(e)? {
                        if let Some((new_label, reparent)) = plan.classes.get(&iri) {
                            if emitted.insert(iri) {
                                writer.write_event(Event::Start(e.borrow()))?;
                                write_label(&mut writer, new_label)?;
                                if *reparent {
                                    write_subclass_of(&mut writer, &plan.root_iri)?;
                                }
                                writer.write_event(Event::End(BytesEnd::new("owl:Class")))?;
                            } else {
                                writer.write_event(event.borrow())?;
                            }
                            continue;
                        }
                    }
                }

                if let Some((_, reparent, d)) = &current {
                    if *d == depth && e.name().as_ref() == b"rdfs:subClassOf" && *reparent {
                        if let Some(resource) = resource_attr(e)? {
                            if is_thing(&resource) {
                                continue;
                            }
                        }
                    }
                }

                writer.write_event(event.borrow())?;
            }

            Event::End(ref e) => {
                let closing_skip = skip_from == Some(depth);
                if closing_skip {
                    skip_from = None;
                    depth = depth.saturating_sub(1);
                    continue;
                }
                if skip_from.is_some() {
                    depth = depth.saturating_sub(1);
                    continue;
                }

                if matches!(current, Some((_, _, d)) if d == depth) {
                    current = None;
                }

                if inject_root && e.name().as_ref() == b"rdf:RDF" {
                    write_root_class(&mut writer, &plan.root_iri)?;
                }

                writer.write_event(event.borrow())?;
                depth = depth.saturating_sub(1);
            }

            Event::Eof => break,

            other => {
                if skip_from.is_none() {
                    writer.write_event(other.borrow())?;
                }
            }
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| OntologyError::XmlError(format!("rewritten document is not UTF-8: {e}")))
}

// =============================================================================
// Entry points
// =============================================================================

/// Normalize an ontology document held in memory.
pub fn normalize_xml(xml: &str) -> OntologyResult<NormalizedOntology> {
    let collected = collect_classes(xml)?;

    if collected.classes.is_empty() {
        return Err(OntologyError::NoClasses);
    }

    debug!(classes = collected.classes.len(), "collected ontology classes");

    let (plan, mapping) = build_plan(&collected);
    let reparented = plan.classes.values().filter(|(_, r)| *r).count();
    let xml = rewrite(xml, &plan)?;

    Ok(NormalizedOntology {
        xml,
        mapping,
        reparented,
    })
}

/// Normalize an ontology file on disk.
///
/// Reads `<dir>/<file>` and writes `<dir>/bc_<file>` (the rewritten
/// ontology) plus `<dir>/bc_classes_mapping.json` (the label mapping).
pub fn normalize_ontology(dir: &Path, file: &str) -> OntologyResult<NormalizeReport> {
    let input = dir.join(file);
    debug!(path = %input.display(), "loading ontology");

    let xml = std::fs::read_to_string(&input)?;
    let normalized = normalize_xml(&xml)?;

    let ontology_path = dir.join(format!("bc_{file}"));
    std::fs::write(&ontology_path, &normalized.xml)?;

    let mapping_path = dir.join("bc_classes_mapping.json");
    let json = serde_json::to_string_pretty(&normalized.mapping)?;
    std::fs::write(&mapping_path, json)?;

    Ok(NormalizeReport {
        classes: normalized.mapping.len(),
        reparented: normalized.reparented,
        ontology_path,
        mapping_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONTOLOGY: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Ontology rdf:about="http://example.org/onto"/>
  <owl:Class rdf:about="http://example.org/onto#Gene_product">
    <rdfs:label>Gene product</rdfs:label>
    <rdfs:subClassOf rdf:resource="http://www.w3.org/2002/07/owl#Thing"/>
  </owl:Class>
  <owl:Class rdf:about="http://example.org/onto#Protein-coding_gene">
    <rdfs:label>Protein-coding gene</rdfs:label>
    <rdfs:label>pc gene</rdfs:label>
    <rdfs:subClassOf rdf:resource="http://example.org/onto#Gene_product"/>
  </owl:Class>
  <owl:Class rdf:about="http://example.org/onto#Unlabeled_class"/>
</rdf:RDF>
"#;

    #[test]
    fn test_remove_characters() {
        assert_eq!(remove_characters("a b-c%d", CHARS_TO_REMOVE), "abcd");
    }

    #[test]
    fn test_camelize_underscores() {
        assert_eq!(camelize_underscores("gene_product"), "geneProduct");
        assert_eq!(camelize_underscores("a_b_c"), "aBC");
        assert_eq!(camelize_underscores("no_underscore_"), "noUnderscore");
        assert_eq!(camelize_underscores("plain"), "plain");
    }

    #[test]
    fn test_lowercase_first() {
        assert_eq!(lowercase_first("GeneProduct"), "geneProduct");
        assert_eq!(lowercase_first(""), "");
    }

    #[test]
    fn test_label_from_iri() {
        assert_eq!(label_from_iri("http://example.org/onto#Gene"), "Gene");
        assert_eq!(label_from_iri("http://example.org/onto/Gene"), "Gene");
        assert_eq!(label_from_iri("Gene"), "Gene");
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Gene product"), "geneproduct");
        assert_eq!(normalize_label("Protein-coding_gene"), "proteincodingGene");
        assert_eq!(normalize_label("My 100% label"), "my100label");
    }

    #[test]
    fn test_normalize_xml_mapping() {
        let normalized = normalize_xml(ONTOLOGY).unwrap();

        let gene = &normalized.mapping["http://example.org/onto#Gene_product"];
        assert_eq!(gene.labels, vec!["Gene product"]);
        assert_eq!(gene.bc_label, "geneproduct");

        // First label wins
        let protein = &normalized.mapping["http://example.org/onto#Protein-coding_gene"];
        assert_eq!(protein.labels.len(), 2);
        assert_eq!(protein.bc_label, "proteincodinggene");

        // No label: derived from the IRI fragment
        let unlabeled = &normalized.mapping["http://example.org/onto#Unlabeled_class"];
        assert!(unlabeled.labels.is_empty());
        assert_eq!(unlabeled.bc_label, "unlabeledClass");
    }

    #[test]
    fn test_normalize_xml_reparents_thing_children() {
        let normalized = normalize_xml(ONTOLOGY).unwrap();

        // Gene_product (Thing child) and Unlabeled_class (no parent)
        assert_eq!(normalized.reparented, 2);

        assert!(normalized.xml.contains("http://example.org/onto#BcRootClass"));
        assert!(normalized.xml.contains("<rdfs:label>BcRootClass</rdfs:label>"));

        // The named parent of Protein-coding_gene is preserved
        assert!(normalized
            .xml
            .contains("rdf:resource=\"http://example.org/onto#Gene_product\""));
    }

    #[test]
    fn test_normalize_xml_rewrites_labels() {
        let normalized = normalize_xml(ONTOLOGY).unwrap();

        assert!(normalized.xml.contains("<rdfs:label>geneproduct</rdfs:label>"));
        assert!(normalized
            .xml
            .contains("<rdfs:label>proteincodinggene</rdfs:label>"));
        // Old labels are gone
        assert!(!normalized.xml.contains("<rdfs:label>Gene product</rdfs:label>"));
        assert!(!normalized.xml.contains("<rdfs:label>pc gene</rdfs:label>"));
    }

    #[test]
    fn test_duplicate_class_declarations_merged() {
        // The same class split across two blocks, with the named parent in
        // the first and an extra label in the second.
        let xml = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Ontology rdf:about="http://example.org/onto"/>
  <owl:Class rdf:about="http://example.org/onto#A">
    <rdfs:label>A</rdfs:label>
    <rdfs:subClassOf rdf:resource="http://example.org/onto#B"/>
  </owl:Class>
  <owl:Class rdf:about="http://example.org/onto#B">
    <rdfs:label>B</rdfs:label>
  </owl:Class>
  <owl:Class rdf:about="http://example.org/onto#A">
    <rdfs:label>A annotated</rdfs:label>
  </owl:Class>
</rdf:RDF>
"#;
        let normalized = normalize_xml(xml).unwrap();

        // Only B lacks a named parent; A keeps its parent from block one.
        assert_eq!(normalized.reparented, 1);
        assert_eq!(
            normalized
                .xml
                .matches("rdf:resource=\"http://example.org/onto#BcRootClass\"")
                .count(),
            1
        );

        // Labels accumulate in document order; the first one names the class.
        let a = &normalized.mapping["http://example.org/onto#A"];
        assert_eq!(a.labels, vec!["A", "A annotated"]);
        assert_eq!(a.bc_label, "a");

        // The new label lands in the first block only.
        assert_eq!(
            normalized.xml.matches("<rdfs:label>a</rdfs:label>").count(),
            1
        );
    }

    #[test]
    fn test_no_root_class_without_reparenting() {
        // Every class has a named parent, so no root class is needed.
        let xml = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://example.org/onto#A">
    <rdfs:label>A</rdfs:label>
    <rdfs:subClassOf rdf:resource="http://other.org/ext#Parent"/>
  </owl:Class>
</rdf:RDF>
"#;
        let normalized = normalize_xml(xml).unwrap();

        assert_eq!(normalized.reparented, 0);
        assert!(!normalized.xml.contains("BcRootClass"));
    }

    #[test]
    fn test_normalize_xml_no_classes() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"></rdf:RDF>"#;
        assert!(matches!(normalize_xml(xml), Err(OntologyError::NoClasses)));
    }

    #[test]
    fn test_root_class_iri() {
        assert_eq!(
            root_class_iri(Some("http://example.org/onto"), None),
            "http://example.org/onto#BcRootClass"
        );
        assert_eq!(
            root_class_iri(Some("http://example.org/onto#"), None),
            "http://example.org/onto#BcRootClass"
        );
        assert_eq!(
            root_class_iri(None, Some("http://example.org/onto#Gene")),
            "http://example.org/onto#BcRootClass"
        );
        assert_eq!(root_class_iri(None, None), "#BcRootClass");
    }

    #[test]
    fn test_normalize_ontology_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("onto.owl"), ONTOLOGY).unwrap();

        let report = normalize_ontology(dir.path(), "onto.owl").unwrap();

        assert_eq!(report.classes, 3);
        assert_eq!(report.reparented, 2);
        assert!(dir.path().join("bc_onto.owl").exists());

        let mapping: BTreeMap<String, ClassMapping> = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("bc_classes_mapping.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(mapping.len(), 3);

        // The rewritten ontology normalizes again without error and is stable
        let rewritten = std::fs::read_to_string(dir.path().join("bc_onto.owl")).unwrap();
        let again = normalize_xml(&rewritten).unwrap();
        assert!(again.mapping.len() >= 3);
    }
}
