//! ECLASS XML reader
//!
//! Reads OntoML `class` elements carrying an `id`. The class kind comes from
//! the XML Schema instance `type` attribute, whatever prefix binds it.
//! Categorization classes are classified directly; item classes declare the
//! categorization classes they are a case of through `is_case_of/@class_ref`.

use crate::corpus::{CorpusScan, is_bound_to, scan_files};
use crate::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::NsReader;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, trace};

/// Namespace of OntoML dictionary elements
pub const ONTOML_NS: &[u8] = b"urn:iso:std:iso:is:13584:-32:ed-1:tech:xml-schema:ontoml";
/// XML Schema instance namespace, home of the `type` attribute
pub const XSI_NS: &[u8] = b"http://www.w3.org/2001/XMLSchema-instance";

const CATEGORIZATION_SUFFIX: &str = "CATEGORIZATION_CLASS_Type";
const ITEM_SUFFIX: &str = "ITEM_CLASS_CASE_OF_Type";

/// Kind of an ECLASS class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EclassClassKind {
    /// Base taxonomy category
    Categorization,
    /// Concrete item declared a case of one or more categories
    Item,
}

impl EclassClassKind {
    fn from_xsi_type(xsi_type: &str) -> Option<Self> {
        if xsi_type.ends_with(CATEGORIZATION_SUFFIX) {
            Some(Self::Categorization)
        } else if xsi_type.ends_with(ITEM_SUFFIX) {
            Some(Self::Item)
        } else {
            None
        }
    }
}

/// One class read from an ECLASS document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EclassClass {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EclassClassKind,
    pub definition: String,
    /// Categorization ids this item is a case of
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub case_of: Vec<String>,
    /// File the class was read from
    pub source: String,
}

/// Classes gathered from a set of ECLASS documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EclassCorpus {
    /// Class id -> class; later documents replace earlier ones
    pub classes: BTreeMap<String, EclassClass>,
    /// Categorization id -> item ids declaring themselves a case of it
    pub case_of: BTreeMap<String, Vec<String>>,
}

impl EclassCorpus {
    /// Add the classes of one document.
    pub fn add_document(&mut self, classes: Vec<EclassClass>) {
        for class in classes {
            for base in &class.case_of {
                self.case_of
                    .entry(base.clone())
                    .or_default()
                    .push(class.id.clone());
            }
            self.classes.insert(class.id.clone(), class);
        }
    }

    /// All classes, categorization and item.
    #[must_use]
    pub fn total_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn categorization_classes(&self) -> impl Iterator<Item = &EclassClass> {
        self.classes
            .values()
            .filter(|c| c.kind == EclassClassKind::Categorization)
    }

    /// Items declared a case of `base_id`.
    #[must_use]
    pub fn items_of(&self, base_id: &str) -> &[String] {
        self.case_of.get(base_id).map_or(&[], Vec::as_slice)
    }

    /// Read every `*.xml` file in `dir`, skipping documents that fail to parse.
    #[must_use]
    pub fn scan_dir(dir: &Path) -> (Self, CorpusScan) {
        let (documents, scan) = scan_files(dir, "xml", parse_eclass_document);
        let mut corpus = Self::default();
        for classes in documents {
            corpus.add_document(classes);
        }
        debug!("ECLASS corpus holds {} classes", corpus.total_classes());
        (corpus, scan)
    }
}

struct ClassBuilder {
    /// Element stack depth of the class element itself
    depth: usize,
    id: String,
    kind: Option<EclassClassKind>,
    name: Option<String>,
    label: Option<String>,
    label_done: bool,
    definition: Vec<String>,
    case_of: Vec<String>,
}

impl ClassBuilder {
    fn finish(self, source_name: &str) -> Option<EclassClass> {
        let kind = self.kind?;
        let name = self
            .name
            .unwrap_or_else(|| format!("ECLASS Class {}", self.id));
        Some(EclassClass {
            id: self.id,
            name,
            kind,
            definition: self.definition.join(" "),
            case_of: if kind == EclassClassKind::Item {
                self.case_of
            } else {
                Vec::new()
            },
            source: source_name.to_string(),
        })
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, key: &[u8], source_name: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(source_name, err))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::xml(source_name, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Value of the attribute `{namespace}local`, resolved through the prefixes
/// in scope.
fn namespaced_attribute(
    reader: &NsReader<&[u8]>,
    e: &BytesStart<'_>,
    namespace: &[u8],
    local: &[u8],
    source_name: &str,
) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(source_name, err))?;
        let (resolved, name) = reader.resolve_attribute(attr.key);
        if name.as_ref() == local && is_bound_to(&resolved, namespace) {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::xml(source_name, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn is_ontoml_class(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> bool {
    let (resolved, name) = reader.resolve_element(e.name());
    name.as_ref() == b"class" && is_bound_to(&resolved, ONTOML_NS)
}

/// Parse one ECLASS XML document.
///
/// # Errors
///
/// Returns [`Error::Xml`] if the document is not well-formed.
pub fn parse_eclass_document(text: &str, source_name: &str) -> Result<Vec<EclassClass>> {
    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<ClassBuilder> = None;
    let mut classes = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(local_name(&e));
                on_open(&reader, &e, &stack, &mut current, source_name)?;
            }
            Ok(Event::Empty(e)) => {
                stack.push(local_name(&e));
                on_open(&reader, &e, &stack, &mut current, source_name)?;
                on_close(&stack, &mut current, &mut classes, source_name);
                stack.pop();
            }
            Ok(Event::End(_)) => {
                on_close(&stack, &mut current, &mut classes, source_name);
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|err| Error::xml(source_name, err))?;
                on_text(&text, &stack, current.as_mut());
            }
            Ok(Event::CData(c)) => {
                on_text(&String::from_utf8_lossy(&c), &stack, current.as_mut());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(Error::xml(
                    source_name,
                    format!("{err} at position {}", reader.error_position()),
                ));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::xml(source_name, format!("unclosed element <{open}>")));
    }

    trace!("{}: {} classes", source_name, classes.len());
    Ok(classes)
}

fn on_open(
    reader: &NsReader<&[u8]>,
    e: &BytesStart<'_>,
    stack: &[String],
    current: &mut Option<ClassBuilder>,
    source_name: &str,
) -> Result<()> {
    let depth = stack.len();
    if current.is_none() {
        if is_ontoml_class(reader, e) {
            if let Some(id) = attribute(e, b"id", source_name)?.filter(|id| !id.is_empty()) {
                let xsi_type = namespaced_attribute(reader, e, XSI_NS, b"type", source_name)?
                    .unwrap_or_default();
                *current = Some(ClassBuilder {
                    depth,
                    id,
                    kind: EclassClassKind::from_xsi_type(&xsi_type),
                    name: None,
                    label: None,
                    label_done: false,
                    definition: Vec::new(),
                    case_of: Vec::new(),
                });
            }
        }
        return Ok(());
    }
    let Some(builder) = current.as_mut() else {
        return Ok(());
    };

    if depth == builder.depth + 1 && stack[depth - 1] == "is_case_of" {
        if let Some(class_ref) = attribute(e, b"class_ref", source_name)? {
            builder.case_of.push(class_ref);
        }
    } else if depth == builder.depth + 2
        && stack[depth - 2] == "preferred_name"
        && stack[depth - 1] == "label"
        && !builder.label_done
    {
        builder.label = Some(String::new());
    }
    Ok(())
}

fn on_text(text: &str, stack: &[String], current: Option<&mut ClassBuilder>) {
    let Some(builder) = current else {
        return;
    };
    let depth = stack.len();
    if depth != builder.depth + 2 {
        return;
    }

    if let Some(label) = builder.label.as_mut() {
        label.push_str(text);
    } else if stack[depth - 2] == "definition" && stack[depth - 1] == "text" {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            builder.definition.push(trimmed.to_string());
        }
    }
}

fn on_close(
    stack: &[String],
    current: &mut Option<ClassBuilder>,
    classes: &mut Vec<EclassClass>,
    source_name: &str,
) {
    let depth = stack.len();
    let Some(builder) = current.as_mut() else {
        return;
    };

    if depth == builder.depth + 2 {
        if let Some(label) = builder.label.take() {
            let label = label.trim();
            if !label.is_empty() {
                builder.name = Some(label.to_string());
            }
            builder.label_done = true;
        }
    } else if depth == builder.depth {
        if let Some(class) = current.take().and_then(|b| b.finish(source_name)) {
            classes.push(class);
        }
    }
}
