//! ISA-95 XSD reader
//!
//! Collects named XML Schema `element` and `complexType` declarations at any
//! depth, with the text of their direct `annotation/documentation` children.
//! Elements outside the XML Schema namespace are ignored.

use crate::corpus::{CorpusScan, is_bound_to, scan_files};
use crate::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::NsReader;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, trace};

/// XML Schema namespace
pub const XS_NS: &[u8] = b"http://www.w3.org/2001/XMLSchema";

/// Kind of XSD declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Isa95Group {
    Element,
    ComplexType,
}

/// A named XSD declaration with its documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Isa95Definition {
    pub name: String,
    /// Documentation text, whitespace collapsed
    pub description: String,
    pub group: Isa95Group,
    /// File the declaration was read from
    pub source: String,
}

/// Declarations gathered from a set of XSD files, by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Isa95Corpus {
    pub definitions: BTreeMap<String, Isa95Definition>,
}

impl Isa95Corpus {
    /// Add one file's declarations; they replace earlier ones of the same name.
    pub fn add_document(&mut self, definitions: BTreeMap<String, Isa95Definition>) {
        self.definitions.extend(definitions);
    }

    #[must_use]
    pub fn total_definitions(&self) -> usize {
        self.definitions.len()
    }

    /// Read every `*.xsd` file in `dir` in sorted order, skipping documents
    /// that fail to parse.
    #[must_use]
    pub fn scan_dir(dir: &Path) -> (Self, CorpusScan) {
        let (documents, scan) = scan_files(dir, "xsd", parse_xsd_document);
        let mut corpus = Self::default();
        for definitions in documents {
            corpus.add_document(definitions);
        }
        debug!("ISA-95 corpus holds {} definitions", corpus.total_definitions());
        (corpus, scan)
    }
}

/// Collapse runs of whitespace to single spaces and trim.
fn collapse_whitespace(whitespace: &Regex, text: &str) -> String {
    whitespace.replace_all(text, " ").trim().to_string()
}

struct Pending {
    /// Stack depth of the declaring element
    depth: usize,
    name: String,
    group: Isa95Group,
    docs: Vec<String>,
}

/// An open element: its local name and whether it is in the XML Schema
/// namespace.
struct OpenElement {
    name: Vec<u8>,
    xs: bool,
}

impl OpenElement {
    fn new(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Self {
        let (resolved, name) = reader.resolve_element(e.name());
        Self {
            name: name.as_ref().to_vec(),
            xs: is_bound_to(&resolved, XS_NS),
        }
    }

    fn xs_name(&self) -> Option<&[u8]> {
        self.xs.then_some(self.name.as_slice())
    }
}

fn declaration(
    xs_name: Option<&[u8]>,
    e: &BytesStart<'_>,
    source_name: &str,
) -> Result<Option<(String, Isa95Group)>> {
    let group = match xs_name {
        Some(b"element") => Isa95Group::Element,
        Some(b"complexType") => Isa95Group::ComplexType,
        _ => return Ok(None),
    };
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(source_name, err))?;
        if attr.key.as_ref() == b"name" {
            let name = attr
                .unescape_value()
                .map_err(|err| Error::xml(source_name, err))?;
            if name.is_empty() {
                return Ok(None);
            }
            return Ok(Some((name.into_owned(), group)));
        }
    }
    Ok(None)
}

/// Parse one XSD document into its named declarations.
///
/// Within a document, a `complexType` replaces an `element` of the same
/// name; among declarations of the same group the last one wins.
///
/// # Errors
///
/// Returns [`Error::Xml`] if the document is not well-formed.
pub fn parse_xsd_document(
    text: &str,
    source_name: &str,
) -> Result<BTreeMap<String, Isa95Definition>> {
    let whitespace = Regex::new(r"\s+").map_err(|e| Error::xml(source_name, e))?;
    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut open: Vec<Pending> = Vec::new();
    let mut finished: Vec<Pending> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = OpenElement::new(&reader, &e);
                let declared = declaration(element.xs_name(), &e, source_name)?;
                stack.push(element);
                if let Some((name, group)) = declared {
                    open.push(Pending {
                        depth: stack.len(),
                        name,
                        group,
                        docs: Vec::new(),
                    });
                }
            }
            Ok(Event::Empty(e)) => {
                let element = OpenElement::new(&reader, &e);
                if let Some((name, group)) = declaration(element.xs_name(), &e, source_name)? {
                    finished.push(Pending {
                        depth: stack.len() + 1,
                        name,
                        group,
                        docs: Vec::new(),
                    });
                }
            }
            Ok(Event::End(_)) => {
                if open.last().is_some_and(|p| p.depth == stack.len()) {
                    finished.extend(open.pop());
                }
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|err| Error::xml(source_name, err))?;
                collect_documentation(&text, &stack, &mut open);
            }
            Ok(Event::CData(c)) => {
                collect_documentation(&String::from_utf8_lossy(&c), &stack, &mut open);
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

    if let Some(unclosed) = stack.last() {
        return Err(Error::xml(
            source_name,
            format!("unclosed element <{}>", String::from_utf8_lossy(&unclosed.name)),
        ));
    }

    let mut definitions = BTreeMap::new();
    for group in [Isa95Group::Element, Isa95Group::ComplexType] {
        for pending in finished.iter().filter(|p| p.group == group) {
            definitions.insert(
                pending.name.clone(),
                Isa95Definition {
                    name: pending.name.clone(),
                    description: collapse_whitespace(&whitespace, &pending.docs.join(" ")),
                    group,
                    source: source_name.to_string(),
                },
            );
        }
    }

    trace!("{}: {} definitions", source_name, definitions.len());
    Ok(definitions)
}

/// Append text found at `<decl>/annotation/documentation` to its
/// declaration.
fn collect_documentation(text: &str, stack: &[OpenElement], open: &mut [Pending]) {
    let depth = stack.len();
    if depth < 3
        || stack[depth - 1].xs_name() != Some(b"documentation".as_slice())
        || stack[depth - 2].xs_name() != Some(b"annotation".as_slice())
    {
        return;
    }
    if let Some(pending) = open.last_mut().filter(|p| p.depth == depth - 2) {
        pending.docs.push(text.to_string());
    }
}
