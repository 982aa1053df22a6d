use std::borrow::Cow;

use quick_xml::{Reader, escape::unescape_with, events::Event};
use thiserror::Error;

use super::{Attribute, Document, NodeKind};
use crate::core::entities::{DocumentEntities, EntityCatalog};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unresolvable entity '{name}'")]
    UnresolvedEntity { line: usize, name: String },
}

/// Parses a template into a [`Document`], expanding character and entity references.
///
/// Entities come from the DOCTYPE: its internal subset and the external subset
/// `catalog` knows by public identifier.
pub fn parse(source: &str, catalog: &EntityCatalog) -> Result<Document, DocumentError> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(false);
    reader.expand_empty_elements(false);

    let mut doc = Document::new();
    let mut stack = vec![doc.root()];
    let mut entities = DocumentEntities::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|err| syntax(source, reader.buffer_position(), err.to_string()))?;
        let parent = *stack.last().unwrap_or(&doc.root());
        let at_top_level = stack.len() == 1;

        match event {
            Event::Decl(decl) => {
                doc.set_declaration(String::from_utf8_lossy(&decl));
            }
            Event::DocType(doctype) => {
                let content = String::from_utf8_lossy(&doctype).trim().to_string();
                entities = catalog.for_doctype(Some(&content)).map_err(|name| {
                    DocumentError::UnresolvedEntity {
                        line: line_at(source, reader.buffer_position()),
                        name,
                    }
                })?;
                doc.set_doctype(content);
            }
            Event::Start(start) | Event::Empty(start)
                if at_top_level && doc.root_elements().next().is_some() =>
            {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                return Err(syntax(
                    source,
                    reader.buffer_position(),
                    format!("second root element <{}>", name),
                ));
            }
            Event::Start(start) => {
                let element = read_element(&start, &entities, source, &reader)?;
                let id = doc.append(parent, element);
                stack.push(id);
            }
            Event::Empty(start) => {
                let element = read_element(&start, &entities, source, &reader)?;
                doc.append(parent, element);
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let mut missing = None;
                let unescaped = text.unescape_with(|name| {
                    let resolved = entities.resolve(name);
                    if resolved.is_none() {
                        missing = Some(name.to_string());
                    }
                    resolved
                });
                let content = finish_unescape(unescaped, missing, source, &reader)?;

                if at_top_level {
                    if !content.trim().is_empty() {
                        return Err(syntax(
                            source,
                            reader.buffer_position(),
                            "text outside of the root element".to_string(),
                        ));
                    }
                } else {
                    doc.append(parent, NodeKind::Text(content));
                }
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata).into_owned();
                doc.append(parent, NodeKind::CData(content));
            }
            Event::Comment(comment) => {
                let content = String::from_utf8_lossy(&comment).into_owned();
                doc.append(parent, NodeKind::Comment(content));
            }
            Event::PI(pi) => {
                let content = String::from_utf8_lossy(&pi).into_owned();
                doc.append(parent, NodeKind::ProcessingInstruction(content));
            }
            Event::Eof => break,
        }
    }

    if stack.len() > 1 {
        return Err(syntax(
            source,
            source.len(),
            "unexpected end of document, unclosed element".to_string(),
        ));
    }
    if doc.root_elements().next().is_none() {
        return Err(syntax(
            source,
            source.len(),
            "document has no root element".to_string(),
        ));
    }

    Ok(doc)
}

fn read_element(
    start: &quick_xml::events::BytesStart<'_>,
    entities: &DocumentEntities<'_>,
    source: &str,
    reader: &Reader<&[u8]>,
) -> Result<NodeKind, DocumentError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|err| syntax(source, reader.buffer_position(), err.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();

        let raw = String::from_utf8_lossy(&attribute.value);
        let normalized = normalize_attribute_whitespace(&raw);

        let mut missing = None;
        let unescaped = unescape_with(&normalized, |name| {
            let resolved = entities.resolve(name);
            if resolved.is_none() {
                missing = Some(name.to_string());
            }
            resolved
        })
        .map_err(quick_xml::Error::from);
        let value = finish_unescape(unescaped, missing, source, reader)?;

        attributes.push(Attribute::new(key, value));
    }

    Ok(NodeKind::Element { name, attributes })
}

/// Literal tabs and line breaks in an attribute value read as spaces. Character
/// references such as `&#10;` are expanded afterwards and keep their character.
fn normalize_attribute_whitespace(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", "\n").replace(['\t', '\n', '\r'], " "))
}

fn finish_unescape(
    result: quick_xml::Result<Cow<'_, str>>,
    missing: Option<String>,
    source: &str,
    reader: &Reader<&[u8]>,
) -> Result<String, DocumentError> {
    match (result, missing) {
        (Ok(value), _) => Ok(value.into_owned()),
        (Err(_), Some(name)) => Err(DocumentError::UnresolvedEntity {
            line: line_at(source, reader.buffer_position()),
            name,
        }),
        (Err(err), None) => Err(syntax(source, reader.buffer_position(), err.to_string())),
    }
}

fn syntax(source: &str, position: usize, message: String) -> DocumentError {
    DocumentError::Syntax {
        line: line_at(source, position),
        message,
    }
}

/// 1-based line number of a byte offset.
fn line_at(source: &str, position: usize) -> usize {
    let end = position.min(source.len());
    source.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
