use quick_xml::escape::{escape, partial_escape};

use super::{Document, NodeId, NodeKind};

const INDENT: &str = "    ";

/// Writes the document back as markup, indenting element-only content by four
/// spaces per level. Elements holding text are written inline so their text is
/// reproduced exactly.
pub fn serialize(doc: &Document) -> String {
    let mut writer = Writer {
        doc,
        out: String::new(),
    };

    if let Some(declaration) = doc.declaration() {
        writer.out.push_str("<?");
        writer.out.push_str(declaration);
        writer.out.push_str("?>\n");
    }
    if let Some(doctype) = doc.doctype() {
        writer.out.push_str("<!DOCTYPE ");
        writer.out.push_str(doctype);
        writer.out.push_str(">\n");
    }

    for &child in doc.children(doc.root()) {
        if !writer.is_blank_text(child) {
            writer.line(child, 0);
        }
    }

    writer.out
}

struct Writer<'d> {
    doc: &'d Document,
    out: String,
}

impl Writer<'_> {
    fn line(&mut self, id: NodeId, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.node(id, depth, true);
        self.out.push('\n');
    }

    fn node(&mut self, id: NodeId, depth: usize, pretty: bool) {
        let doc = self.doc;

        match &doc.node(id).kind {
            NodeKind::Element { name, attributes } => {
                self.out.push('<');
                self.out.push_str(name);
                for attribute in attributes {
                    self.out.push(' ');
                    self.out.push_str(&attribute.name);
                    self.out.push_str("=\"");
                    self.out.push_str(&escape(attribute.value.as_str()));
                    self.out.push('"');
                }

                let children = doc.children(id);
                if children.is_empty() {
                    self.out.push_str("/>");
                    return;
                }
                self.out.push('>');

                if pretty && self.is_element_only(id) {
                    self.out.push('\n');
                    for &child in children {
                        if !self.is_blank_text(child) {
                            self.line(child, depth + 1);
                        }
                    }
                    for _ in 0..depth {
                        self.out.push_str(INDENT);
                    }
                } else {
                    for &child in children {
                        self.node(child, depth, false);
                    }
                }

                self.out.push_str("</");
                self.out.push_str(name);
                self.out.push('>');
            }
            NodeKind::Text(text) => self.out.push_str(&partial_escape(text.as_str())),
            NodeKind::CData(text) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(text);
                self.out.push_str("]]>");
            }
            NodeKind::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            NodeKind::ProcessingInstruction(text) => {
                self.out.push_str("<?");
                self.out.push_str(text);
                self.out.push_str("?>");
            }
            NodeKind::Document => {
                for &child in doc.children(id) {
                    self.node(child, depth, pretty);
                }
            }
        }
    }

    fn is_blank_text(&self, id: NodeId) -> bool {
        matches!(&self.doc.node(id).kind, NodeKind::Text(t) if t.trim().is_empty())
    }

    /// True when the children are markup separated only by whitespace, so
    /// whitespace can be replaced by indentation without changing content.
    fn is_element_only(&self, id: NodeId) -> bool {
        let children = self.doc.children(id);
        let mut has_markup = false;

        for &child in children {
            match &self.doc.node(child).kind {
                NodeKind::Text(text) if text.trim().is_empty() => {}
                NodeKind::Text(_) | NodeKind::CData(_) => return false,
                _ => has_markup = true,
            }
        }

        has_markup
    }
}
