//! Extraction pass over a parsed template.
//!
//! Every node is visited depth-first in document order. Translatable text content
//! and `value` attributes are replaced with `#{messages.<label>}` and reported to a
//! [`LabelSink`].

use std::path::Path;

use tracing::debug;

use super::{
    bundle::LabelSink,
    document::{Document, NodeId, NodeKind},
    label::{DATE_TIME_FORMAT_KEY, TEXT_ROLE, local_name, make_label, reference_expression},
    text::{is_translatable, trim_text},
};

/// Element whose attributes are never extracted (namespace prefix ignored).
pub const EXCLUDED_ELEMENT: &str = "graphicImage";

/// Attribute holding translatable text.
pub const VALUE_ATTRIBUTE: &str = "value";

/// Attribute always pointed at the shared date/time pattern.
pub const PATTERN_ATTRIBUTE: &str = "pattern";

/// Rewrites `document` in place and returns the number of extracted texts.
///
/// `template` is the file the document came from; its base name prefixes every label.
pub fn walk_document<S>(template: &Path, document: &mut Document, sink: &mut S) -> usize
where
    S: LabelSink + ?Sized,
{
    let mut walker = DocumentWalker {
        template,
        document,
        sink,
    };

    walker
        .document
        .preorder()
        .into_iter()
        .map(|id| walker.visit(id))
        .sum()
}

struct DocumentWalker<'a, S: ?Sized> {
    template: &'a Path,
    document: &'a mut Document,
    sink: &'a mut S,
}

impl<S: LabelSink + ?Sized> DocumentWalker<'_, S> {
    fn visit(&mut self, id: NodeId) -> usize {
        match self.document.node(id).kind {
            NodeKind::Text(_) => self.visit_text(id),
            NodeKind::Element { .. } => self.visit_element(id),
            _ => 0,
        }
    }

    fn visit_text(&mut self, id: NodeId) -> usize {
        let NodeKind::Text(content) = &mut self.document.node_mut(id).kind else {
            return 0;
        };

        let text = trim_text(content);
        if !is_translatable(text) {
            return 0;
        }

        let label = make_label(self.template, TEXT_ROLE, text);
        debug!(label = %label, "extracted text content");
        self.sink.observe(&label, text);
        *content = reference_expression(&label);
        1
    }

    fn visit_element(&mut self, id: NodeId) -> usize {
        let NodeKind::Element { name, attributes } = &mut self.document.node_mut(id).kind else {
            return 0;
        };

        let tag = local_name(name);
        if tag == EXCLUDED_ELEMENT {
            return 0;
        }

        for attribute in attributes.iter_mut() {
            if attribute.name == PATTERN_ATTRIBUTE {
                attribute.value = reference_expression(DATE_TIME_FORMAT_KEY);
                continue;
            }

            if attribute.name != VALUE_ATTRIBUTE {
                continue;
            }

            let text = trim_text(&attribute.value);
            if is_translatable(text) {
                let label = make_label(self.template, tag, text);
                debug!(label = %label, element = %name, "extracted value attribute");
                self.sink.observe(&label, text);
                attribute.value = reference_expression(&label);
                // At most one extraction per element.
                return 1;
            }
        }

        0
    }
}
