//! Removal of insignificant whitespace-only text nodes.
//!
//! Pretty-printed parts carry indentation text between structural elements.
//! Left in place, those nodes show up as extra paragraph children and get in
//! the way of run scanning.

use crate::model::{Document, NodeId, NodeKind};

/// Strip whitespace-only text children from every element below `node`.
///
/// `node` itself is never removed. Text with any non-whitespace character is
/// left exactly as it is. With `preserve_space`, elements in the scope of
/// `xml:space="preserve"` keep their whitespace. Returns the number of nodes
/// removed.
pub fn normalize_whitespace(doc: &mut Document, node: NodeId, preserve_space: bool) -> usize {
    let mut removed = 0;
    let mut stack = vec![(node, false)];

    while let Some((id, inherited)) = stack.pop() {
        let preserve = preserve_space && space_preserved(doc, id, inherited);

        for &child in doc.children(id) {
            if !doc.children(child).is_empty() {
                stack.push((child, preserve));
            }
        }

        if !preserve {
            removed += doc.retain_children(id, |kind| !is_blank_text(kind));
        }
    }

    log::debug!("Removed {} whitespace-only text nodes", removed);
    removed
}

fn space_preserved(doc: &Document, id: NodeId, inherited: bool) -> bool {
    match doc.element(id).and_then(|el| el.attribute("xml:space")) {
        Some("preserve") => true,
        Some(_) => false,
        None => inherited,
    }
}

fn is_blank_text(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Text(text) if text.trim().is_empty())
}
