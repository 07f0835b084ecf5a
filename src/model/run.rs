//! Text access for runs (`w:r`) and paragraphs (`w:p`).
//!
//! A run carries at most one `w:t` child; its presence is the single signal
//! that the run holds text. Runs without one (tabs, breaks, drawings, field
//! characters) are never read or rewritten here.

use super::name::{Tag, WORDML_NS};
use super::tree::{Document, NodeId, NodeKind};
use super::QName;

/// The `w:t` child of a run, if any.
pub fn text_element(doc: &Document, run: NodeId) -> Option<NodeId> {
    doc.children(run)
        .iter()
        .copied()
        .find(|&child| doc.is(child, Tag::Text))
}

/// Whether the run carries a text element.
pub fn has_text(doc: &Document, run: NodeId) -> bool {
    text_element(doc, run).is_some()
}

/// Text of a run; `None` when the run has no text element.
pub fn run_text(doc: &Document, run: NodeId) -> Option<String> {
    let t = text_element(doc, run)?;
    Some(doc.text_content(t))
}

/// Replace the text of a run, creating the text element when missing.
pub fn set_run_text(doc: &mut Document, run: NodeId, text: &str) {
    let t = match text_element(doc, run) {
        Some(t) => {
            doc.retain_children(t, |kind| {
                !matches!(kind, NodeKind::Text(_) | NodeKind::CData(_))
            });
            t
        }
        None => {
            let prefix = doc.element(run).and_then(|el| el.name.prefix.clone());
            let name = QName {
                prefix,
                local: Tag::Text.local_name().to_string(),
            };
            let t = doc.create_element(name, Some(WORDML_NS.to_string()));
            doc.append_child(run, t);
            t
        }
    };

    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        if let Some(el) = doc.element_mut(t) {
            el.set_attribute("xml:space", "preserve");
        }
    }

    let value = doc.create_text(text);
    doc.append_child(t, value);
}

/// Empty the text of a run while keeping its text element.
pub fn clear_run_text(doc: &mut Document, run: NodeId) {
    if has_text(doc, run) {
        set_run_text(doc, run, "");
    }
}

/// Runs belonging to a paragraph, in document order.
///
/// Includes runs nested in inline containers (hyperlinks, smart tags,
/// tracked insertions) but stops at nested paragraphs, whose runs belong to
/// them.
pub fn paragraph_runs(doc: &Document, paragraph: NodeId) -> Vec<NodeId> {
    let mut runs = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(paragraph).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let Some(el) = doc.element(id) else {
            continue;
        };
        if el.is(Tag::Run) {
            runs.push(id);
        } else if !el.is(Tag::Paragraph) {
            stack.extend(doc.children(id).iter().rev().copied());
        }
    }
    runs
}

/// Visible text of a paragraph: the concatenated text of its runs.
pub fn paragraph_text(doc: &Document, paragraph: NodeId) -> String {
    paragraph_runs(doc, paragraph)
        .into_iter()
        .filter_map(|run| run_text(doc, run))
        .collect()
}
