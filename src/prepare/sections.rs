//! Rewriting of section tokens into structural comments.
//!
//! A section (`{{#ITEMS}}` … `{{/ITEMS}}`) must repeat whole paragraphs or
//! whole table rows, never fragments of them. The paragraph (or row) holding
//! the token is replaced by a comment carrying the token, so the serialized
//! markup stays well-formed and the template engine still sees the token when
//! it scans the text.

use crate::model::{paragraph_text, Document, NodeId, Tag};

use super::token::section_tokens;

/// Where a paragraph sits, as far as section replacement is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Direct child of the document body
    Body,
    /// Inside a table cell
    TableCell {
        /// The row containing the cell
        row: NodeId,
        /// The row's parent (normally the table)
        table: NodeId,
    },
    /// Anywhere else (headers, text boxes, content controls, ...)
    Other,
}

/// Classify the position of a paragraph.
pub fn placement(doc: &Document, paragraph: NodeId) -> Placement {
    let Some(parent) = doc.parent(paragraph) else {
        return Placement::Other;
    };
    if doc.is(parent, Tag::Body) {
        return Placement::Body;
    }
    if doc.is(parent, Tag::Cell) {
        if let Some(row) = doc.parent(parent).filter(|&row| doc.is(row, Tag::Row)) {
            if let Some(table) = doc.parent(row) {
                return Placement::TableCell { row, table };
            }
        }
    }
    Placement::Other
}

/// Counts of what the transformer did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionOutcome {
    /// Body paragraphs replaced by a comment
    pub paragraphs_replaced: usize,

    /// Table rows replaced by a comment
    pub rows_replaced: usize,

    /// Section-bearing paragraphs left alone because of their position
    pub skipped: usize,
}

/// Replace every section-bearing paragraph (or its table row) with a comment.
///
/// Must run after run merging, otherwise split tokens go unnoticed.
pub fn transform_sections(doc: &mut Document) -> SectionOutcome {
    let mut outcome = SectionOutcome::default();
    let root = doc.root();
    let paragraphs: Vec<NodeId> = doc
        .descendants(root)
        .filter(|&id| doc.is(id, Tag::Paragraph))
        .collect();

    for paragraph in paragraphs {
        if !doc.is_attached(paragraph) {
            continue;
        }
        let text = paragraph_text(doc, paragraph);
        let tokens = section_tokens(&text);
        if tokens.is_empty() {
            continue;
        }

        match placement(doc, paragraph) {
            Placement::Body => {
                let comment = doc.create_comment(tokens.concat());
                doc.replace(paragraph, comment);
                outcome.paragraphs_replaced += 1;
            }
            Placement::TableCell { row, table } => {
                let comment = doc.create_comment(row_section_text(doc, row));
                doc.replace(row, comment);
                log::debug!(
                    "Replaced table row {:?} of {:?} with section comment",
                    row,
                    table
                );
                outcome.rows_replaced += 1;
            }
            Placement::Other => {
                log::warn!(
                    "Section token {:?} is outside the body and table cells; left as is",
                    text
                );
                outcome.skipped += 1;
            }
        }
    }

    log::debug!(
        "Section transform: {} paragraphs, {} rows replaced, {} skipped",
        outcome.paragraphs_replaced,
        outcome.rows_replaced,
        outcome.skipped
    );
    outcome
}

/// Section tokens of every paragraph in a row, in document order.
fn row_section_text(doc: &Document, row: NodeId) -> String {
    doc.descendants(row)
        .filter(|&id| doc.is(id, Tag::Paragraph))
        .map(|p| section_tokens(&paragraph_text(doc, p)).concat())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, QName, WORDML_NS};

    fn w(doc: &mut Document, parent: NodeId, local: &str) -> NodeId {
        let id = doc.create_element(QName::prefixed("w", local), Some(WORDML_NS.to_string()));
        doc.append_child(parent, id);
        id
    }

    fn paragraph(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
        let p = w(doc, parent, "p");
        let r = w(doc, p, "r");
        let t = w(doc, r, "t");
        let value = doc.create_text(text);
        doc.append_child(t, value);
        p
    }

    fn body(doc: &mut Document) -> NodeId {
        let root = doc.root();
        let document = w(doc, root, "document");
        w(doc, document, "body")
    }

    #[test]
    fn test_body_paragraph_replaced_in_place() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let before = paragraph(&mut doc, body, "intro");
        let section = paragraph(&mut doc, body, "{{#ITEMS}}");
        let after = paragraph(&mut doc, body, "outro");

        let outcome = transform_sections(&mut doc);
        assert_eq!(outcome.paragraphs_replaced, 1);

        let children = doc.children(body).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], before);
        assert_eq!(children[2], after);
        assert_eq!(doc.comment(children[1]), Some("{{#ITEMS}}"));
        assert!(!doc.is_attached(section));
    }

    #[test]
    fn test_table_row_replaced() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let table = w(&mut doc, body, "tbl");
        w(&mut doc, table, "tblPr");
        let row = w(&mut doc, table, "tr");
        let cell = w(&mut doc, row, "tc");
        let p = paragraph(&mut doc, cell, "{{/ITEMS}}");

        assert_eq!(placement(&doc, p), Placement::TableCell { row, table });

        let outcome = transform_sections(&mut doc);
        assert_eq!(outcome.rows_replaced, 1);
        let children = doc.children(table).to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(doc.comment(children[1]), Some("{{/ITEMS}}"));
    }

    #[test]
    fn test_row_comment_collects_sibling_cells() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let table = w(&mut doc, body, "tbl");
        let row = w(&mut doc, table, "tr");
        let first = w(&mut doc, row, "tc");
        paragraph(&mut doc, first, "{{#ROWS}}{{name}}");
        let second = w(&mut doc, row, "tc");
        paragraph(&mut doc, second, "{{/ROWS}}");

        let outcome = transform_sections(&mut doc);
        assert_eq!(outcome.rows_replaced, 1);
        let comment = doc.children(table)[0];
        assert_eq!(doc.comment(comment), Some("{{#ROWS}}{{/ROWS}}"));
    }

    #[test]
    fn test_plain_placeholders_untouched() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let p = paragraph(&mut doc, body, "Dear {{NAME}}");

        let outcome = transform_sections(&mut doc);
        assert_eq!(outcome, SectionOutcome::default());
        assert_eq!(doc.children(body), &[p]);
    }

    #[test]
    fn test_other_placement_skipped() {
        let mut doc = Document::new();
        let body = body(&mut doc);
        let sdt = w(&mut doc, body, "sdtContent");
        let p = paragraph(&mut doc, sdt, "{{#ITEMS}}");

        assert_eq!(placement(&doc, p), Placement::Other);
        let outcome = transform_sections(&mut doc);
        assert_eq!(outcome.skipped, 1);
        assert!(doc.is_attached(p));
        assert!(doc
            .children(sdt)
            .iter()
            .all(|&c| !matches!(doc.kind(c), NodeKind::Comment(_))));
    }
}
