//! Serialization of the arena tree back to markup.

use quick_xml::escape::{escape, partial_escape};

use crate::model::{Document, NodeId, NodeKind, XmlDeclaration};

enum Step {
    Enter(NodeId),
    Leave(NodeId),
}

/// Serialize a document, declaration included.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(decl) = doc.declaration() {
        write_declaration(decl, &mut out);
    }
    for &child in doc.children(doc.root()) {
        write_node(doc, child, &mut out);
    }
    out
}

/// Serialize a single node and everything below it.
pub fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_declaration(decl: &XmlDeclaration, out: &mut String) {
    out.push_str("<?xml version=\"");
    out.push_str(&decl.version);
    out.push('"');
    if let Some(encoding) = &decl.encoding {
        out.push_str(" encoding=\"");
        out.push_str(encoding);
        out.push('"');
    }
    if let Some(standalone) = &decl.standalone {
        out.push_str(" standalone=\"");
        out.push_str(standalone);
        out.push('"');
    }
    out.push_str("?>");
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let mut steps = vec![Step::Enter(id)];
    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(node) => match doc.kind(node) {
                NodeKind::Document => {
                    steps.extend(doc.children(node).iter().rev().map(|&c| Step::Enter(c)));
                }
                NodeKind::Element(el) => {
                    out.push('<');
                    out.push_str(&el.name.to_string());
                    for attr in &el.attributes {
                        out.push(' ');
                        out.push_str(&attr.name.to_string());
                        out.push_str("=\"");
                        out.push_str(&escape(attr.value.as_str()));
                        out.push('"');
                    }
                    let children = doc.children(node);
                    if children.is_empty() {
                        out.push_str("/>");
                    } else {
                        out.push('>');
                        steps.push(Step::Leave(node));
                        steps.extend(children.iter().rev().map(|&c| Step::Enter(c)));
                    }
                }
                NodeKind::Text(text) => out.push_str(&partial_escape(text.as_str())),
                NodeKind::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                NodeKind::CData(text) => {
                    out.push_str("<![CDATA[");
                    out.push_str(text);
                    out.push_str("]]>");
                }
                NodeKind::ProcessingInstruction(text) => {
                    out.push_str("<?");
                    out.push_str(text);
                    out.push_str("?>");
                }
                NodeKind::DocType(text) => {
                    out.push_str("<!DOCTYPE ");
                    out.push_str(text);
                    out.push('>');
                }
            },
            Step::Leave(node) => {
                if let Some(el) = doc.element(node) {
                    out.push_str("</");
                    out.push_str(&el.name.to_string());
                    out.push('>');
                }
            }
        }
    }
}
