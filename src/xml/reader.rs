//! Markup parsing into the arena tree using quick-xml.

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{Attribute, Document, Element, NodeId, NodeKind, QName, XmlDeclaration, XML_NS};

/// Parse a markup string into a [`Document`].
///
/// Whitespace text is kept as-is; stripping insignificant whitespace is the
/// normalizer's job. Namespaces are resolved while parsing so later stages can
/// match elements by namespace URI regardless of the prefix in use.
pub fn parse(xml: &str) -> Result<Document> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    let mut doc = Document::new();
    let mut open: Vec<NodeId> = vec![doc.root()];
    let mut scopes = NamespaceScopes::default();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(Error::XmlParse(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        };

        let parent = *open.last().unwrap_or(&doc.root());
        match event {
            Event::Start(start) => {
                let element = build_element(&start, &mut scopes)?;
                let id = doc.create(NodeKind::Element(element));
                doc.append_child(parent, id);
                open.push(id);
            }
            Event::Empty(start) => {
                let element = build_element(&start, &mut scopes)?;
                scopes.pop();
                let id = doc.create(NodeKind::Element(element));
                doc.append_child(parent, id);
            }
            Event::End(_) => {
                if open.len() <= 1 {
                    return Err(Error::XmlParse(format!(
                        "unexpected closing tag at position {}",
                        reader.buffer_position()
                    )));
                }
                open.pop();
                scopes.pop();
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(xml_error)?;
                let id = doc.create_text(value.into_owned());
                doc.append_child(parent, id);
            }
            Event::CData(data) => {
                let value = lossy(data.into_inner());
                let id = doc.create(NodeKind::CData(value));
                doc.append_child(parent, id);
            }
            Event::Comment(comment) => {
                let value = lossy(comment.into_inner());
                let id = doc.create_comment(value);
                doc.append_child(parent, id);
            }
            Event::Decl(decl) => {
                doc.set_declaration(Some(read_declaration(&decl)?));
            }
            Event::PI(pi) => {
                let id = doc.create(NodeKind::ProcessingInstruction(
                    String::from_utf8_lossy(&pi).into_owned(),
                ));
                doc.append_child(parent, id);
            }
            Event::DocType(doctype) => {
                let id = doc.create(NodeKind::DocType(
                    String::from_utf8_lossy(&doctype).trim().to_string(),
                ));
                doc.append_child(parent, id);
            }
            Event::Eof => break,
        }
    }

    if open.len() > 1 {
        return Err(Error::XmlParse(format!(
            "{} unclosed element(s) at end of input",
            open.len() - 1
        )));
    }
    if doc.root_element().is_none() {
        return Err(Error::XmlParse("document has no root element".into()));
    }

    log::debug!("Parsed markup into {} nodes", doc.arena_len());
    Ok(doc)
}

fn build_element(start: &BytesStart<'_>, scopes: &mut NamespaceScopes) -> Result<Element> {
    let qname = start.name();
    let raw_name = std::str::from_utf8(qname.as_ref()).map_err(xml_error)?;
    let name = QName::parse(raw_name);

    let mut attributes = Vec::new();
    let mut bindings = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(xml_error)?;
        let value = attr.unescape_value().map_err(xml_error)?.into_owned();
        let attr_name = QName::parse(key);
        if attr_name.is_xmlns() {
            let bound = match attr_name.prefix {
                Some(_) => Some(attr_name.local.clone()),
                None => None,
            };
            bindings.push((bound, value.clone()));
        }
        attributes.push(Attribute {
            name: attr_name,
            value,
        });
    }

    scopes.push(bindings);
    let namespace = scopes.resolve(name.prefix.as_deref());
    Ok(Element {
        name,
        namespace,
        attributes,
    })
}

fn read_declaration(decl: &BytesDecl<'_>) -> Result<XmlDeclaration> {
    let version = lossy(decl.version().map_err(xml_error)?);
    let encoding = match decl.encoding() {
        Some(value) => Some(lossy(value.map_err(xml_error)?)),
        None => None,
    };
    let standalone = match decl.standalone() {
        Some(value) => Some(lossy(value.map_err(xml_error)?)),
        None => None,
    };
    Ok(XmlDeclaration {
        version,
        encoding,
        standalone,
    })
}

fn lossy(bytes: Cow<'_, [u8]>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

fn xml_error(err: impl std::fmt::Display) -> Error {
    Error::XmlParse(err.to_string())
}

/// In-scope namespace bindings, one frame per open element.
#[derive(Default)]
struct NamespaceScopes {
    frames: Vec<Vec<(Option<String>, String)>>,
}

impl NamespaceScopes {
    fn push(&mut self, bindings: Vec<(Option<String>, String)>) {
        self.frames.push(bindings);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    fn resolve(&self, prefix: Option<&str>) -> Option<String> {
        if prefix == Some("xml") {
            return Some(XML_NS.to_string());
        }
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(bound, _)| bound.as_deref() == prefix)
            .map(|(_, uri)| uri.clone())
            .filter(|uri| !uri.is_empty())
    }
}
