//! Arena-backed markup tree.
//!
//! Nodes live in a single vector and are addressed by [`NodeId`]. Every node
//! owns the ordered list of its children's ids and knows its parent, so
//! structural edits (remove, replace) are splices on one child list instead
//! of pointer relinking. A detached node stays in the arena but can no longer
//! be reached from the root.

use super::name::{QName, Tag};

/// Stable index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name
    pub name: QName,
    /// Unescaped attribute value
    pub value: String,
}

/// Element payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified element name as written in the source
    pub name: QName,
    /// Namespace URI the prefix resolved to at parse time
    pub namespace: Option<String>,
    /// Attributes in source order, namespace declarations included
    pub attributes: Vec<Attribute>,
}

impl Element {
    /// Create an element without attributes.
    pub fn new(name: QName, namespace: Option<String>) -> Self {
        Self {
            name,
            namespace,
            attributes: Vec::new(),
        }
    }

    /// Check the element against a WordprocessingML tag.
    pub fn is(&self, tag: Tag) -> bool {
        tag.matches(self.namespace.as_deref(), &self.name.local)
    }

    /// Look up an attribute by its raw qualified name (e.g. `xml:space`).
    pub fn attribute(&self, raw_name: &str) -> Option<&str> {
        let wanted = QName::parse(raw_name);
        self.attributes
            .iter()
            .find(|a| a.name == wanted)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing value.
    pub fn set_attribute(&mut self, raw_name: &str, value: impl Into<String>) {
        let name = QName::parse(raw_name);
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The arena root; holds the prolog and the root element
    Document,
    /// An element
    Element(Element),
    /// Character data (unescaped)
    Text(String),
    /// A comment, content stored verbatim
    Comment(String),
    /// A CDATA section
    CData(String),
    /// A processing instruction, content between `<?` and `?>`
    ProcessingInstruction(String),
    /// A doctype declaration, content between `<!DOCTYPE` and `>`
    DocType(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The `<?xml ...?>` declaration of a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    /// XML version
    pub version: String,
    /// Declared encoding
    pub encoding: Option<String>,
    /// Standalone flag
    pub standalone: Option<String>,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: Some("yes".to_string()),
        }
    }
}

/// A parsed markup document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    declaration: Option<XmlDeclaration>,
}

impl Document {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            declaration: None,
        }
    }

    /// The arena root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The document element (first element child of the root).
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|&id| self.element(id).is_some())
    }

    /// The XML declaration, if the source had one.
    pub fn declaration(&self) -> Option<&XmlDeclaration> {
        self.declaration.as_ref()
    }

    /// Set or clear the XML declaration.
    pub fn set_declaration(&mut self, declaration: Option<XmlDeclaration>) {
        self.declaration = declaration;
    }

    /// Total number of nodes in the arena, detached ones included.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    /// Element payload, if the node is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Value of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Value of a comment node.
    pub fn comment(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Comment(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the node is an element with the given tag.
    pub fn is(&self, id: NodeId, tag: Tag) -> bool {
        self.element(id).is_some_and(|el| el.is(tag))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn create_element(&mut self, name: QName, namespace: Option<String>) -> NodeId {
        self.create(NodeKind::Element(Element::new(name, namespace)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Comment(text.into()))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Unlink a node from its parent. Returns false if it was already detached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        true
    }

    /// Put `replacement` at the position of `old` in its parent's child list.
    ///
    /// `old` ends up detached. Returns false (and changes nothing) when `old`
    /// has no parent.
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) -> bool {
        let Some(parent) = self.nodes[old.0].parent else {
            return false;
        };
        self.detach(replacement);
        let Some(pos) = self.nodes[parent.0].children.iter().position(|&c| c == old) else {
            return false;
        };
        self.nodes[parent.0].children[pos] = replacement;
        self.nodes[replacement.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        true
    }

    /// Keep only the children of `parent` accepted by `keep`.
    ///
    /// Returns the number of children removed.
    pub fn retain_children<F>(&mut self, parent: NodeId, mut keep: F) -> usize
    where
        F: FnMut(&NodeKind) -> bool,
    {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        let mut kept = Vec::with_capacity(children.len());
        let mut removed = 0;
        for child in children {
            if keep(&self.nodes[child.0].kind) {
                kept.push(child);
            } else {
                self.nodes[child.0].parent = None;
                removed += 1;
            }
        }
        self.nodes[parent.0].children = kept;
        removed
    }

    /// Pre-order traversal of the nodes below `id` (not including `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Whether the node can still be reached from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root();
        let mut current = id;
        loop {
            if current == root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Concatenated character data below a node.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            match self.kind(node) {
                NodeKind::Text(text) | NodeKind::CData(text) => out.push_str(text),
                _ => {}
            }
        }
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
