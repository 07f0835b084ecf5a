//! Qualified names and the WordprocessingML tags the pipeline cares about.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main WordprocessingML namespace.
pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A possibly prefixed element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QName {
    /// Namespace prefix, if any
    pub prefix: Option<String>,
    /// Local part of the name
    pub local: String,
}

impl QName {
    /// Create a name without prefix.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// Create a prefixed name.
    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// Split a raw `prefix:local` name.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) => Self::prefixed(prefix, local),
            None => Self::local(raw),
        }
    }

    /// Whether this is a namespace declaration attribute (`xmlns` or `xmlns:p`).
    pub fn is_xmlns(&self) -> bool {
        match &self.prefix {
            Some(p) => p == "xmlns",
            None => self.local == "xmlns",
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// WordprocessingML elements with structural meaning for templating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `w:body`
    Body,
    /// `w:p`
    Paragraph,
    /// `w:r`
    Run,
    /// `w:t`
    Text,
    /// `w:tbl`
    Table,
    /// `w:tr`
    Row,
    /// `w:tc`
    Cell,
}

impl Tag {
    /// Local name of the tag inside the WordprocessingML namespace.
    pub fn local_name(self) -> &'static str {
        match self {
            Tag::Body => "body",
            Tag::Paragraph => "p",
            Tag::Run => "r",
            Tag::Text => "t",
            Tag::Table => "tbl",
            Tag::Row => "tr",
            Tag::Cell => "tc",
        }
    }

    /// Check a resolved (namespace, local name) pair against this tag.
    pub fn matches(self, namespace: Option<&str>, local: &str) -> bool {
        namespace == Some(WORDML_NS) && local == self.local_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_parse() {
        let name = QName::parse("w:p");
        assert_eq!(name.prefix.as_deref(), Some("w"));
        assert_eq!(name.local, "p");
        assert_eq!(name.to_string(), "w:p");

        let name = QName::parse("document");
        assert!(name.prefix.is_none());
        assert_eq!(name.to_string(), "document");
    }

    #[test]
    fn test_xmlns_detection() {
        assert!(QName::parse("xmlns").is_xmlns());
        assert!(QName::parse("xmlns:w").is_xmlns());
        assert!(!QName::parse("w:val").is_xmlns());
    }

    #[test]
    fn test_tag_matches_namespace_not_prefix() {
        assert!(Tag::Paragraph.matches(Some(WORDML_NS), "p"));
        assert!(!Tag::Paragraph.matches(Some("urn:other"), "p"));
        assert!(!Tag::Paragraph.matches(None, "p"));
        assert!(!Tag::Row.matches(Some(WORDML_NS), "tc"));
    }
}
