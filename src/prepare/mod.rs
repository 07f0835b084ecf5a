//! Template preparation: turns a WordprocessingML part into markup the
//! template engine can render.
//!
//! The pipeline runs in a fixed order on a freshly parsed tree:
//!
//! 1. [`normalize_whitespace`] drops pretty-printing text nodes,
//! 2. [`merge_paragraph`] repairs placeholders split across runs,
//! 3. [`transform_sections`] replaces section-bearing paragraphs and rows
//!    with comments,
//!
//! and the tree is serialized (and optionally re-parsed as a sanity check).

mod merge;
mod options;
mod sections;
mod stats;
pub mod token;
mod whitespace;

pub use merge::{merge_paragraph, MergeOutcome};
pub use options::{ErrorMode, PrepareOptions};
pub use sections::{placement, transform_sections, Placement, SectionOutcome};
pub use stats::PrepareStats;
pub use token::{find_placeholders, unmatched_sections, Placeholder, PlaceholderKind};
pub use whitespace::normalize_whitespace;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{Document, NodeId, Tag};
use crate::render::TemplateRenderer;
use crate::xml;

/// Markup ready for the template engine, plus what preparation changed.
#[derive(Debug, Clone)]
pub struct PreparedTemplate {
    /// Serialized, well-formed markup with unbroken placeholder tokens
    pub markup: String,

    /// Preparation statistics
    pub stats: PrepareStats,
}

impl PreparedTemplate {
    /// Placeholders present in the prepared markup, in order.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        find_placeholders(&self.markup)
    }

    /// Section tokens without a partner.
    pub fn unmatched_sections(&self) -> Vec<Placeholder> {
        unmatched_sections(&self.placeholders())
    }

    /// Render the markup with the given engine and data.
    pub fn render<R>(&self, renderer: &R, data: &Value) -> Result<String>
    where
        R: TemplateRenderer + ?Sized,
    {
        renderer.render(&self.markup, data)
    }
}

/// Run the preparation stages on a parsed document, in place.
pub fn prepare_document(doc: &mut Document, options: &PrepareOptions) -> Result<PrepareStats> {
    let mut stats = PrepareStats::new();
    let root = doc.root();

    stats.whitespace_removed = normalize_whitespace(doc, root, options.preserve_space);

    let paragraphs: Vec<NodeId> = doc
        .descendants(root)
        .filter(|&id| doc.is(id, Tag::Paragraph))
        .collect();

    for (index, paragraph) in paragraphs.into_iter().enumerate() {
        let outcome = merge_paragraph(doc, paragraph);
        if let Some(text) = &outcome.unbalanced {
            match options.error_mode {
                ErrorMode::Strict => {
                    return Err(Error::UnbalancedPlaceholder {
                        paragraph: index,
                        text: text.clone(),
                    })
                }
                ErrorMode::Lenient => {
                    log::warn!(
                        "Paragraph {} ends inside a placeholder, runs left unmerged: {:?}",
                        index,
                        text
                    );
                }
            }
        }
        stats.add_merge(&outcome);
    }
    log::debug!(
        "Merged {} placeholders across {} paragraphs",
        stats.placeholders_merged,
        stats.paragraph_count
    );

    let sections = transform_sections(doc);
    stats.add_sections(&sections);

    Ok(stats)
}

/// Parse, prepare and serialize a markup string.
pub fn prepare_markup(xml_text: &str, options: &PrepareOptions) -> Result<PreparedTemplate> {
    let mut doc = xml::parse(xml_text)?;
    let stats = prepare_document(&mut doc, options)?;
    let markup = xml::serialize(&doc);

    if options.verify_output {
        xml::parse(&markup).map_err(|e| match e {
            Error::XmlParse(msg) => {
                Error::XmlParse(format!("prepared template is not well-formed: {}", msg))
            }
            other => other,
        })?;
    }

    Ok(PreparedTemplate { markup, stats })
}

/// Prepare the raw bytes of a document part.
pub fn prepare_part(bytes: &[u8], options: &PrepareOptions) -> Result<PreparedTemplate> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))?;
    prepare_markup(text, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;
    const TAIL: &str = "</w:body></w:document>";

    fn wrap(body: &str) -> String {
        format!("{}{}{}", HEAD, body, TAIL)
    }

    #[test]
    fn test_prepare_merges_and_rewrites() {
        let xml = wrap(
            "<w:p><w:r><w:t>{{#</w:t></w:r><w:r><w:t>ITEMS}}</w:t></w:r></w:p>\
             <w:p><w:r><w:t>{{NA</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>ME}}</w:t></w:r></w:p>\
             <w:p><w:r><w:t>{{/ITEMS}}</w:t></w:r></w:p>",
        );
        let prepared = prepare_markup(&xml, &PrepareOptions::default()).unwrap();

        assert_eq!(
            prepared.markup,
            wrap(
                "<!--{{#ITEMS}}-->\
                 <w:p><w:r><w:rPr><w:b/></w:rPr><w:t>{{NAME}}</w:t></w:r></w:p>\
                 <!--{{/ITEMS}}-->"
            )
        );
        assert_eq!(prepared.stats.placeholders_merged, 2);
        assert_eq!(prepared.stats.section_paragraphs, 2);
        assert!(prepared.unmatched_sections().is_empty());
    }

    #[test]
    fn test_strict_mode_rejects_unbalanced() {
        let xml = wrap("<w:p><w:r><w:t>{{NAME</w:t></w:r></w:p>");
        let err = prepare_markup(&xml, &PrepareOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnbalancedPlaceholder { paragraph: 0, .. }
        ));
    }

    #[test]
    fn test_lenient_mode_passes_through() {
        let xml = wrap("<w:p><w:r><w:t>{{NAME</w:t></w:r><w:r><w:t> end</w:t></w:r></w:p>");
        let prepared = prepare_markup(&xml, &PrepareOptions::new().lenient()).unwrap();
        assert_eq!(prepared.markup, xml);
        assert_eq!(prepared.stats.unbalanced_paragraphs, 1);
    }

    #[test]
    fn test_prepare_part_rejects_invalid_utf8() {
        let err = prepare_part(&[0x3c, 0xff, 0xfe], &PrepareOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
