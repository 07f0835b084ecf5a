//! # docxtmpl
//!
//! Mustache-style templating for Word documents (.docx).
//!
//! Authors write `{{NAME}}` placeholders and `{{#ITEMS}}…{{/ITEMS}}` sections
//! straight into a document. Word scatters such tokens across styled runs, so
//! the document part is first *prepared*: whitespace noise is dropped, split
//! placeholders are merged back into one run, and paragraphs (or table rows)
//! holding section tokens are replaced by comments. The prepared markup is then
//! rendered with a template engine and written back into a copy of the archive.
//!
//! ## Quick Start
//!
//! ```no_run
//! use serde_json::json;
//!
//! fn main() -> docxtmpl::Result<()> {
//!     let data = json!({ "NAME": "Alice", "ITEMS": [{ "item": "tea" }] });
//!     docxtmpl::render_file("letter.docx", &data, "letter-alice.docx")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Run merging**: placeholders split across runs are repaired
//! - **Structural sections**: sections repeat whole paragraphs or table rows
//! - **Raw repackaging**: untouched archive entries are copied byte for byte
//! - **Batch rendering**: one template, many data sets, on the Rayon pool

pub mod detect;
pub mod error;
pub mod model;
pub mod package;
pub mod prepare;
pub mod render;
pub mod xml;

// Re-export commonly used types
pub use detect::{detect_zip_from_bytes, detect_zip_from_path, is_docx, is_docx_bytes, ZipSignature};
pub use error::{Error, Result};
pub use package::DOCUMENT_PART;
pub use prepare::{
    ErrorMode, Placeholder, PlaceholderKind, PrepareOptions, PrepareStats, PreparedTemplate,
};
pub use render::{EscapeMode, HandlebarsRenderer, RenderOptions, TemplateRenderer};

use rayon::prelude::*;
use serde_json::Value;
use std::path::Path;

/// Prepare a document part given as a markup string.
///
/// # Example
///
/// ```
/// let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{{NA</w:t></w:r><w:r><w:t>ME}}</w:t></w:r></w:p></w:body></w:document>"#;
/// let prepared = docxtmpl::prepare_xml(xml).unwrap();
/// assert!(prepared.markup.contains("<w:t>{{NAME}}</w:t>"));
/// ```
pub fn prepare_xml(xml: &str) -> Result<PreparedTemplate> {
    prepare::prepare_markup(xml, &PrepareOptions::default())
}

/// Prepare a markup string with custom options.
pub fn prepare_xml_with_options(xml: &str, options: &PrepareOptions) -> Result<PreparedTemplate> {
    prepare::prepare_markup(xml, options)
}

/// Render a template file with default settings.
///
/// # Arguments
///
/// * `template_path` - Path to the .docx template
/// * `data` - Replacement data
/// * `output_path` - Where the rendered document is written
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
///
/// let stats = docxtmpl::render_file("in.docx", &json!({"NAME": "Bob"}), "out.docx").unwrap();
/// println!("merged {} placeholders", stats.placeholders_merged);
/// ```
pub fn render_file<P, Q>(template_path: P, data: &Value, output_path: Q) -> Result<PrepareStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Templater::new().render_file(template_path, data, output_path)
}

/// Render a template file with data read from a JSON file.
///
/// The template path is checked before the data file is read.
pub fn render_file_with_data_path<P, D, Q>(
    template_path: P,
    data_path: D,
    output_path: Q,
) -> Result<PrepareStats>
where
    P: AsRef<Path>,
    D: AsRef<Path>,
    Q: AsRef<Path>,
{
    let template_path = template_path.as_ref();
    if !template_path.exists() {
        return Err(Error::TemplateNotFound(template_path.to_path_buf()));
    }
    let data = load_data(data_path)?;
    render_file(template_path, &data, output_path)
}

/// Read replacement data from a JSON file.
pub fn load_data<P: AsRef<Path>>(path: P) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Builder for preparing and rendering docx templates.
///
/// # Example
///
/// ```no_run
/// use docxtmpl::Templater;
/// use serde_json::json;
///
/// let stats = Templater::new()
///     .lenient()
///     .strict_data()
///     .render_file("invoice.docx", &json!({"TOTAL": "42.00"}), "out.docx")?;
/// println!("{} sections", stats.sections_replaced());
/// # Ok::<(), docxtmpl::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Templater {
    prepare_options: PrepareOptions,
    render_options: RenderOptions,
    part_name: String,
    parallel: bool,
}

impl Templater {
    /// Create a new Templater builder.
    pub fn new() -> Self {
        Self {
            prepare_options: PrepareOptions::default(),
            render_options: RenderOptions::default(),
            part_name: DOCUMENT_PART.to_string(),
            parallel: true,
        }
    }

    /// Enable lenient preparation (unbalanced placeholders only warn).
    pub fn lenient(mut self) -> Self {
        self.prepare_options = self.prepare_options.lenient();
        self
    }

    /// Fail rendering when a placeholder has no value.
    pub fn strict_data(mut self) -> Self {
        self.render_options = self.render_options.with_strict_data(true);
        self
    }

    /// Set how substituted values are escaped.
    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.render_options = self.render_options.with_escape(escape);
        self
    }

    /// Set the archive part to template (defaults to `word/document.xml`).
    pub fn with_part(mut self, part_name: impl Into<String>) -> Self {
        self.part_name = part_name.into();
        self
    }

    /// Enable or disable `xml:space="preserve"` handling.
    pub fn with_preserve_space(mut self, preserve: bool) -> Self {
        self.prepare_options = self.prepare_options.with_preserve_space(preserve);
        self
    }

    /// Replace the preparation options.
    pub fn with_prepare_options(mut self, options: PrepareOptions) -> Self {
        self.prepare_options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Disable parallel batch rendering.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// The archive part this builder templates.
    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    /// A renderer configured from the render options.
    pub fn renderer(&self) -> HandlebarsRenderer {
        HandlebarsRenderer::new(&self.render_options)
    }

    /// Prepare the template part of an in-memory archive.
    pub fn prepare_bytes(&self, template: &[u8]) -> Result<PreparedTemplate> {
        let part = package::extract_part_from_bytes(template, &self.part_name)?;
        prepare::prepare_part(&part, &self.prepare_options)
    }

    /// Prepare the template part of an archive on disk.
    pub fn prepare_file<P: AsRef<Path>>(&self, path: P) -> Result<PreparedTemplate> {
        let template = package::read_template(path)?;
        self.prepare_bytes(&template)
    }

    /// Render an in-memory archive and return the new archive bytes.
    pub fn render_bytes(&self, template: &[u8], data: &Value) -> Result<Vec<u8>> {
        let prepared = self.prepare_bytes(template)?;
        self.render_prepared(template, &prepared, &self.renderer(), data)
    }

    /// Render a template file into `output_path`.
    ///
    /// Nothing is written when preparation or rendering fails.
    pub fn render_file<P, Q>(&self, template_path: P, data: &Value, output_path: Q) -> Result<PrepareStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let template = package::read_template(template_path)?;
        let prepared = self.prepare_bytes(&template)?;
        let bytes = self.render_prepared(&template, &prepared, &self.renderer(), data)?;
        package::write_output(output_path.as_ref(), &bytes)?;
        Ok(prepared.stats)
    }

    /// Render one template against many data sets.
    ///
    /// The template is prepared once. Outputs are returned in the order of
    /// `data`; the first failure aborts the batch.
    pub fn render_many(&self, template: &[u8], data: &[Value]) -> Result<Vec<Vec<u8>>> {
        let prepared = self.prepare_bytes(template)?;
        let renderer = self.renderer();
        let render_one = |item: &Value| self.render_prepared(template, &prepared, &renderer, item);

        if self.parallel {
            data.par_iter().map(render_one).collect()
        } else {
            data.iter().map(render_one).collect()
        }
    }

    /// Render an already prepared template and repackage it into `template`.
    pub fn render_prepared(
        &self,
        template: &[u8],
        prepared: &PreparedTemplate,
        renderer: &HandlebarsRenderer,
        data: &Value,
    ) -> Result<Vec<u8>> {
        let rendered = prepared.render(renderer, data)?;
        package::rewrite_archive_bytes(template, &self.part_name, rendered.as_bytes())
    }
}

impl Default for Templater {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templater_builder() {
        let templater = Templater::new().lenient().strict_data();

        assert!(matches!(
            templater.prepare_options.error_mode,
            ErrorMode::Lenient
        ));
        assert!(templater.render_options.strict_data);
    }

    #[test]
    fn test_templater_builder_default() {
        let builder = Templater::default();
        assert_eq!(builder.part_name(), DOCUMENT_PART);
        assert!(builder.parallel);
        assert!(matches!(builder.prepare_options.error_mode, ErrorMode::Strict));
        assert_eq!(builder.render_options.escape, EscapeMode::Xml);
    }

    #[test]
    fn test_templater_builder_chained() {
        let builder = Templater::new()
            .with_part("word/header1.xml")
            .with_escape(EscapeMode::Raw)
            .with_preserve_space(false)
            .sequential();

        assert_eq!(builder.part_name(), "word/header1.xml");
        assert_eq!(builder.render_options.escape, EscapeMode::Raw);
        assert!(!builder.prepare_options.preserve_space);
        assert!(!builder.parallel);
    }

    #[test]
    fn test_prepare_bytes_not_a_zip() {
        let result = Templater::new().prepare_bytes(b"not a docx");
        assert!(matches!(result, Err(Error::MalformedContainer(_))));
    }

    #[test]
    fn test_render_file_missing_template() {
        let result = render_file(
            "/no/such/template.docx",
            &serde_json::json!({}),
            "/tmp/never-written.docx",
        );
        assert!(matches!(result, Err(Error::TemplateNotFound(_))));
    }

    #[test]
    fn test_render_file_with_data_path_checks_template_first() {
        let result = render_file_with_data_path(
            "/no/such/template.docx",
            "/no/such/data.json",
            "/tmp/never-written.docx",
        );
        assert!(matches!(result, Err(Error::TemplateNotFound(_))));
    }

    #[test]
    fn test_prepare_xml_rejects_malformed_markup() {
        assert!(matches!(prepare_xml("<a><b></a>"), Err(Error::XmlParse(_))));
    }
}
