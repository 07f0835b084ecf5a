//! Template rendering: fills prepared markup with replacement data.

mod options;
mod section;

pub use options::{EscapeMode, RenderOptions};

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::Result;
use section::{SectionHelper, BLOCK_HELPER_MISSING};

/// A template engine that substitutes placeholders and expands sections.
pub trait TemplateRenderer {
    /// Render `template` against `data`.
    fn render(&self, template: &str, data: &Value) -> Result<String>;
}

/// Mustache-style renderer backed by handlebars.
///
/// `{{name}}` is replaced by the value of `name`; `{{#name}}…{{/name}}`
/// repeats its body for each element of a list, or renders it once for a
/// truthy value. Names not found inside a section are looked up in the
/// enclosing data, as mustache does.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Create a renderer configured by `options`.
    pub fn new(options: &RenderOptions) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(options.strict_data);
        registry.set_recursive_lookup(true);
        registry.register_helper(BLOCK_HELPER_MISSING, Box::new(SectionHelper));
        match options.escape {
            EscapeMode::Xml => {
                registry.register_escape_fn(|s| quick_xml::escape::escape(s).into_owned())
            }
            EscapeMode::Raw => registry.register_escape_fn(handlebars::no_escape),
        }
        Self { registry }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new(&RenderOptions::default())
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String> {
        Ok(self.registry.render_template(template, data)?)
    }
}

/// Render a template string with a one-off renderer.
pub fn render_template(template: &str, data: &Value, options: &RenderOptions) -> Result<String> {
    HandlebarsRenderer::new(options).render(template, data)
}
