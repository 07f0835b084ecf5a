//! Rendering options and configuration.

/// Options for filling a prepared template with data.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Fail when a placeholder has no value in the data
    pub strict_data: bool,

    /// How substituted values are escaped
    pub escape: EscapeMode,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable strict data lookups.
    pub fn with_strict_data(mut self, strict: bool) -> Self {
        self.strict_data = strict;
        self
    }

    /// Set the escape mode.
    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    /// Insert values verbatim.
    pub fn raw(mut self) -> Self {
        self.escape = EscapeMode::Raw;
        self
    }
}

/// Escaping applied to substituted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// Escape XML special characters so values stay text
    #[default]
    Xml,
    /// Insert values as they are (values may carry markup)
    Raw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert!(!options.strict_data);
        assert_eq!(options.escape, EscapeMode::Xml);
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new().with_strict_data(true).raw();
        assert!(options.strict_data);
        assert_eq!(options.escape, EscapeMode::Raw);
    }
}
