//! Template preparation options.

/// Options for turning a document part into a renderable template.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// What to do with placeholders still open at the end of a paragraph
    pub error_mode: ErrorMode,

    /// Keep whitespace-only text inside `xml:space="preserve"` scopes
    pub preserve_space: bool,

    /// Re-parse the prepared markup to check it is still well-formed
    pub verify_output: bool,
}

impl PrepareOptions {
    /// Create new prepare options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (warn about unbalanced placeholders and continue).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable strict mode (fail on unbalanced placeholders).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable `xml:space="preserve"` handling.
    pub fn with_preserve_space(mut self, preserve: bool) -> Self {
        self.preserve_space = preserve;
        self
    }

    /// Enable or disable output verification.
    pub fn with_verify_output(mut self, verify: bool) -> Self {
        self.verify_output = verify;
        self
    }
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            preserve_space: true,
            verify_output: true,
        }
    }
}

/// Handling of placeholders whose braces never balance within a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail with [`crate::Error::UnbalancedPlaceholder`]
    #[default]
    Strict,
    /// Log a warning and leave the runs untouched
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_options_builder() {
        let options = PrepareOptions::new()
            .lenient()
            .with_preserve_space(false)
            .with_verify_output(false);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.preserve_space);
        assert!(!options.verify_output);
    }

    #[test]
    fn test_default_options() {
        let options = PrepareOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.preserve_space);
        assert!(options.verify_output);
    }
}
