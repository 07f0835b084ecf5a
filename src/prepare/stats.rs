//! Statistics collected while preparing a template.

use serde::{Deserialize, Serialize};

use super::merge::MergeOutcome;
use super::sections::SectionOutcome;

/// What the preparation pipeline changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareStats {
    /// Whitespace-only text nodes removed
    pub whitespace_removed: usize,

    /// Paragraphs scanned by the run merger
    pub paragraph_count: usize,

    /// Placeholder groups collapsed into one run
    pub placeholders_merged: usize,

    /// Runs removed while merging
    pub runs_removed: usize,

    /// Body paragraphs replaced by a section comment
    pub section_paragraphs: usize,

    /// Table rows replaced by a section comment
    pub section_rows: usize,

    /// Section tokens left in place because of their position
    pub sections_skipped: usize,

    /// Paragraphs ending with an open placeholder (lenient mode only)
    pub unbalanced_paragraphs: usize,
}

impl PrepareStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the outcome of one paragraph merge.
    pub fn add_merge(&mut self, outcome: &MergeOutcome) {
        self.paragraph_count += 1;
        self.placeholders_merged += outcome.groups_merged;
        self.runs_removed += outcome.runs_removed;
        if outcome.unbalanced.is_some() {
            self.unbalanced_paragraphs += 1;
        }
    }

    /// Fold in the section transform outcome.
    pub fn add_sections(&mut self, outcome: &SectionOutcome) {
        self.section_paragraphs += outcome.paragraphs_replaced;
        self.section_rows += outcome.rows_replaced;
        self.sections_skipped += outcome.skipped;
    }

    /// Total number of section comments emitted.
    pub fn sections_replaced(&self) -> usize {
        self.section_paragraphs + self.section_rows
    }
}
