//! Repair of placeholders split across runs.
//!
//! Word processors split text into runs at every formatting, spelling or
//! revision boundary, so `{{NAME}}` often ends up stored as
//! `<w:r><w:t>{{NA</w:t></w:r><w:r><w:t>ME}}</w:t></w:r>`. The template
//! engine only sees tokens that sit inside one text node, so runs are merged
//! until the braces balance again.

use crate::model::{paragraph_runs, run_text, set_run_text, Document, NodeId};

use super::token::brace_delta;

/// What happened while merging one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Number of run groups collapsed into a single run
    pub groups_merged: usize,

    /// Number of runs removed from the paragraph
    pub runs_removed: usize,

    /// Text of the trailing runs whose braces never balanced
    pub unbalanced: Option<String>,
}

/// Merge runs of `paragraph` so every balanced placeholder lives in one run.
///
/// The last run of a merged group receives the joined text and keeps its
/// formatting; the other runs of the group are removed. Runs without text
/// are skipped and stay where they are. A group still open when the runs run
/// out is left untouched and reported in [`MergeOutcome::unbalanced`].
pub fn merge_paragraph(doc: &mut Document, paragraph: NodeId) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    let mut balance: i64 = 0;
    let mut buffer = String::new();
    let mut pending: Vec<NodeId> = Vec::new();

    for run in paragraph_runs(doc, paragraph) {
        let Some(text) = run_text(doc, run) else {
            continue;
        };

        balance += brace_delta(&text);
        buffer.push_str(&text);

        if balance != 0 {
            pending.push(run);
            continue;
        }

        if !pending.is_empty() {
            set_run_text(doc, run, &buffer);
            for merged in pending.drain(..) {
                doc.detach(merged);
                outcome.runs_removed += 1;
            }
            outcome.groups_merged += 1;
        }
        buffer.clear();
    }

    if !pending.is_empty() {
        outcome.unbalanced = Some(buffer);
    }
    outcome
}
