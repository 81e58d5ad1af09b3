//! Edit executor - applies records to a document

use thiserror::Error;
use tracing::{debug, warn};

use super::EditRecord;

/// Errors raised while applying one edit to a document
///
/// Both are recoverable by asking the model for a corrected block.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// The search text does not occur in the document
    #[error("the search text was not found; it must match the document exactly, including whitespace")]
    NoReplacement,

    /// The search text occurs more than once, so the edit is ambiguous
    #[error("the search text was found {count} times; add surrounding context so it matches exactly once")]
    MultipleReplacements { count: usize },
}

/// One edit that could not be applied, with the record that caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEdit {
    pub record: EditRecord,
    pub error: ApplyError,
}

/// Result of applying a batch of edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// The document after every edit that applied cleanly
    pub document: String,

    /// Edits that did not apply, in batch order
    pub failures: Vec<FailedEdit>,
}

/// Apply a single edit record to a document
///
/// Matching is literal, case-sensitive, and whitespace-sensitive substring
/// matching. Occurrences are counted as non-overlapping matches in a
/// left-to-right scan (`str::matches`); the edit applies only when the count
/// is exactly one. An empty search string counts one match per character
/// boundary, so it is rejected as ambiguous on any non-empty document.
pub fn apply(record: &EditRecord, document: &str) -> Result<String, ApplyError> {
    let count = document.matches(record.search.as_str()).count();
    debug!(%count, search_len = %record.search.len(), "apply: occurrence count");

    match count {
        0 => Err(ApplyError::NoReplacement),
        1 => Ok(document.replacen(record.search.as_str(), &record.replace, 1)),
        count => Err(ApplyError::MultipleReplacements { count }),
    }
}

/// Apply a batch of edits in order against the progressively updated document
///
/// Each successful edit's output feeds the next edit's input. A failing edit
/// is recorded and the batch continues from the last good document state, so
/// one bad block never discards the rest of the batch. The caller reports the
/// collected failures back to the model.
pub fn apply_all(records: Vec<EditRecord>, document: &str) -> BatchOutcome {
    debug!(record_count = %records.len(), "apply_all: called");

    let mut document = document.to_string();
    let mut failures = Vec::new();

    for record in records {
        match apply(&record, &document) {
            Ok(updated) => document = updated,
            Err(error) => {
                warn!(%error, "apply_all: edit failed, continuing with remaining edits");
                failures.push(FailedEdit { record, error });
            }
        }
    }

    debug!(failure_count = %failures.len(), "apply_all: done");
    BatchOutcome { document, failures }
}
