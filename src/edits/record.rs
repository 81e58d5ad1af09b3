//! EditRecord - one suggested change

use tracing::debug;

use super::{DIVIDER_FENCE, REPLACE_FENCE, SEARCH_FENCE};

/// A single suggested edit parsed from a model reply
///
/// All three fields are plain text. `search` is matched against the document
/// literally - no regex semantics, no normalization - so the model must
/// reproduce the resume text character for character, including whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    /// Exact text to find in the document
    pub search: String,

    /// Replacement text
    pub replace: String,

    /// Human-readable justification for the change
    pub reason: String,
}

impl EditRecord {
    /// Create a record from its three sections
    pub fn new(search: impl Into<String>, replace: impl Into<String>, reason: impl Into<String>) -> Self {
        let record = Self {
            search: search.into(),
            replace: replace.into(),
            reason: reason.into(),
        };
        debug!(
            search_len = %record.search.len(),
            replace_len = %record.replace.len(),
            "EditRecord::new: called"
        );
        record
    }

    /// Serialize back to the wire format
    ///
    /// Used when echoing a failed block back to the model so it can correct
    /// or re-propose it. Parsing the output yields an equal record.
    pub fn to_block(&self) -> String {
        debug!("EditRecord::to_block: called");
        format!(
            "{SEARCH_FENCE}\n{}\n{DIVIDER_FENCE}\n{}\n{REPLACE_FENCE}\n\n{}",
            self.search, self.replace, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edits::parse_blocks;

    #[test]
    fn test_to_block_wire_format() {
        let record = EditRecord::new("old line", "new line", "clearer wording");
        let block = record.to_block();

        assert_eq!(
            block,
            "<<<<<<< SEARCH\nold line\n=======\nnew line\n>>>>>>> REPLACE\n\nclearer wording"
        );
    }

    #[test]
    fn test_round_trip() {
        let record = EditRecord::new(
            "Built a map editor using React.",
            "Developed a collaborative map editor using React.",
            "Emphasizes collaboration.",
        );

        let parsed = parse_blocks(&record.to_block()).unwrap();
        assert_eq!(parsed, vec![record]);
    }

    #[test]
    fn test_round_trip_multiline_sections() {
        let record = EditRecord::new(
            "line one\nline two",
            "line one\nline two\nline three",
            "adds detail",
        );

        let parsed = parse_blocks(&record.to_block()).unwrap();
        assert_eq!(parsed, vec![record]);
    }
}
