//! Block parser - strict line scanner for SEARCH/REPLACE replies

use thiserror::Error;
use tracing::debug;

use super::{DIVIDER_FENCE, EditRecord, REPLACE_FENCE, SEARCH_FENCE};

/// Errors raised while parsing a model reply into edit records
///
/// Both variants are recoverable by asking the model to try again; the
/// structured fields let callers build their own corrective text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A fence line appeared in a state where it is not legal
    #[error("expected `{expected}` but found `{found}`")]
    UnexpectedFence {
        expected: &'static str,
        found: &'static str,
    },

    /// Input ended mid-block, or contained no block at all
    #[error("unexpected end of input, expected `{expected}`")]
    UnexpectedEndOfInput { expected: &'static str },
}

/// Where the parser currently is inside one block
///
/// Exactly one state is active at a time; the state determines which single
/// fence line is legal next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Outside any block, waiting for an opener; non-fence lines are prose
    /// and are discarded
    AwaitingSearch,
    /// Inside the search section
    InSearch,
    /// Inside the replacement section
    InReplace,
    /// Inside the reason text following a closed block
    InReason,
}

impl ParseState {
    /// The one fence line that is legal in this state
    fn expected_fence(self) -> &'static str {
        match self {
            ParseState::AwaitingSearch | ParseState::InReason => SEARCH_FENCE,
            ParseState::InSearch => DIVIDER_FENCE,
            ParseState::InReplace => REPLACE_FENCE,
        }
    }
}

/// Classify a line as one of the three fences, if it is one
///
/// Fences must match exactly apart from trailing whitespace. A fence with
/// leading content is not a fence; it counts as section text.
fn fence_of(line: &str) -> Option<&'static str> {
    match line.trim_end() {
        SEARCH_FENCE => Some(SEARCH_FENCE),
        DIVIDER_FENCE => Some(DIVIDER_FENCE),
        REPLACE_FENCE => Some(REPLACE_FENCE),
        _ => None,
    }
}

fn push_line(buffer: &mut String, line: &str) {
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(line);
}

fn flush(search: &mut String, replace: &mut String, reason: &mut String) -> EditRecord {
    let record = EditRecord::new(search.trim(), replace.trim(), reason.trim());
    search.clear();
    replace.clear();
    reason.clear();
    record
}

/// Parse a model reply into an ordered sequence of edit records
///
/// Single pass over the input lines, one block fully resolved before the
/// next begins. Section contents are trimmed of leading/trailing whitespace
/// when a block is assembled. Prose outside blocks is discarded, but a bare
/// fence line is validated wherever it appears.
pub fn parse_blocks(text: &str) -> Result<Vec<EditRecord>, ParseError> {
    debug!(text_len = %text.len(), "parse_blocks: called");

    let mut state = ParseState::AwaitingSearch;
    let mut search = String::new();
    let mut replace = String::new();
    let mut reason = String::new();
    let mut records = Vec::new();

    for line in text.lines() {
        match fence_of(line) {
            Some(SEARCH_FENCE) => match state {
                ParseState::AwaitingSearch => {
                    debug!("parse_blocks: opening first block");
                    state = ParseState::InSearch;
                }
                ParseState::InReason => {
                    debug!("parse_blocks: flushing completed block, opening next");
                    records.push(flush(&mut search, &mut replace, &mut reason));
                    state = ParseState::InSearch;
                }
                _ => {
                    return Err(ParseError::UnexpectedFence {
                        expected: state.expected_fence(),
                        found: SEARCH_FENCE,
                    });
                }
            },
            Some(DIVIDER_FENCE) => match state {
                ParseState::InSearch => {
                    debug!("parse_blocks: entering replacement section");
                    state = ParseState::InReplace;
                }
                _ => {
                    return Err(ParseError::UnexpectedFence {
                        expected: state.expected_fence(),
                        found: DIVIDER_FENCE,
                    });
                }
            },
            Some(fence) => match state {
                // only REPLACE_FENCE reaches this arm
                ParseState::InReplace => {
                    debug!("parse_blocks: block closed, entering reason section");
                    state = ParseState::InReason;
                }
                _ => {
                    return Err(ParseError::UnexpectedFence {
                        expected: state.expected_fence(),
                        found: fence,
                    });
                }
            },
            None => match state {
                // Prose outside any block is not part of the output
                ParseState::AwaitingSearch => {}
                ParseState::InSearch => push_line(&mut search, line),
                ParseState::InReplace => push_line(&mut replace, line),
                ParseState::InReason => push_line(&mut reason, line),
            },
        }
    }

    match state {
        ParseState::InReason => {
            records.push(flush(&mut search, &mut replace, &mut reason));
            debug!(record_count = %records.len(), "parse_blocks: done");
            Ok(records)
        }
        _ => Err(ParseError::UnexpectedEndOfInput {
            expected: state.expected_fence(),
        }),
    }
}
