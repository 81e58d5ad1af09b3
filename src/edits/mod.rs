//! SEARCH/REPLACE suggestion protocol
//!
//! The wire format between the model and this program. A suggestion is a
//! three-part block: the exact text to find, the text to substitute, and a
//! free-form reason, separated by fixed fence lines:
//!
//! ```text
//! <<<<<<< SEARCH
//! exact lines to find
//! =======
//! lines to substitute
//! >>>>>>> REPLACE
//!
//! reason for the change
//! ```
//!
//! [`parse_blocks`] turns a raw reply into [`EditRecord`]s, [`apply`] executes
//! one record against a document, and [`apply_all`] runs a whole batch with
//! continue-and-collect failure semantics.

mod apply;
mod parser;
mod record;

pub use apply::{ApplyError, BatchOutcome, FailedEdit, apply, apply_all};
pub use parser::{ParseError, parse_blocks};
pub use record::EditRecord;

/// Fence line opening the search section of a block
pub const SEARCH_FENCE: &str = "<<<<<<< SEARCH";

/// Fence line dividing the search section from the replacement section
pub const DIVIDER_FENCE: &str = "=======";

/// Fence line closing the replacement section
pub const REPLACE_FENCE: &str = ">>>>>>> REPLACE";
