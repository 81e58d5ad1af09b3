//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

/// Career-advisor system prompt; takes `format_instructions` as a template variable
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// SEARCH/REPLACE format instructions appended to the system prompt
pub const FORMAT: &str = include_str!("../../prompts/format.pmt");
