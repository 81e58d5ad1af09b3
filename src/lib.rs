//! resumeloop - LLM-assisted resume rewriting
//!
//! Converses with a language model about a resume and applies the model's
//! suggested edits as literal text substitutions. Suggestions travel as
//! SEARCH/REPLACE blocks; malformed replies and edits that fail to apply are
//! fed back to the model as corrective messages, bounded by a shared retry
//! budget.
//!
//! # Modules
//!
//! - [`edits`] - SEARCH/REPLACE block parser and edit executor
//! - [`session`] - the bounded reflection loop
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`prompts`] - embedded prompt templates and message assembly
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//! - [`console`] - colorized conversation output

pub mod cli;
pub mod config;
pub mod console;
pub mod edits;
pub mod llm;
pub mod prompts;
pub mod session;

// Re-export commonly used types
pub use config::{Config, LlmConfig, SessionConfig};
pub use edits::{ApplyError, BatchOutcome, EditRecord, FailedEdit, ParseError, apply, apply_all, parse_blocks};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Message, OpenAIClient, Role, create_client};
pub use session::{Session, SessionError, SessionState};
