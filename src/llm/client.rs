//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Model caller seam - one call-and-wait completion per round
///
/// The session treats the model as a black box: it hands over the full
/// transcript and waits for the newest reply. No call for the same session is
/// issued before the prior reply has been parsed and applied, so the trait
/// deliberately has no streaming surface.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
