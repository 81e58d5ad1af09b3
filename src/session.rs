//! Reflection session - bounded retry loop around the model
//!
//! One session owns one document, one transcript, and one retry budget. Each
//! round sends the pending messages, parses the reply into edit records, and
//! applies them; parse errors and failed edits become corrective system
//! messages for the next round. Format failures and application failures
//! share the same budget, so total model round-trips are capped in one place.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::console::Console;
use crate::edits::{self, FailedEdit, ParseError};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};

/// Where the session currently is in its round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// About to spend one budget unit and contact the model
    AwaitingModelReply,
    /// Running the block parser on the newest reply
    ParsingReply,
    /// Running the edit batch against the document
    ApplyingEdits,
    /// Terminal: the document was fully edited
    Done,
    /// Terminal: the session gave up
    Failed,
}

/// Fatal session outcomes
///
/// Recoverable failures (bad format, edits that don't apply) never surface
/// here; they are converted into corrective transcript entries while budget
/// remains. Only conditions no corrective prompt can fix escape.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The retry budget ran out before every edit applied cleanly
    #[error("out of attempts: retry budget of {budget} model requests exhausted")]
    OutOfAttempts { budget: u32 },

    /// The model returned an empty reply; there is nothing to correct
    #[error("model returned an empty reply")]
    EmptyReply,

    /// The model caller itself failed
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// One resume-editing session
pub struct Session {
    llm: Arc<dyn LlmClient>,
    console: Console,
    transcript: Vec<Message>,
    budget: u32,
    remaining_requests: u32,
    max_tokens: u32,
    state: SessionState,
    rounds: u32,
}

impl Session {
    /// Create a session with a fresh transcript and a full budget
    pub fn new(llm: Arc<dyn LlmClient>, console: Console, max_requests: u32, max_tokens: u32) -> Self {
        debug!(%max_requests, %max_tokens, "Session::new: called");
        Self {
            llm,
            console,
            transcript: Vec::new(),
            budget: max_requests,
            remaining_requests: max_requests,
            max_tokens,
            state: SessionState::AwaitingModelReply,
            rounds: 0,
        }
    }

    /// Current state (terminal after `run` returns)
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Model round-trips consumed so far
    pub fn rounds_used(&self) -> u32 {
        self.rounds
    }

    /// Full conversation so far, oldest message first
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Run the reflection loop to completion
    ///
    /// Returns the fully edited document, or the fatal error that ended the
    /// session. The caller supplies the document and the initial message set
    /// (system prompt, examples, resume, change request).
    pub async fn run(&mut self, document: &str, initial: Vec<Message>) -> Result<String, SessionError> {
        let mut document = document.to_string();
        let mut pending = initial;

        loop {
            self.state = SessionState::AwaitingModelReply;
            if self.remaining_requests == 0 {
                warn!(budget = %self.budget, "run: retry budget exhausted");
                self.state = SessionState::Failed;
                return Err(SessionError::OutOfAttempts { budget: self.budget });
            }
            self.remaining_requests -= 1;
            self.rounds += 1;

            let reply = match self.exchange(pending).await {
                Ok(reply) => reply,
                Err(error) => {
                    self.state = SessionState::Failed;
                    return Err(error);
                }
            };

            self.state = SessionState::ParsingReply;
            let records = match edits::parse_blocks(&reply) {
                Ok(records) => records,
                Err(error) => {
                    warn!(%error, round = %self.rounds, "run: reply was not in block format");
                    pending = vec![format_corrective(&error)];
                    continue;
                }
            };

            self.state = SessionState::ApplyingEdits;
            let outcome = edits::apply_all(records, &document);
            document = outcome.document;

            if outcome.failures.is_empty() {
                info!(rounds = %self.rounds, "run: all edits applied");
                self.state = SessionState::Done;
                return Ok(document);
            }

            warn!(
                failure_count = %outcome.failures.len(),
                round = %self.rounds,
                "run: some edits failed to apply"
            );
            pending = outcome.failures.iter().map(apply_corrective).collect();
        }
    }

    /// Send the pending messages and record both directions in the transcript
    async fn exchange(&mut self, outbound: Vec<Message>) -> Result<String, SessionError> {
        debug!(outbound_count = %outbound.len(), round = %self.rounds, "exchange: called");

        for message in &outbound {
            // Corrective system messages are always shown; only the opening
            // prompt set is subject to verbose gating.
            if self.rounds == 1 {
                self.console.print_initial(message);
            } else {
                self.console.print_message(message);
            }
        }
        self.transcript.extend(outbound);

        let request = CompletionRequest {
            messages: self.transcript.clone(),
            max_tokens: self.max_tokens,
        };
        let response = self.llm.complete(request).await?;

        let content = match response.content {
            Some(content) if !content.is_empty() => content,
            _ => return Err(SessionError::EmptyReply),
        };

        let reply = Message::assistant(content.clone());
        self.console.print_message(&reply);
        self.transcript.push(reply);

        Ok(content)
    }
}

/// Corrective message for a reply that was not in block format
fn format_corrective(error: &ParseError) -> Message {
    Message::system(format!(
        "Your reply was not in the correct *SEARCH/REPLACE block* format. \
         Trying to parse it gave the error: {error}. \
         Please try again, ensuring your reply follows the correct format."
    ))
}

/// Corrective message for one edit that failed to apply, echoing the block
fn apply_corrective(failure: &FailedEdit) -> Message {
    Message::system(format!(
        "There was an error applying the following *SEARCH/REPLACE block*: {}\n\n{}",
        failure.error,
        failure.record.to_block()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{CompletionResponse, Role, TokenUsage};

    fn reply(text: &str) -> CompletionResponse {
        CompletionResponse {
            content: Some(text.to_string()),
            usage: TokenUsage::default(),
        }
    }

    fn block(search: &str, replace: &str, reason: &str) -> String {
        format!("<<<<<<< SEARCH\n{search}\n=======\n{replace}\n>>>>>>> REPLACE\n\n{reason}\n")
    }

    fn session_with(mock: &Arc<MockLlmClient>, max_requests: u32) -> Session {
        let client: Arc<dyn LlmClient> = mock.clone();
        Session::new(client, Console::new(false), max_requests, 1024)
    }

    fn initial() -> Vec<Message> {
        vec![Message::user("please improve my resume")]
    }

    #[tokio::test]
    async fn test_clean_single_round() {
        let mock = Arc::new(MockLlmClient::new(vec![reply(&block("old", "new", "x"))]));
        let mut session = session_with(&mock, 4);

        let result = session.run("This is an old text.", initial()).await.unwrap();

        assert_eq!(result, "This is an new text.");
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.rounds_used(), 1);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_then_success() {
        // round 1: missing closer; round 2: well-formed
        let malformed = "<<<<<<< SEARCH\nold\n=======\nnew\n";
        let mock = Arc::new(MockLlmClient::new(vec![
            reply(malformed),
            reply(&block("old", "new", "fixed")),
        ]));
        let mut session = session_with(&mock, 4);

        let result = session.run("This is an old text.", initial()).await.unwrap();

        assert_eq!(result, "This is an new text.");
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.rounds_used(), 2);

        // the second round was driven by exactly one corrective system message
        let correctives: Vec<_> = session
            .transcript()
            .iter()
            .filter(|m| m.role == Role::System)
            .collect();
        assert_eq!(correctives.len(), 1);
        assert!(correctives[0].content.contains("SEARCH/REPLACE block"));
        assert!(correctives[0].content.contains(">>>>>>> REPLACE"));
    }

    #[tokio::test]
    async fn test_failed_edit_feeds_back_block() {
        let mock = Arc::new(MockLlmClient::new(vec![
            reply(&block("not in the document", "anything", "miss")),
            reply(&block("old", "new", "hit")),
        ]));
        let mut session = session_with(&mock, 4);

        let result = session.run("This is an old text.", initial()).await.unwrap();

        assert_eq!(result, "This is an new text.");
        assert_eq!(session.rounds_used(), 2);

        let corrective = session
            .transcript()
            .iter()
            .find(|m| m.role == Role::System)
            .unwrap();
        assert!(corrective.content.contains("error applying"));
        // the failing block is echoed in wire format
        assert!(corrective.content.contains("not in the document"));
        assert!(corrective.content.contains("<<<<<<< SEARCH"));
    }

    #[tokio::test]
    async fn test_one_corrective_per_failed_edit() {
        // two of three edits fail; the good one still applies
        let first = format!(
            "{}{}{}",
            block("alpha", "ALPHA", "ok"),
            block("missing", "x", "bad one"),
            block("gone", "y", "bad two"),
        );
        let fixes = format!(
            "{}{}",
            block("beta", "BETA", "fix one"),
            block("gamma", "GAMMA", "fix two"),
        );
        let mock = Arc::new(MockLlmClient::new(vec![reply(&first), reply(&fixes)]));
        let mut session = session_with(&mock, 4);

        let result = session.run("alpha beta gamma", initial()).await.unwrap();
        assert_eq!(result, "ALPHA BETA GAMMA");

        let correctives: Vec<_> = session
            .transcript()
            .iter()
            .filter(|m| m.role == Role::System)
            .collect();
        assert_eq!(correctives.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_budget_fails_without_model_call() {
        let mock = Arc::new(MockLlmClient::new(vec![reply(&block("old", "new", "x"))]));
        let mut session = session_with(&mock, 0);

        let result = session.run("This is an old text.", initial()).await;

        assert!(matches!(result, Err(SessionError::OutOfAttempts { budget: 0 })));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_budget_exhaustion_after_repeated_bad_format() {
        let bad = "no blocks here";
        let mock = Arc::new(MockLlmClient::new(vec![
            reply(bad),
            reply(bad),
            reply(bad),
            reply(bad),
        ]));
        let mut session = session_with(&mock, 4);

        let result = session.run("This is an old text.", initial()).await;

        assert!(matches!(result, Err(SessionError::OutOfAttempts { budget: 4 })));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.rounds_used(), 4);
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_empty_reply_is_fatal() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse {
            content: None,
            usage: TokenUsage::default(),
        }]));
        let mut session = session_with(&mock, 4);

        let result = session.run("This is an old text.", initial()).await;

        assert!(matches!(result, Err(SessionError::EmptyReply)));
        assert_eq!(session.state(), SessionState::Failed);
        // fatal, not retried
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_success_keeps_applied_edits() {
        // round 1 applies one edit and fails another; round 2 never matches,
        // so the session fails, but the round-1 edit must not be lost in the
        // transcript-visible document flow
        let first = format!("{}{}", block("alpha", "ALPHA", "ok"), block("zzz", "x", "bad"));
        let bad_fix = block("still missing", "x", "bad again");
        let mock = Arc::new(MockLlmClient::new(vec![
            reply(&first),
            reply(&bad_fix),
            reply(&bad_fix),
            reply(&bad_fix),
        ]));
        let mut session = session_with(&mock, 4);

        let result = session.run("alpha beta", initial()).await;
        assert!(matches!(result, Err(SessionError::OutOfAttempts { .. })));
        assert_eq!(session.rounds_used(), 4);
    }
}
