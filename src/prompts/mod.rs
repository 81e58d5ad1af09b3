//! Prompt assembly
//!
//! Renders the embedded templates and builds the initial message set for a
//! session: system prompt, a few-shot example exchange demonstrating the
//! SEARCH/REPLACE format, the resume body, and the user's change request.

pub mod embedded;

use eyre::{Result, eyre};
use handlebars::Handlebars;
use tracing::debug;

use crate::llm::Message;

/// Render the system prompt with the format instructions spliced in
pub fn system_prompt() -> Result<String> {
    debug!("system_prompt: called");
    let handlebars = Handlebars::new();
    handlebars
        .render_template(
            embedded::SYSTEM,
            &serde_json::json!({ "format_instructions": embedded::FORMAT.trim_end() }),
        )
        .map_err(|e| eyre!("Failed to render system prompt: {}", e))
}

/// Few-shot exchange showing the model what a well-formed reply looks like
pub fn example_messages() -> Vec<Message> {
    vec![
        Message::user("Suggest two general improvements to my resume. Keep each suggested improvement small."),
        Message::assistant(
            r#"<<<<<<< SEARCH
            <li>
              Built a feature-rich map editor using React, TypeScript, and the
              Canvas API with multi-user collaboration supported via the
              operational transformation algorithm and WebSockets.
            </li>
=======
            <li>
              Developed a collaborative map editor using React, TypeScript, and
              Canvas API, enabling real-time multi-user interactions via
              operational transformation and WebSockets, resulting in improved
              user engagement and collaboration.
            </li>
>>>>>>> REPLACE

This change provides a clearer picture of the technologies used and emphasizes the impact on user engagement and collaboration.

<<<<<<< SEARCH
        <summary>
          Built Unity simulations and editor extensions for their YouTube
          channel with 1.7M subscribers.
        </summary>
=======
        <summary>
          Developed Unity simulations and editor extensions, enhancing
          educational content for a YouTube channel with 1.7M subscribers.
        </summary>
>>>>>>> REPLACE

This change emphasizes the role in improving educational content and provides a clearer context for the impact.
"#,
        ),
    ]
}

/// Build the full initial message set for one session
pub fn initial_messages(resume: &str, request: &str) -> Result<Vec<Message>> {
    debug!(resume_len = %resume.len(), "initial_messages: called");

    let mut messages = vec![Message::system(system_prompt()?)];
    messages.extend(example_messages());
    messages.push(Message::user(format!("Here is my current resume:\n\n{resume}")));
    messages.push(Message::user(request.to_string()));
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edits::parse_blocks;
    use crate::llm::Role;

    #[test]
    fn test_system_prompt_renders_format_instructions() {
        let prompt = system_prompt().unwrap();
        assert!(prompt.contains("career advisors"));
        assert!(prompt.contains("*SEARCH/REPLACE block*"));
        // the placeholder itself must be gone, with nothing HTML-escaped
        assert!(!prompt.contains("format_instructions"));
        assert!(!prompt.contains("&lt;"));
    }

    #[test]
    fn test_example_reply_parses_as_two_blocks() {
        // the few-shot reply must itself satisfy the parser it advertises
        let assistant = &example_messages()[1];
        assert_eq!(assistant.role, Role::Assistant);

        let records = parse_blocks(&assistant.content).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].search.contains("map editor"));
        assert!(records[1].reason.contains("educational content"));
    }

    #[test]
    fn test_initial_messages_order() {
        let messages = initial_messages("RESUME BODY", "make it shorter").unwrap();
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages.len(), 5);
        assert!(messages[3].content.contains("RESUME BODY"));
        assert_eq!(messages[4].content, "make it shorter");
    }
}
