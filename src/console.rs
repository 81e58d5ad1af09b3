//! Colorized conversation mirroring

use colored::Colorize;

use crate::llm::{Message, Role};

/// Echoes the conversation to the terminal as rounds proceed
///
/// Every message exchanged with the model is shown, including corrective
/// system messages. The one exception is the opening prompt set: its system
/// prompt is long and static, so it is skipped unless `verbose`.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    verbose: bool,
}

impl Console {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print one message with a role header and per-line quoting
    pub fn print_message(&self, message: &Message) {
        println!("{}", message.role.as_str().underline());
        for line in message.content.lines() {
            let quoted = format!("> {line}");
            match message.role {
                Role::Assistant => println!("{}", quoted.green()),
                _ => println!("{}", quoted.blue()),
            }
        }
    }

    /// Print one message from the opening prompt set
    ///
    /// Skips the initial system prompt unless `verbose`.
    pub fn print_initial(&self, message: &Message) {
        if !self.shows_initial(message) {
            return;
        }
        self.print_message(message);
    }

    fn shows_initial(&self, message: &Message) -> bool {
        self.verbose || message.role != Role::System
    }

    /// Report a fatal session error
    pub fn fatal(&self, error: &dyn std::fmt::Display) {
        eprintln!("{}", error.to_string().red());
    }
}
