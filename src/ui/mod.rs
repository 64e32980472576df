//! Terminal interaction: confirmations and rewrite previews

pub mod diff;
pub mod prompt;

pub use prompt::{Answer, Prompt, TerminalPrompt};
