//! Interactive yes/no confirmation
//!
//! `Prompt` is the seam the release run asks questions through. The terminal
//! implementation re-asks on unrecognized input and returns the default on an
//! empty line or a closed stdin.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::fmt;
use std::io::{self, BufRead, Write};

/// Answer to a yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
  Yes,
  No,
}

impl Answer {
  pub fn is_yes(self) -> bool {
    self == Answer::Yes
  }

  /// Parse `y`, `ye`, `yes`, `n`, `no` (any case)
  pub fn parse(input: &str) -> Option<Self> {
    match input.trim().to_lowercase().as_str() {
      "y" | "ye" | "yes" => Some(Answer::Yes),
      "n" | "no" => Some(Answer::No),
      _ => None,
    }
  }
}

impl fmt::Display for Answer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Answer::Yes => write!(f, "yes"),
      Answer::No => write!(f, "no"),
    }
  }
}

/// Something that can ask the operator a yes/no question
pub trait Prompt {
  /// Ask `question`; `default` is used for an empty answer
  fn confirm(&mut self, question: &str, default: Option<Answer>) -> ReleaseResult<Answer>;
}

/// Prompt on a terminal (or any reader/writer pair)
pub struct TerminalPrompt<R, W> {
  input: R,
  output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
  /// Prompt on the process's stdin/stdout
  pub fn stdio() -> Self {
    Self::new(io::stdin().lock(), io::stdout())
  }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
  fn confirm(&mut self, question: &str, default: Option<Answer>) -> ReleaseResult<Answer> {
    let hint = match default {
      None => " [y/n] ",
      Some(Answer::Yes) => " [Y/n] ",
      Some(Answer::No) => " [y/N] ",
    };

    loop {
      write!(self.output, "\n* * *\n{}{}", question, hint)?;
      self.output.flush()?;

      let mut line = String::new();
      let read = self
        .input
        .read_line(&mut line)
        .context("Failed to read answer from stdin")?;
      if read == 0 {
        writeln!(self.output)?;
        return default.ok_or_else(|| {
          ReleaseError::with_help(
            format!("No answer to \"{}\" (stdin closed)", question),
            "Run cutarelease from an interactive terminal.",
          )
        });
      }

      if line.trim().is_empty()
        && let Some(answer) = default
      {
        return Ok(answer);
      }
      if let Some(answer) = Answer::parse(&line) {
        return Ok(answer);
      }
      writeln!(self.output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  fn ask(input: &str, default: Option<Answer>) -> (ReleaseResult<Answer>, String) {
    let mut output = Vec::new();
    let result = TerminalPrompt::new(Cursor::new(input.as_bytes()), &mut output).confirm("Go?", default);
    (result, String::from_utf8(output).unwrap())
  }

  #[test]
  fn test_explicit_answers() {
    assert_eq!(ask("y\n", Some(Answer::No)).0.unwrap(), Answer::Yes);
    assert_eq!(ask("NO\n", Some(Answer::Yes)).0.unwrap(), Answer::No);
  }

  #[test]
  fn test_empty_line_uses_default() {
    let (answer, output) = ask("\n", Some(Answer::No));
    assert_eq!(answer.unwrap(), Answer::No);
    assert!(output.contains("Go? [y/N] "));
  }

  #[test]
  fn test_reasks_on_garbage() {
    let (answer, output) = ask("maybe\nyes\n", None);
    assert_eq!(answer.unwrap(), Answer::Yes);
    assert!(output.contains("Please respond with 'yes' or 'no'"));
    assert_eq!(output.matches("Go? [y/n] ").count(), 2);
  }

  #[test]
  fn test_closed_stdin() {
    assert_eq!(ask("", Some(Answer::Yes)).0.unwrap(), Answer::Yes);
    assert!(ask("", None).0.is_err());
  }
}
