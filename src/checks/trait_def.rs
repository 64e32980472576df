//! Check trait abstraction for the built-in self-test
//!
//! Each check exercises one piece of release logic against fixed inputs and
//! reports pass or fail. New checks implement `Check` and are registered in
//! `create_default_runner()`.

use crate::core::error::ReleaseResult;

/// Result of running a check
#[derive(Debug, Clone)]
pub struct CheckResult {
  /// Name of the check that ran
  pub check_name: String,
  /// Whether the check passed
  pub passed: bool,
  /// Human-readable message
  pub message: String,
  /// Optional hint for a failure
  pub suggestion: Option<String>,
}

impl CheckResult {
  /// Create a passing check result
  pub fn pass(check_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      check_name: check_name.into(),
      passed: true,
      message: message.into(),
      suggestion: None,
    }
  }

  /// Create a failing check result
  pub fn error(
    check_name: impl Into<String>,
    message: impl Into<String>,
    suggestion: Option<impl Into<String>>,
  ) -> Self {
    Self {
      check_name: check_name.into(),
      passed: false,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
    }
  }
}

/// Self-test check
///
/// # Example
///
/// ```rust,ignore
/// struct MyCheck;
///
/// impl Check for MyCheck {
///   fn name(&self) -> &str {
///     "my-check"
///   }
///
///   fn description(&self) -> &str {
///     "Validates my requirement"
///   }
///
///   fn run(&self) -> ReleaseResult<CheckResult> {
///     Ok(CheckResult::pass(self.name(), "All good"))
///   }
/// }
/// ```
pub trait Check: Send + Sync {
  /// Unique name for this check (kebab-case)
  fn name(&self) -> &str;

  /// Human-readable description of what this check validates
  fn description(&self) -> &str;

  /// Run the check and return a result
  fn run(&self) -> ReleaseResult<CheckResult>;
}
