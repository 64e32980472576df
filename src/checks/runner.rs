//! Check runner for executing self-test checks

use super::self_test::{ChangelogFixtureCheck, NextVersionCheck, TupleLiteralCheck, VersionGrammarCheck};
use super::trait_def::{Check, CheckResult};
use std::sync::Arc;

/// Check runner that executes multiple checks
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results
  pub fn run_all(&self) -> Vec<CheckResult> {
    self
      .checks
      .iter()
      .map(|check| {
        check.run().unwrap_or_else(|err| {
          // A check that can't run counts as failed
          CheckResult::error(
            check.name(),
            format!("Check failed to run: {}", err),
            Some("Re-run with -v for details"),
          )
        })
      })
      .collect()
  }

  /// Get all registered checks
  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with all built-in checks
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();

  runner.add_check(Arc::new(VersionGrammarCheck));
  runner.add_check(Arc::new(NextVersionCheck));
  runner.add_check(Arc::new(TupleLiteralCheck));
  runner.add_check(Arc::new(ChangelogFixtureCheck));

  runner
}
