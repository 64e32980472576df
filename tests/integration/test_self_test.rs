//! Integration tests for `cutarelease --test`

use crate::helpers::run_cutarelease_ok;
use anyhow::Result;

#[test]
fn test_self_test_passes() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  let output = run_cutarelease_ok(dir.path(), &["--test"], "")?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("✅ version-grammar"), "stdout: {}", stdout);
  assert!(stdout.contains("✅ changelog-fixture"), "stdout: {}", stdout);
  assert!(stdout.contains("Summary: 4/4 checks passed"), "stdout: {}", stdout);

  Ok(())
}

#[test]
fn test_outside_git_repo_fails() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::write(dir.path().join("VERSION"), "1.0.1\n")?;
  std::fs::write(dir.path().join("CHANGES.md"), "## proj 1.0.1 (not yet released)\n\n- x\n")?;

  let output = crate::helpers::run_cutarelease(dir.path(), &["-p", "proj"], "y\n")?;
  assert_eq!(output.status.code(), Some(2));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Git repository not found"));

  Ok(())
}
