//! Integration tests for cutting a release

use crate::helpers::{TestProject, run_cutarelease, run_cutarelease_ok};
use anyhow::Result;

const CHANGES: &str = "# proj changelog

## proj 1.0.1 (not yet released)

- fixed the frobnicator

## proj 1.0.0

- first release
";

const PY_MODULE: &str = "\"\"\"proj\"\"\"

__version_info__ = (1, 0, 1)
__version__ = '.'.join(map(str, __version_info__))
";

#[test]
fn test_full_release() -> Result<()> {
  let project = TestProject::new(&[("CHANGES.md", CHANGES), ("lib/proj.py", PY_MODULE), ("VERSION", "1.0.1\n")])?;

  run_cutarelease_ok(
    &project.path,
    &["-p", "proj", "-f", "lib/proj.py", "-f", "VERSION"],
    "y\n",
  )?;

  let changes = project.read_file("CHANGES.md")?;
  assert!(
    changes.starts_with("# proj changelog\n\n## proj 1.0.2 (not yet released)\n\n(nothing yet)\n\n## proj 1.0.1\n\n- fixed"),
    "unexpected changelog:\n{}",
    changes
  );
  assert!(project.read_file("lib/proj.py")?.contains("__version_info__ = (1, 0, 2)\n"));
  assert_eq!(project.read_file("VERSION")?, "1.0.2\n");

  assert_eq!(project.tags()?, vec!["1.0.1".to_string()]);
  assert_eq!(project.origin_tags()?, vec!["1.0.1".to_string()]);
  assert_eq!(
    project.git_log(3)?,
    vec![
      "prep for future dev".to_string(),
      "prepare for 1.0.1 release".to_string(),
      "Initial project setup".to_string(),
    ]
  );
  assert_eq!(project.status()?, "");
  assert_eq!(project.origin_head()?, project.head()?);

  Ok(())
}

#[test]
fn test_version_mismatch_changes_nothing() -> Result<()> {
  let changes = "## proj 2.2.9 (not yet released)\n\n- things\n";
  let package = "{\n  \"name\": \"proj\",\n  \"version\": \"2.3.0\"\n}\n";
  let project = TestProject::new(&[("CHANGES.md", changes), ("package.json", package)])?;

  let output = run_cutarelease(&project.path, &["-p", "proj"], "y\n")?;
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("'2.2.9'"), "stderr: {}", stderr);
  assert!(stderr.contains("'2.3.0'"), "stderr: {}", stderr);

  assert_eq!(project.read_file("CHANGES.md")?, changes);
  assert_eq!(project.read_file("package.json")?, package);
  assert!(project.tags()?.is_empty());
  assert_eq!(project.git_log(5)?.len(), 1);

  Ok(())
}

#[test]
fn test_hand_edited_version_marker() -> Result<()> {
  let module = "__version_info__ = (1,  0, 1)\n";
  let project = TestProject::new(&[("CHANGES.md", CHANGES), ("proj.py", module)])?;

  let output = run_cutarelease(&project.path, &["-p", "proj"], "y\n")?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("__version_info__ = (1, 0, 1)"), "stderr: {}", stderr);
  assert!(stderr.contains("proj.py"), "stderr: {}", stderr);

  // Stages before the bump already happened
  assert_eq!(project.read_file("proj.py")?, module);
  assert_eq!(project.origin_tags()?, vec!["1.0.1".to_string()]);
  assert_eq!(project.git_log(1)?, vec!["prepare for 1.0.1 release".to_string()]);

  Ok(())
}

#[test]
fn test_dry_run_changes_nothing() -> Result<()> {
  let project = TestProject::new(&[("CHANGES.md", CHANGES), ("VERSION.txt", "1.0.1\n")])?;
  let head = project.head()?;

  let output = run_cutarelease_ok(&project.path, &["-p", "proj", "--dry-run"], "")?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Dry-run complete"), "stdout: {}", stdout);
  assert!(stdout.contains("1.0.2"), "stdout: {}", stdout);
  assert!(!stdout.contains("Are you sure"), "stdout: {}", stdout);

  assert_eq!(project.read_file("CHANGES.md")?, CHANGES);
  assert_eq!(project.read_file("VERSION.txt")?, "1.0.1\n");
  assert!(project.tags()?.is_empty());
  assert_eq!(project.head()?, head);
  assert_eq!(project.status()?, "");

  Ok(())
}

#[test]
fn test_declined_confirmation_exits_cleanly() -> Result<()> {
  let project = TestProject::new(&[("CHANGES.md", CHANGES), ("VERSION", "1.0.1\n")])?;

  let output = run_cutarelease_ok(&project.path, &["-p", "proj"], "n\n")?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Are you sure you want cut a 1.0.1 release?"));
  assert!(stdout.contains("not confirmed"));

  assert_eq!(project.read_file("CHANGES.md")?, CHANGES);
  assert!(project.tags()?.is_empty());

  Ok(())
}

#[test]
fn test_config_file_and_directory_flag() -> Result<()> {
  let config = r#"
project_name = "proj"
tag_prefix = "v"

[[version_files]]
path = "src/version.js"
format = "javascript"
"#;
  let project = TestProject::new(&[
    ("CHANGES.md", CHANGES),
    ("cutarelease.toml", config),
    ("src/version.js", "// generated\nvar VERSION = \"1.0.1\";\n"),
  ])?;

  let parent = project.path.parent().unwrap().to_path_buf();
  run_cutarelease_ok(&parent, &["-C", "proj"], "yes\n")?;

  assert_eq!(project.origin_tags()?, vec!["v1.0.1".to_string()]);
  assert_eq!(
    project.read_file("src/version.js")?,
    "// generated\nvar VERSION = \"1.0.2\";\n"
  );
  assert!(
    project
      .read_file("CHANGES.md")?
      .contains("## proj 1.0.2 (not yet released)")
  );

  Ok(())
}

#[test]
fn test_rerun_after_tagging_skips_existing_tag() -> Result<()> {
  let project = TestProject::new(&[("CHANGES.md", CHANGES), ("VERSION", "1.0.1\n")])?;
  crate::helpers::git(&project.path, &["tag", "-a", "1.0.1", "-m", "version 1.0.1"])?;

  let output = run_cutarelease_ok(&project.path, &["-p", "proj"], "y\n")?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("tag 1.0.1 already existed"), "stdout: {}", stdout);
  assert_eq!(project.read_file("VERSION")?, "1.0.2\n");

  Ok(())
}

#[test]
fn test_disagreeing_version_files_change_nothing() -> Result<()> {
  let module = "__version_info__ = (0, 9, 0)\n";
  let project = TestProject::new(&[("CHANGES.md", CHANGES), ("VERSION", "1.0.1\n"), ("proj.py", module)])?;
  let head = project.head()?;

  let output = run_cutarelease(&project.path, &["-p", "proj", "-f", "VERSION", "-f", "proj.py"], "y\n")?;
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("'1.0.1'") && stderr.contains("'0.9.0'"), "stderr: {}", stderr);

  assert_eq!(project.read_file("proj.py")?, module);
  assert_eq!(project.read_file("VERSION")?, "1.0.1\n");
  assert!(project.tags()?.is_empty());
  assert_eq!(project.head()?, head);

  Ok(())
}
