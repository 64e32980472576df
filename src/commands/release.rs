//! Release command implementation
//!
//! Merges CLI flags, `cutarelease.toml` and defaults into `ReleaseSettings`,
//! wires up the real collaborators (system git, terminal prompt, registry
//! commands) and reports the outcome.

use crate::core::config::ReleaseConfig;
use crate::core::context::{ReleaseContext, Verbosity};
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::core::vcs::SystemGit;
use crate::release::{CommandPublisher, Outcome, ReleaseOrchestrator, ReleaseSettings, ReleaseSummary, VersionFileSpec};
use crate::ui::TerminalPrompt;
use crate::utils::display_relative;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for one release run, straight from the command line
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
  /// Project root (default: current directory)
  pub directory: Option<PathBuf>,
  pub project_name: Option<String>,
  pub version_files: Vec<PathBuf>,
  pub dry_run: bool,
  pub verbose: u8,
  pub quiet: bool,
}

impl ReleaseOptions {
  pub fn verbosity(&self) -> Verbosity {
    Verbosity::from_flags(self.verbose, self.quiet)
  }
}

/// Run the release command
pub fn run_release(opts: ReleaseOptions) -> ReleaseResult<()> {
  let root = project_root(opts.directory.as_deref())?;
  let config = ReleaseConfig::load(&root)?;
  let settings = build_settings(&opts, &config, &root)?;
  debug!("release settings: {:?}", settings);

  let vcs = SystemGit::open(&root)?;
  let publisher = CommandPublisher;
  let mut prompt = TerminalPrompt::stdio();
  let ctx = ReleaseContext::new(root.clone(), opts.dry_run, opts.verbosity(), &mut prompt);

  match ReleaseOrchestrator::new(ctx, settings, &vcs, &publisher).run() {
    Outcome::Proceed(summary) => {
      print_summary(&summary, &root);
      Ok(())
    }
    Outcome::CleanAbort(reason) => {
      println!("⏹️  Stopped: {}", reason);
      Ok(())
    }
    Outcome::Failure(err) => Err(err),
  }
}

/// Absolute, symlink-free project root
fn project_root(directory: Option<&Path>) -> ReleaseResult<PathBuf> {
  let dir = match directory {
    Some(dir) => dir.to_path_buf(),
    None => env::current_dir().context("Failed to get current directory")?,
  };
  dir
    .canonicalize()
    .with_context(|| format!("Failed to resolve project directory {}", dir.display()))
}

/// CLI flags win over config, config wins over defaults
fn build_settings(opts: &ReleaseOptions, config: &ReleaseConfig, root: &Path) -> ReleaseResult<ReleaseSettings> {
  let project_name = match opts.project_name.clone().or_else(|| config.project_name.clone()) {
    Some(name) => name,
    None => root
      .file_name()
      .map(|name| name.to_string_lossy().to_string())
      .ok_or_else(|| {
        ReleaseError::with_help(
          format!("Cannot derive a project name from {}", root.display()),
          "Pass --project-name NAME.",
        )
      })?,
  };

  let version_files = if !opts.version_files.is_empty() {
    opts.version_files.iter().map(VersionFileSpec::new).collect()
  } else {
    config
      .version_files
      .iter()
      .map(|entry| {
        Ok(VersionFileSpec {
          path: entry.path.clone(),
          format: entry.format()?,
        })
      })
      .collect::<ReleaseResult<Vec<_>>>()?
  };

  Ok(ReleaseSettings {
    project_name,
    version_files,
    changelog: config.changelog.clone(),
    tag_prefix: config.tag_prefix.clone(),
  })
}

fn print_summary(summary: &ReleaseSummary, root: &Path) {
  println!();
  if summary.dry_run {
    println!("🔍 Dry-run complete. Nothing was changed.");
  } else {
    println!("🎉 Released {}", summary.version);
  }

  let prefix = if summary.dry_run { "would " } else { "" };
  if summary.changelog_prepared {
    println!("   📝 {}mark {} released in the changelog", prefix, summary.version);
  }
  if summary.tag_created {
    println!("   🏷️  {}tag {} and push tags", prefix, summary.tag);
  } else {
    println!("   🏷️  tag {} already existed", summary.tag);
  }
  for registry in &summary.published {
    println!("   📦 {}publish to {}", prefix, registry);
  }

  let files: Vec<_> = summary
    .updated_files
    .iter()
    .map(|path| display_relative(root, path))
    .collect();
  println!(
    "   ⏭️  {}move to {} in {}",
    prefix,
    summary.next_version,
    files.join(", ")
  );
}
