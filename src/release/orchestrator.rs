//! The release run
//!
//! Stages, strictly in order. Each one completes or the run stops; nothing is
//! rolled back.
//!
//! 1. Resolve version files (explicit list, else probe well-known names)
//! 2. Read the current version from every file; they must all agree
//! 3. Confirm intent (skipped in dry-run)
//! 4. Validate the changelog's top section
//! 5. Mark the section released, commit
//! 6. Tag and push tags, unless the tag exists
//! 7. Offer to publish (npm, PyPI)
//! 8. Open the next changelog section, bump every version file
//! 9. Commit and push
//!
//! Questions and decisions run the same in dry-run; only the side effects
//! behind `ReleaseContext::perform` are skipped.

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult, VersionFileError};
use crate::core::vcs::Vcs;
use crate::release::changelog::{Changelog, TopSection};
use crate::release::publish::{Publisher, Registry};
use crate::release::version::Version;
use crate::release::version_file::{VersionFile, VersionFormat};
use crate::ui::Answer;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// A version file to use, with an optional explicit format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFileSpec {
  pub path: PathBuf,
  pub format: Option<VersionFormat>,
}

impl VersionFileSpec {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      format: None,
    }
  }
}

/// What to release, after CLI flags and config are merged
#[derive(Debug, Clone)]
pub struct ReleaseSettings {
  pub project_name: String,

  /// Explicit version files; empty means probe the project root
  pub version_files: Vec<VersionFileSpec>,

  /// Changelog path, relative to the project root
  pub changelog: PathBuf,

  pub tag_prefix: String,
}

impl ReleaseSettings {
  pub fn new(project_name: impl Into<String>) -> Self {
    Self {
      project_name: project_name.into(),
      version_files: Vec::new(),
      changelog: PathBuf::from("CHANGES.md"),
      tag_prefix: String::new(),
    }
  }

  /// Well-known version file names, in probe order
  pub fn candidates(&self) -> Vec<String> {
    let p = &self.project_name;
    vec![
      "package.json".to_string(),
      "VERSION.txt".to_string(),
      "VERSION".to_string(),
      format!("{}.py", p),
      format!("lib/{}.py", p),
      format!("{}.js", p),
      format!("lib/{}.js", p),
    ]
  }
}

/// Why a run stopped without doing anything wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
  /// Operator declined the initial confirmation
  NotConfirmed { version: Version },

  /// Top changelog section had no marker and the operator said it was released
  AlreadyReleased { version: Version },
}

impl fmt::Display for AbortReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AbortReason::NotConfirmed { version } => write!(f, "release of {} not confirmed", version),
      AbortReason::AlreadyReleased { version } => write!(f, "{} has already been released", version),
    }
  }
}

/// What a completed run did (or, in dry-run, would have done)
#[derive(Debug, Clone)]
pub struct ReleaseSummary {
  pub version: Version,
  pub next_version: Version,
  pub tag: String,

  /// False when the tag already existed
  pub tag_created: bool,

  /// Whether the release-preparation commit was needed
  pub changelog_prepared: bool,

  pub published: Vec<Registry>,

  /// Version files bumped to `next_version`
  pub updated_files: Vec<PathBuf>,

  pub dry_run: bool,
}

/// Terminal state of a release run
#[derive(Debug)]
pub enum Outcome {
  Proceed(ReleaseSummary),
  CleanAbort(AbortReason),
  Failure(ReleaseError),
}

/// Result of a stage that may stop the run cleanly
enum Flow {
  Continue,
  Abort(AbortReason),
}

/// Drives one release run
pub struct ReleaseOrchestrator<'a> {
  ctx: ReleaseContext<'a>,
  settings: ReleaseSettings,
  vcs: &'a dyn Vcs,
  publisher: &'a dyn Publisher,
}

impl<'a> ReleaseOrchestrator<'a> {
  pub fn new(
    ctx: ReleaseContext<'a>,
    settings: ReleaseSettings,
    vcs: &'a dyn Vcs,
    publisher: &'a dyn Publisher,
  ) -> Self {
    Self {
      ctx,
      settings,
      vcs,
      publisher,
    }
  }

  /// Run every stage
  pub fn run(mut self) -> Outcome {
    self.execute().unwrap_or_else(Outcome::Failure)
  }

  fn execute(&mut self) -> ReleaseResult<Outcome> {
    if self.ctx.dry_run {
      info!("dry-run: nothing will be written, committed, tagged or pushed");
    }

    // 1-2
    let specs = self.resolve_version_files()?;
    let files = specs
      .iter()
      .map(|spec| VersionFile::read(&spec.path, spec.format))
      .collect::<ReleaseResult<Vec<_>>>()?;
    let version = files[0].version.clone();
    if let Some(other) = files[1..].iter().find(|file| file.version != version) {
      return Err(
        VersionFileError::Disagreement {
          first: files[0].path.clone(),
          first_version: version.to_string(),
          other: other.path.clone(),
          other_version: other.version.to_string(),
        }
        .into(),
      );
    }
    let next_version = version.next()?;

    // 3
    if let Flow::Abort(reason) = self.confirm_intent(&version)? {
      return Ok(Outcome::CleanAbort(reason));
    }
    info!("cutting a {} release", version);

    // 4
    let changelog_path = self.ctx.root.join(&self.settings.changelog);
    let mut changelog = Changelog::load(&changelog_path, &self.settings.project_name)?;
    if let Flow::Abort(reason) = self.validate_changelog(&changelog, &version)? {
      return Ok(Outcome::CleanAbort(reason));
    }

    // 5
    let changelog_prepared = self.prepare_changelog(&mut changelog, &version)?;

    // 6
    let tag = format!("{}{}", self.settings.tag_prefix, version);
    let tag_created = self.tag_release(&tag, &version)?;

    // 7
    let published = self.offer_publish(&files)?;

    // 8
    let updated_files = self.prepare_next(&mut changelog, &files, &version, &next_version)?;

    // 9
    self.commit_next(&changelog, &updated_files, &next_version)?;

    Ok(Outcome::Proceed(ReleaseSummary {
      version,
      next_version,
      tag,
      tag_created,
      changelog_prepared,
      published,
      updated_files,
      dry_run: self.ctx.dry_run,
    }))
  }

  /// Stage 1: explicit files (made absolute), else the first candidate found
  fn resolve_version_files(&self) -> ReleaseResult<Vec<VersionFileSpec>> {
    if !self.settings.version_files.is_empty() {
      return Ok(
        self
          .settings
          .version_files
          .iter()
          .map(|spec| VersionFileSpec {
            path: self.ctx.root.join(&spec.path),
            format: spec.format,
          })
          .collect(),
      );
    }

    info!("guessing version file");
    let candidates = self.settings.candidates();
    let found = candidates
      .iter()
      .map(|name| self.ctx.root.join(name))
      .find(|path| path.is_file());

    match found {
      Some(path) => {
        info!("using '{}' as version file", self.ctx.display(&path));
        Ok(vec![VersionFileSpec::new(path)])
      }
      None => Err(VersionFileError::NotFound { candidates }.into()),
    }
  }

  /// Stage 3
  fn confirm_intent(&mut self, version: &Version) -> ReleaseResult<Flow> {
    if self.ctx.dry_run {
      return Ok(Flow::Continue);
    }

    let question = format!(
      "Are you sure you want cut a {} release?\nThis will involve commits and a push.",
      version
    );
    if self.ctx.confirm(&question, Some(Answer::No))?.is_yes() {
      Ok(Flow::Continue)
    } else {
      info!("user abort");
      Ok(Flow::Abort(AbortReason::NotConfirmed {
        version: version.clone(),
      }))
    }
  }

  /// Stage 4
  fn validate_changelog(&mut self, changelog: &Changelog, version: &Version) -> ReleaseResult<Flow> {
    match changelog.validate_top(version)? {
      TopSection::Pending => Ok(Flow::Continue),
      TopSection::AlreadyReleased => {
        let question = format!(
          "The top section in `{}' doesn't have the expected\n'(not yet released)' marker. Has this been released already?",
          self.ctx.display(changelog.path())
        );
        if self.ctx.confirm(&question, Some(Answer::Yes))?.is_yes() {
          info!("abort");
          Ok(Flow::Abort(AbortReason::AlreadyReleased {
            version: version.clone(),
          }))
        } else {
          Ok(Flow::Continue)
        }
      }
    }
  }

  /// Stage 5. Returns whether the changelog needed changing.
  fn prepare_changelog(&self, changelog: &mut Changelog, version: &Version) -> ReleaseResult<bool> {
    let before = changelog.text().to_string();
    if !changelog.mark_released()? {
      debug!("changelog has no '(not yet released)' marker to remove");
      return Ok(false);
    }

    info!("prepare `{}' for release", self.ctx.display(changelog.path()));
    self.ctx.write_file(changelog.path(), &before, changelog.text())?;

    let paths = vec![changelog.path().to_path_buf()];
    let message = format!("prepare for {} release", version);
    self
      .ctx
      .perform(&format!("commit \"{}\"", message), || self.vcs.commit(&paths, &message))?;
    Ok(true)
  }

  /// Stage 6. Returns whether a tag was created.
  fn tag_release(&self, tag: &str, version: &Version) -> ReleaseResult<bool> {
    let existing = self.vcs.list_tags()?;
    if existing.iter().any(|t| t == tag) {
      info!("tag '{}' already exists, skipping", tag);
      return Ok(false);
    }

    info!("tag the release");
    let message = format!("version {}", version);
    self
      .ctx
      .perform(&format!("tag {}", tag), || self.vcs.tag_annotated(tag, &message))?;
    self.ctx.perform("push tags", || self.vcs.push_tags())?;
    Ok(true)
  }

  /// Stage 7. Each registry is offered independently.
  fn offer_publish(&mut self, files: &[VersionFile]) -> ReleaseResult<Vec<Registry>> {
    let mut offers = Vec::new();
    if files.iter().any(|f| f.format.is_registry_manifest()) {
      offers.push((Registry::Npm, "Publish to npm?"));
    }
    if self.ctx.root.join("setup.py").is_file() {
      offers.push((Registry::PyPi, "Publish to pypi?"));
    }

    let mut published = Vec::new();
    for (registry, question) in offers {
      if !self.ctx.confirm(question, Some(Answer::Yes))?.is_yes() {
        debug!("skipping {} publish", registry);
        continue;
      }
      let (publisher, root) = (self.publisher, self.ctx.root.clone());
      self
        .ctx
        .perform(&format!("publish to {}", registry), || publisher.publish(registry, &root))?;
      published.push(registry);
    }

    Ok(published)
  }

  /// Stage 8. Returns the version files that were bumped.
  fn prepare_next(
    &self,
    changelog: &mut Changelog,
    files: &[VersionFile],
    version: &Version,
    next: &Version,
  ) -> ReleaseResult<Vec<PathBuf>> {
    info!("prepare for future dev (version {})", next);

    let before = changelog.text().to_string();
    changelog.open_next_section(version, next)?;
    self.ctx.write_file(changelog.path(), &before, changelog.text())?;

    let mut updated = Vec::with_capacity(files.len());
    for file in files {
      file.bump(&self.ctx, next)?;
      updated.push(file.path.clone());
    }
    Ok(updated)
  }

  /// Stage 9
  fn commit_next(&self, changelog: &Changelog, files: &[PathBuf], next: &Version) -> ReleaseResult<()> {
    let mut paths = vec![changelog.path().to_path_buf()];
    for file in files {
      if !paths.contains(file) {
        paths.push(file.clone());
      }
    }

    let message = "prep for future dev";
    self.ctx.perform(&format!("commit \"{}\" ({})", message, next), || {
      self.vcs.commit(&paths, message)
    })?;
    self.ctx.perform("push", || self.vcs.push())
  }
}
