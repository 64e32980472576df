//! Changelog parsing, release-readiness checks, and rewrites
//!
//! The changelog (`CHANGES.md` by default) is a markdown document whose
//! release sections start with second-level headings:
//!
//! ```text
//! ## proj 1.0.2 (not yet released)
//!
//! (nothing yet)
//!
//! ## proj 1.0.1
//!
//! - Fixed the frobnicator.
//! ```
//!
//! The project name in the heading is optional when parsing. Rewrites are raw
//! text substitutions on exact markers, so the diff of a release commit shows
//! exactly what changed. A heading that was reformatted by hand is an error.

use crate::core::error::{ChangelogError, ReleaseResult, ResultExt};
use crate::release::version::Version;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix on the top heading while a release is pending
pub const NOT_YET_RELEASED: &str = " (not yet released)";

/// Body of a freshly opened section
pub const NOTHING_YET: &str = "(nothing yet)";

/// One release section, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
  /// Version token from the heading (`1.0.1`, `1.2.0a1`)
  pub version: String,
  /// Heading carries the "not yet released" marker
  pub pending: bool,
  /// Everything after the heading up to the next section heading
  pub body: String,
}

impl Section {
  /// Body is only the empty-release placeholder
  pub fn is_placeholder(&self) -> bool {
    self.body.trim() == NOTHING_YET
  }
}

/// State of the top section once it passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopSection {
  /// Marked "not yet released": the normal case
  Pending,
  /// Marker missing; the operator must confirm before going on
  AlreadyReleased,
}

/// Heading regex for a project; the project name is optional
fn heading_regex(project: &str) -> ReleaseResult<Regex> {
  let pattern = format!(
    r"(?mR)^## (?:{} )?([\d.abc]+)(\s+\(not yet released\))?",
    regex::escape(project)
  );
  Regex::new(&pattern).map_err(|e| format!("Invalid changelog heading pattern: {}", e).into())
}

/// Split changelog text into sections, in document order
pub fn parse_sections(text: &str, project: &str) -> ReleaseResult<Vec<Section>> {
  let re = heading_regex(project)?;
  let headings: Vec<_> = re.captures_iter(text).collect();

  let mut sections = Vec::with_capacity(headings.len());
  for (idx, caps) in headings.iter().enumerate() {
    let (Some(whole), Some(version)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    let body_end = headings
      .get(idx + 1)
      .and_then(|next| next.get(0))
      .map(|m| m.start())
      .unwrap_or(text.len());
    sections.push(Section {
      version: version.as_str().to_string(),
      pending: caps.get(2).is_some(),
      body: text[whole.end()..body_end].to_string(),
    });
  }

  Ok(sections)
}

/// Heading line for a section, including the trailing newline
pub fn heading(project: &str, version: &Version, pending: bool) -> String {
  let marker = if pending { NOT_YET_RELEASED } else { "" };
  format!("## {} {}{}\n", project, version, marker)
}

/// Drop the first "not yet released" marker. A no-op if there is none.
pub fn mark_released(text: &str) -> String {
  text.replacen(NOT_YET_RELEASED, "", 1)
}

/// A changelog document held in memory for one release run
#[derive(Debug, Clone)]
pub struct Changelog {
  path: PathBuf,
  project: String,
  text: String,
  sections: Vec<Section>,
}

impl Changelog {
  /// Parse changelog text; `path` is used for error reporting and saving
  pub fn parse(path: &Path, project: &str, text: String) -> ReleaseResult<Self> {
    let sections = parse_sections(&text, project)?;
    if sections.is_empty() {
      return Err(ChangelogError::NoSections { path: path.to_path_buf() }.into());
    }

    Ok(Self {
      path: path.to_path_buf(),
      project: project.to_string(),
      text,
      sections,
    })
  }

  /// Read and parse the changelog at `path`
  pub fn load(path: &Path, project: &str) -> ReleaseResult<Self> {
    if !path.exists() {
      return Err(ChangelogError::NotFound { path: path.to_path_buf() }.into());
    }
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Self::parse(path, project, text)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Current (possibly rewritten) text
  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn sections(&self) -> &[Section] {
    &self.sections
  }

  /// Check that the top section is ready to be released as `expected`.
  ///
  /// Order: version mismatch, then empty release, then the missing-marker
  /// warning. Nothing is modified.
  pub fn validate_top(&self, expected: &Version) -> ReleaseResult<TopSection> {
    let top = self
      .sections
      .first()
      .ok_or_else(|| ChangelogError::NoSections { path: self.path.clone() })?;

    let expected_text = expected.to_string();
    if top.version != expected_text {
      return Err(
        ChangelogError::VersionMismatch {
          path: self.path.clone(),
          found: top.version.clone(),
          expected: expected_text,
        }
        .into(),
      );
    }

    if top.is_placeholder() {
      return Err(ChangelogError::EmptyRelease { path: self.path.clone() }.into());
    }

    if top.pending {
      Ok(TopSection::Pending)
    } else {
      Ok(TopSection::AlreadyReleased)
    }
  }

  /// Release-preparation pass. Returns whether the text changed.
  pub fn mark_released(&mut self) -> ReleaseResult<bool> {
    let updated = mark_released(&self.text);
    if updated == self.text {
      return Ok(false);
    }
    self.replace_text(updated)?;
    Ok(true)
  }

  /// Forward-prep pass: open a pending section for `next` above `current`.
  pub fn open_next_section(&mut self, current: &Version, next: &Version) -> ReleaseResult<()> {
    let marker = heading(&self.project, current, false);
    if !self.text.contains(&marker) {
      return Err(
        ChangelogError::MissingSectionMarker {
          path: self.path.clone(),
          marker,
        }
        .into(),
      );
    }

    let replacement = format!(
      "{}\n{}\n\n{}",
      heading(&self.project, next, true),
      NOTHING_YET,
      marker
    );
    let updated = self.text.replacen(&marker, &replacement, 1);
    self.replace_text(updated)
  }

  fn replace_text(&mut self, text: String) -> ReleaseResult<()> {
    self.sections = parse_sections(&text, &self.project)?;
    self.text = text;
    Ok(())
  }
}
