//! Version files: reading and rewriting the project's recorded version
//!
//! Supported formats:
//! - `package.json` with a `"version"` string field
//! - Python module with `__version_info__ = (1, 0, 1)`
//! - JavaScript module with `var VERSION = "1.0.1";`
//! - Plain text (`VERSION`, `VERSION.txt`) holding only the version
//!
//! Rewrites are exact-marker substitutions: the current version is rendered
//! in the file's own literal style and must appear verbatim, exactly one
//! occurrence is replaced. A reformatted file fails loudly instead of being
//! guessed at.

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt, VersionError, VersionFileError};
use crate::release::version::{Component, Version};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::info;

static PYTHON_VERSION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?mR)^__version_info__ = (.*?)[ \t]*(?:#.*)?$").expect("static regex"));

static JAVASCRIPT_VERSION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?mR)^var VERSION = "(.*?)";$"#).expect("static regex"));

/// Format of a version file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFormat {
  /// npm registry manifest (`package.json`)
  PackageJson,
  /// Python module with a `__version_info__` tuple
  Python,
  /// JavaScript module with `var VERSION = "..."`
  JavaScript,
  /// File containing only the version string
  PlainText,
}

impl VersionFormat {
  /// Guess the format from the file name
  pub fn detect(path: &Path) -> Self {
    if path.file_name().is_some_and(|name| name == "package.json") {
      return VersionFormat::PackageJson;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
      Some("py") => VersionFormat::Python,
      Some("js") => VersionFormat::JavaScript,
      _ => VersionFormat::PlainText,
    }
  }

  /// Parse an explicit format tag from configuration
  pub fn from_tag(tag: &str) -> ReleaseResult<Self> {
    match tag {
      "package.json" | "npm" => Ok(VersionFormat::PackageJson),
      "python" => Ok(VersionFormat::Python),
      "javascript" => Ok(VersionFormat::JavaScript),
      "version" | "text" => Ok(VersionFormat::PlainText),
      other => Err(
        VersionFileError::UnsupportedFormat {
          tag: other.to_string(),
        }
        .into(),
      ),
    }
  }

  /// Canonical tag name
  pub fn tag(&self) -> &'static str {
    match self {
      VersionFormat::PackageJson => "package.json",
      VersionFormat::Python => "python",
      VersionFormat::JavaScript => "javascript",
      VersionFormat::PlainText => "version",
    }
  }

  /// Whether this file is a package-registry manifest (publishable)
  pub fn is_registry_manifest(&self) -> bool {
    matches!(self, VersionFormat::PackageJson)
  }

  /// The exact literal this format uses to record `version`
  pub fn marker(&self, version: &Version) -> String {
    match self {
      VersionFormat::PackageJson => format!("\"version\": \"{}\"", version),
      VersionFormat::Python => format!("__version_info__ = {}", version.tuple_literal()),
      VersionFormat::JavaScript => format!("var VERSION = \"{}\";", version),
      VersionFormat::PlainText => version.to_string(),
    }
  }
}

impl fmt::Display for VersionFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.tag())
  }
}

/// A version file and the version it held when read
#[derive(Debug, Clone)]
pub struct VersionFile {
  pub path: PathBuf,
  pub format: VersionFormat,
  pub version: Version,
}

impl VersionFile {
  /// Read and parse a version file, detecting its format unless given
  pub fn read(path: &Path, format: Option<VersionFormat>) -> ReleaseResult<Self> {
    let format = format.unwrap_or_else(|| VersionFormat::detect(path));
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read version file {}", path.display()))?;
    let version = Self::parse(path, format, &content)?;

    Ok(Self {
      path: path.to_path_buf(),
      format,
      version,
    })
  }

  /// Extract the version from raw file content
  pub fn parse(path: &Path, format: VersionFormat, content: &str) -> ReleaseResult<Version> {
    match format {
      VersionFormat::PackageJson => {
        let manifest: serde_json::Value =
          serde_json::from_str(content).map_err(|e| VersionFileError::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
          })?;
        let version = manifest
          .get("version")
          .and_then(|v| v.as_str())
          .ok_or_else(|| VersionFileError::MissingField {
            path: path.to_path_buf(),
            field: "version".to_string(),
          })?;
        Version::parse(version)
      }
      VersionFormat::Python => {
        let literal = PYTHON_VERSION_RE
          .captures(content)
          .and_then(|caps| caps.get(1))
          .ok_or_else(|| VersionFileError::MissingMarker {
            path: path.to_path_buf(),
            marker: "__version_info__ = (...)".to_string(),
          })?;
        let components = parse_tuple_literal(literal.as_str())?;
        Version::from_components(components)
      }
      VersionFormat::JavaScript => {
        let literal = JAVASCRIPT_VERSION_RE
          .captures(content)
          .and_then(|caps| caps.get(1))
          .ok_or_else(|| VersionFileError::MissingMarker {
            path: path.to_path_buf(),
            marker: "var VERSION = \"...\";".to_string(),
          })?;
        Version::parse(literal.as_str())
      }
      VersionFormat::PlainText => Version::parse(content.trim()),
    }
  }

  /// Exact literal for the version this file currently holds
  pub fn marker(&self) -> String {
    self.format.marker(&self.version)
  }

  /// Replace the current version literal with `next` in `content`.
  ///
  /// Exactly one substitution. Plain-text files are replaced wholesale,
  /// keeping a trailing newline if there was one.
  pub fn rewrite(&self, content: &str, next: &Version) -> ReleaseResult<String> {
    if self.format == VersionFormat::PlainText {
      let newline = if content.ends_with('\n') { "\n" } else { "" };
      return Ok(format!("{}{}", next, newline));
    }

    let marker = self.marker();
    if !content.contains(&marker) {
      return Err(
        VersionFileError::MissingMarker {
          path: self.path.clone(),
          marker,
        }
        .into(),
      );
    }
    Ok(content.replacen(&marker, &self.format.marker(next), 1))
  }

  /// Rewrite the file on disk to hold `next`.
  ///
  /// Re-reads the current content first so edits made since `read` are kept.
  pub fn bump(&self, ctx: &ReleaseContext<'_>, next: &Version) -> ReleaseResult<()> {
    let content = fs::read_to_string(&self.path)
      .with_context(|| format!("Failed to read version file {}", self.path.display()))?;
    let updated = self.rewrite(&content, next)?;
    info!("update version to '{}' in '{}' ({})", next, ctx.display(&self.path), self.format);
    ctx.write_file(&self.path, &content, &updated)
  }
}

/// Parse a Python tuple literal of integers and quoted strings.
///
/// Grammar: `( item (, item)* [,] )` where `item` is a decimal integer or a
/// single/double quoted string without escapes. Nothing is evaluated.
pub fn parse_tuple_literal(text: &str) -> ReleaseResult<Vec<Component>> {
  let format_error = |reason: &str| VersionError::Format {
    text: text.to_string(),
    reason: reason.to_string(),
  };

  let inner = text
    .trim()
    .strip_prefix('(')
    .and_then(|rest| rest.strip_suffix(')'))
    .ok_or_else(|| format_error("expected a parenthesized tuple"))?;

  let mut items: Vec<&str> = inner.split(',').map(str::trim).collect();
  if items.len() > 1 && items.last().is_some_and(|last| last.is_empty()) {
    items.pop();
  }

  let mut components = Vec::with_capacity(items.len());
  for item in items {
    if item.is_empty() {
      return Err(format_error("empty tuple element").into());
    }
    let quoted = ['\'', '"']
      .iter()
      .find_map(|q| item.strip_prefix(*q).and_then(|rest| rest.strip_suffix(*q)));
    match quoted {
      Some(token) if !token.contains(['\'', '"', '\\']) => components.push(Component::Token(token.to_string())),
      Some(_) => return Err(format_error("unsupported string literal").into()),
      None if item.chars().all(|c| c.is_ascii_digit()) => {
        let n = item
          .parse::<u64>()
          .map_err(|_| format_error("integer out of range"))?;
        components.push(Component::Number(n));
      }
      None => return Err(format_error("only integers and quoted strings are allowed").into()),
    }
  }

  Ok(components)
}
