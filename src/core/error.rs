//! Error types for cutarelease with contextual messages and exit codes
//!
//! Every error aborts the release run. Each one names the file and the exact
//! text it expected so the operator can fix the tree by hand and re-run.
//! Declined confirmations are not errors; see `release::Outcome`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cutarelease
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, hand-edited files)
  User = 1,
  /// System error (git, publish commands, I/O)
  System = 2,
  /// Release-readiness failure (changelog not ready)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for cutarelease
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration file errors
  Config(ConfigError),

  /// Unparsable version text
  Version(VersionError),

  /// Version file lookup, parse, and rewrite errors
  VersionFile(VersionFileError),

  /// Changelog parse, validation, and rewrite errors
  Changelog(ChangelogError),

  /// Git command errors
  Git(GitError),

  /// Registry publish errors
  Publish(PublishError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(err) => ReleaseError::Message {
        message: ctx_str,
        context: Some(err.to_string()),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Version(_) => ExitCode::User,
      ReleaseError::VersionFile(e) => e.exit_code(),
      ReleaseError::Changelog(e) => e.exit_code(),
      ReleaseError::Git(_) => ExitCode::System,
      ReleaseError::Publish(_) => ExitCode::System,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Version(e) => e.help_message(),
      ReleaseError::VersionFile(e) => e.help_message(),
      ReleaseError::Changelog(e) => e.help_message(),
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::Publish(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Io(_) => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Version(e) => write!(f, "{}", e),
      ReleaseError::VersionFile(e) => write!(f, "{}", e),
      ReleaseError::Changelog(e) => write!(f, "{}", e),
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::Publish(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<ConfigError> for ReleaseError {
  fn from(err: ConfigError) -> Self {
    ReleaseError::Config(err)
  }
}

impl From<VersionError> for ReleaseError {
  fn from(err: VersionError) -> Self {
    ReleaseError::Version(err)
  }
}

impl From<VersionFileError> for ReleaseError {
  fn from(err: VersionFileError) -> Self {
    ReleaseError::VersionFile(err)
  }
}

impl From<ChangelogError> for ReleaseError {
  fn from(err: ChangelogError) -> Self {
    ReleaseError::Changelog(err)
  }
}

impl From<GitError> for ReleaseError {
  fn from(err: GitError) -> Self {
    ReleaseError::Git(err)
  }
}

impl From<PublishError> for ReleaseError {
  fn from(err: PublishError) -> Self {
    ReleaseError::Publish(err)
  }
}

/// Configuration file errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file exists but could not be parsed
  Invalid { path: PathBuf, reason: String },

  /// A field holds a value we can't use
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => {
        Some("Fix the TOML syntax or remove the file to fall back to defaults.".to_string())
      }
      ConfigError::InvalidField { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid value for '{}' in config: {}", field, reason)
      }
    }
  }
}

/// Version text errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
  /// Text does not match `major.minor[.patch[(a|b|c)[N]]]` or the tuple rule
  Format { text: String, reason: String },

  /// Last component is already at its maximum
  Overflow { version: String },
}

impl VersionError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionError::Format { .. } => Some("Versions look like `1.2`, `1.2.3`, `1.2.3a` or `1.2.3b2`.".to_string()),
      VersionError::Overflow { .. } => None,
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::Format { text, reason } => {
        write!(f, "Could not parse version '{}': {}", text, reason)
      }
      VersionError::Overflow { version } => {
        write!(f, "Cannot compute the version after '{}': last component is at its maximum", version)
      }
    }
  }
}

/// Version file errors
#[derive(Debug)]
pub enum VersionFileError {
  /// No candidate version file exists in the project
  NotFound { candidates: Vec<String> },

  /// Structured manifest has no usable version field
  MissingField { path: PathBuf, field: String },

  /// The exact version literal was not found verbatim
  MissingMarker { path: PathBuf, marker: String },

  /// Unrecognized format tag
  UnsupportedFormat { tag: String },

  /// Manifest is not valid JSON
  InvalidManifest { path: PathBuf, reason: String },

  /// Two version files record different versions
  Disagreement {
    first: PathBuf,
    first_version: String,
    other: PathBuf,
    other_version: String,
  },
}

impl VersionFileError {
  fn exit_code(&self) -> ExitCode {
    match self {
      VersionFileError::Disagreement { .. } => ExitCode::Validation,
      _ => ExitCode::User,
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      VersionFileError::NotFound { .. } => {
        Some("Pass the file explicitly with `--version-file PATH`, or list it in cutarelease.toml.".to_string())
      }
      VersionFileError::MissingMarker { path, marker } => Some(format!(
        "Restore the line `{}` in {} exactly as written (no extra whitespace), then re-run.",
        marker,
        path.display()
      )),
      VersionFileError::UnsupportedFormat { .. } => {
        Some("Supported formats: package.json, python, javascript, version.".to_string())
      }
      VersionFileError::Disagreement { first, .. } => Some(format!(
        "Bring every version file in line with {} (the first one listed), then re-run.",
        first.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for VersionFileError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionFileError::NotFound { candidates } => {
        write!(
          f,
          "Could not find a version file. Looked for: '{}'",
          candidates.join("', '")
        )
      }
      VersionFileError::MissingField { path, field } => {
        write!(f, "No \"{}\" string field in {}", field, path.display())
      }
      VersionFileError::MissingMarker { path, marker } => {
        write!(
          f,
          "Couldn't find `{}` version marker in {}: can't prep for subsequent dev",
          marker,
          path.display()
        )
      }
      VersionFileError::UnsupportedFormat { tag } => {
        write!(f, "Unsupported version file format: '{}'", tag)
      }
      VersionFileError::InvalidManifest { path, reason } => {
        write!(f, "Failed to parse {}: {}", path.display(), reason)
      }
      VersionFileError::Disagreement {
        first,
        first_version,
        other,
        other_version,
      } => write!(
        f,
        "Version files disagree: {} holds '{}' but {} holds '{}'",
        first.display(),
        first_version,
        other.display(),
        other_version
      ),
    }
  }
}

/// Changelog errors
#[derive(Debug)]
pub enum ChangelogError {
  /// Changelog file missing
  NotFound { path: PathBuf },

  /// No `## <version>` section headings found
  NoSections { path: PathBuf },

  /// Top section is for a different version than the version files
  VersionMismatch {
    path: PathBuf,
    found: String,
    expected: String,
  },

  /// Top section body is the `(nothing yet)` placeholder
  EmptyRelease { path: PathBuf },

  /// Exact heading line for the current release not found verbatim
  MissingSectionMarker { path: PathBuf, marker: String },
}

impl ChangelogError {
  fn exit_code(&self) -> ExitCode {
    match self {
      ChangelogError::NotFound { .. } | ChangelogError::MissingSectionMarker { .. } => ExitCode::User,
      _ => ExitCode::Validation,
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      ChangelogError::NotFound { .. } => Some(
        "Create it with a top section like `## <project> <version> (not yet released)`.".to_string(),
      ),
      ChangelogError::VersionMismatch { expected, .. } => Some(format!(
        "Make the top changelog section and the version files agree on {}.",
        expected
      )),
      ChangelogError::EmptyRelease { .. } => {
        Some("Describe the changes in this release before cutting it.".to_string())
      }
      ChangelogError::MissingSectionMarker { marker, .. } => Some(format!(
        "The heading must read exactly `{}` (project name included).",
        marker.trim_end()
      )),
      ChangelogError::NoSections { .. } => None,
    }
  }
}

impl fmt::Display for ChangelogError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChangelogError::NotFound { path } => write!(f, "'{}' not found", path.display()),
      ChangelogError::NoSections { path } => {
        write!(f, "No release sections found in '{}'", path.display())
      }
      ChangelogError::VersionMismatch { path, found, expected } => write!(
        f,
        "Top section in '{}' is for version '{}', expected version '{}': aborting",
        path.display(),
        found,
        expected
      ),
      ChangelogError::EmptyRelease { path } => write!(
        f,
        "Top section body in '{}' is `(nothing yet)`: it looks like nothing has been added to this release",
        path.display()
      ),
      ChangelogError::MissingSectionMarker { path, marker } => write!(
        f,
        "Couldn't find `{}` marker in '{}' content: can't prep for subsequent dev",
        marker.trim_end(),
        path.display()
      ),
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("non-fast-forward") || stderr.contains("rejected") {
          Some("The remote has commits you don't have. Pull, then re-run; existing tags are skipped.".to_string())
        } else if stderr.contains("nothing to commit") {
          Some("The files were already committed. Re-running is safe.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run cutarelease from inside a git checkout (looked at {}).",
        path.display()
      )),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Registry publish errors
#[derive(Debug)]
pub enum PublishError {
  /// Publish command exited non-zero or could not be spawned
  CommandFailed { registry: String, command: String, reason: String },
}

impl PublishError {
  fn help_message(&self) -> Option<String> {
    match self {
      PublishError::CommandFailed { registry, command, .. } => Some(format!(
        "The release is already tagged. Fix the {} credentials and run `{}` by hand.",
        registry, command
      )),
    }
  }
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublishError::CommandFailed { registry, command, reason } => {
        write!(f, "Publishing to {} failed: `{}`: {}", registry, command, reason)
      }
    }
  }
}

/// Result type alias for cutarelease
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exit_codes_by_category() {
    let mismatch = ReleaseError::Changelog(ChangelogError::VersionMismatch {
      path: "CHANGES.md".into(),
      found: "2.2.9".to_string(),
      expected: "2.3.0".to_string(),
    });
    assert_eq!(mismatch.exit_code(), ExitCode::Validation);

    let marker = ReleaseError::VersionFile(VersionFileError::MissingMarker {
      path: "lib/proj.py".into(),
      marker: "__version_info__ = (1, 0, 1)".to_string(),
    });
    assert_eq!(marker.exit_code(), ExitCode::User);

    let git = ReleaseError::Git(GitError::CommandFailed {
      command: "git push".to_string(),
      stderr: "boom".to_string(),
    });
    assert_eq!(git.exit_code().as_i32(), 2);
  }

  #[test]
  fn test_missing_marker_names_file_and_marker() {
    let err = ReleaseError::VersionFile(VersionFileError::MissingMarker {
      path: "lib/proj.py".into(),
      marker: "__version_info__ = (1, 0, 1)".to_string(),
    });
    let text = err.to_string();
    assert!(text.contains("lib/proj.py"));
    assert!(text.contains("__version_info__ = (1, 0, 1)"));
    assert!(err.help_message().is_some());
  }

  #[test]
  fn test_disagreement_is_a_validation_failure() {
    let err = ReleaseError::VersionFile(VersionFileError::Disagreement {
      first: "VERSION".into(),
      first_version: "1.0.1".to_string(),
      other: "proj.py".into(),
      other_version: "0.9.0".to_string(),
    });
    assert_eq!(err.exit_code(), ExitCode::Validation);
    let text = err.to_string();
    assert!(text.contains("VERSION") && text.contains("'1.0.1'"));
    assert!(text.contains("proj.py") && text.contains("'0.9.0'"));
  }

  #[test]
  fn test_context_wraps_io_errors() {
    let err: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
    let err = err.context("Failed to read VERSION").unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("Failed to read VERSION"));
    assert!(text.contains("gone"));
  }
}
