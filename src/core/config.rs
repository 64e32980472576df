use crate::core::error::{ConfigError, ReleaseResult, ResultExt};
use crate::release::version_file::VersionFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional project configuration for cutarelease
/// Searched in order: cutarelease.toml, .cutarelease.toml, .config/cutarelease.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
  /// Project name used in changelog headings (default: directory name)
  #[serde(default)]
  pub project_name: Option<String>,

  /// Changelog path relative to the project root
  #[serde(default = "default_changelog")]
  pub changelog: PathBuf,

  /// Prefix for release tags (tag = prefix + version)
  #[serde(default)]
  pub tag_prefix: String,

  /// Version files, first one is authoritative
  #[serde(default)]
  pub version_files: Vec<VersionFileConfig>,
}

/// One `[[version_files]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionFileConfig {
  pub path: PathBuf,

  /// Explicit format tag (package.json, python, javascript, version)
  #[serde(default)]
  pub format: Option<String>,
}

fn default_changelog() -> PathBuf {
  PathBuf::from("CHANGES.md")
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      project_name: None,
      changelog: default_changelog(),
      tag_prefix: String::new(),
      version_files: Vec::new(),
    }
  }
}

impl VersionFileConfig {
  /// Resolve the format tag, if one was given
  pub fn format(&self) -> ReleaseResult<Option<VersionFormat>> {
    self.format.as_deref().map(VersionFormat::from_tag).transpose()
  }
}

impl ReleaseConfig {
  /// Find config file in search order: cutarelease.toml, .cutarelease.toml, .config/cutarelease.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("cutarelease.toml"),
      path.join(".cutarelease.toml"),
      path.join(".config").join("cutarelease.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the project root, or defaults if there is none
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content).map_err(|e| ConfigError::Invalid {
      path: config_path.clone(),
      reason: e.to_string(),
    })?;

    config.validate()?;
    Ok(config)
  }

  /// Check field values that deserialize fine but can't be used
  pub fn validate(&self) -> ReleaseResult<()> {
    if self.changelog.as_os_str().is_empty() {
      return Err(
        ConfigError::InvalidField {
          field: "changelog".to_string(),
          reason: "path must not be empty".to_string(),
        }
        .into(),
      );
    }

    if let Some(name) = &self.project_name
      && name.trim().is_empty()
    {
      return Err(
        ConfigError::InvalidField {
          field: "project_name".to_string(),
          reason: "name must not be empty".to_string(),
        }
        .into(),
      );
    }

    for entry in &self.version_files {
      entry.format()?;
    }

    Ok(())
  }
}
