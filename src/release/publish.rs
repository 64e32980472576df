//! Publishing to package registries
//!
//! The release run only decides *whether* to publish; running the registry
//! tool is behind `Publisher` so it can be faked in tests.

use crate::core::error::{PublishError, ReleaseResult};
use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Registries a release can be published to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registry {
  Npm,
  PyPi,
}

impl Registry {
  /// Command line used to publish, program first
  pub fn command_line(self) -> &'static [&'static str] {
    match self {
      Registry::Npm => &["npm", "publish"],
      Registry::PyPi => &["python", "setup.py", "sdist", "--formats", "zip", "upload"],
    }
  }
}

impl fmt::Display for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Registry::Npm => write!(f, "npm"),
      Registry::PyPi => write!(f, "pypi"),
    }
  }
}

/// Something that can publish the project at `root` to a registry
pub trait Publisher {
  fn publish(&self, registry: Registry, root: &Path) -> ReleaseResult<()>;
}

/// Publishes by running the registry's own command line tool
#[derive(Debug, Default)]
pub struct CommandPublisher;

impl Publisher for CommandPublisher {
  fn publish(&self, registry: Registry, root: &Path) -> ReleaseResult<()> {
    let argv = registry.command_line();
    let command = argv.join(" ");
    debug!("running '{}' in {}", command, root.display());

    let mut cmd = Command::new(argv[0]);
    cmd.args(&argv[1..]).current_dir(root);

    // Keep macOS resource forks out of the sdist
    if cfg!(target_os = "macos") && registry == Registry::PyPi {
      cmd.env("COPY_EXTENDED_ATTRIBUTES_DISABLE", "1");
    }

    // Inherited stdio: registry tools may ask for credentials
    let status = cmd.status().map_err(|e| PublishError::CommandFailed {
      registry: registry.to_string(),
      command: command.clone(),
      reason: e.to_string(),
    })?;

    if !status.success() {
      return Err(
        PublishError::CommandFailed {
          registry: registry.to_string(),
          command,
          reason: format!("exited with {}", status),
        }
        .into(),
      );
    }

    Ok(())
  }
}
