//! Core building blocks shared by every command
//!
//! - **config**: Optional `cutarelease.toml` parsing and validation
//! - **context**: Per-run context (project root, dry-run gate, verbosity, prompt)
//! - **error**: Error types with contextual help messages and exit codes
//! - **vcs**: Git operations abstraction (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
