//! Built-in self-test (`cutarelease --test`)
//!
//! Exercises the version grammar, the next-version rule, Python tuple parsing
//! and the changelog rewrites against fixed inputs, without touching the
//! project or git.
//!
//! # Built-in Checks
//!
//! - **version-grammar**: Accepted/rejected version strings and round-trips
//! - **next-version**: Increment rule for the last component
//! - **tuple-literal**: `__version_info__` tuple parsing
//! - **changelog-fixture**: Parse, validate and rewrite an embedded changelog

mod runner;
mod trait_def;

pub use runner::create_default_runner;
