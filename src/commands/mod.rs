//! CLI commands for cutarelease
//!
//! - **release**: Cut a release (the default action)
//! - **self_test**: Run the built-in checks (`--test`)

pub mod release;

pub use release::{ReleaseOptions, run_release};
pub use self_test::run_self_test;
