//! Cutting a release
//!
//! A release takes the version recorded in the project's version file(s),
//! checks that the changelog's top section describes it, tags it, optionally
//! publishes it, and then moves the project on to the next version:
//!
//! ```text
//! ## proj 1.0.1 (not yet released)      ## proj 1.0.2 (not yet released)
//!                                 ==>
//! - fixed the frobnicator               (nothing yet)
//!
//!                                       ## proj 1.0.1
//!
//!                                       - fixed the frobnicator
//! ```
//!
//! - **version**: Version identifiers (parse, order, format, next)
//! - **version_file**: Reading and exact-marker rewriting of version files
//! - **changelog**: `CHANGES.md` sections, validation and rewrites
//! - **publish**: Registry publishing (npm, PyPI)
//! - **orchestrator**: The staged release run

pub mod changelog;
pub mod orchestrator;
pub mod publish;
pub mod version;
pub mod version_file;

pub use orchestrator::{Outcome, ReleaseOrchestrator, ReleaseSettings, ReleaseSummary, VersionFileSpec};
pub use publish::CommandPublisher;
