//! Parsing engine and change pipeline for spec-kit project directories.
//!
//! A spec-kit project keeps one directory per feature under `specs/` (or
//! `.specify/specs/`), each holding `spec.md`, `plan.md`, `tasks.md` and
//! auxiliary files. [`project::scan_project`] turns such a tree into a typed
//! [`project::Project`] snapshot, [`metrics::compute_metrics`] rolls it up, and
//! [`watch::subscribe`] keeps a stream of fresh snapshots flowing as files change.

pub mod checkbox;
pub mod config;
pub mod error;
pub mod feature;
pub mod io;
pub mod metrics;
pub mod parser;
pub mod paths;
pub mod project;
pub mod recent;
pub mod types;
pub mod watch;

pub use error::{Result, SpecboardError};
