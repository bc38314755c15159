//! Drift CLI - library surface behind the `drift` binary
//!
//! Exposes the full-run orchestration so integration tests exercise exactly
//! the code path the binary runs.

pub mod report;
pub mod run;

pub use run::{run, RunConfig};
