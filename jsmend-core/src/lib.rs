//! Embeddable core library for jsmend.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking into a
//! larger tool or calling from tests.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`DiagnosticSource`](ports::DiagnosticSource): load the analyzer report
//! - [`ReadPort`](ports::ReadPort): read source files
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides default filesystem-backed implementations
//! and in-memory ones for embedding.
//!
//! # Entry points
//!
//! - [`run_plan`](pipeline::run_plan): classify diagnostics into fix plans
//! - [`run_fix`](pipeline::run_fix): plan, repair and write changed files

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-exported so embedders don't need the lower crates directly.
pub use jsmend_diagnostics::{Intake, IntakeError, IntakeOptions};
pub use jsmend_domain::ClassifierConfig;
