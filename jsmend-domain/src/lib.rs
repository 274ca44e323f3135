//! Domain logic: turn grouped diagnostics into deterministic per-file fix plans.
//!
//! This crate owns *what* should be fixed and why. It does not own *how* edits are
//! applied; that's the `jsmend-edit` crate. Classification is a pure function of the
//! diagnostic list and the injected [`ClassifierConfig`].

mod classifier;
mod config;

pub use classifier::{Classification, Classifier};
pub use config::ClassifierConfig;
