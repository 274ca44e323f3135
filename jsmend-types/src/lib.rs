//! Shared DTOs (schemas-as-code) for the jsmend workspace.
//!
//! # Design constraints
//! - Plans and run reports are serialized to disk for review.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod diagnostic;
pub mod plan;
pub mod report;
pub mod symbol;

/// Schema identifiers.
pub mod schema {
    pub const JSMEND_PLAN_V1: &str = "jsmend.plan.v1";
    pub const JSMEND_REPORT_V1: &str = "jsmend.report.v1";
}
