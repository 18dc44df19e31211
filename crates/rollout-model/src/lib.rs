//! Public data model for default-version verification.
//!
//! These types travel between the orchestrator, the verification activity and the version registry.
//! They carry no behaviour beyond small helpers and are safe to serialize as JSON.
mod domain;
pub use domain::*;
