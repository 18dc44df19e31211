//! Runs default-version verifications under a `taskvisor` supervisor.
//!
//! The supervisor's per-task `CancellationToken` is handed to the activity as its heartbeat, so cancelling
//! the task interrupts the current wait and ends the verification with [`taskvisor::TaskError::Canceled`].
mod tasks;
pub use tasks::verify::{
    SLOT, VerificationReport, run_verification, to_task_error, verify_default_version_task,
    verify_many,
};
