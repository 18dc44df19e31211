use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown support state: {0} (expected: supported|deprecated|unsupported)")]
    UnknownSupportState(String),
}
