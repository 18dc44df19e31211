use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoggerError {
    #[error("unknown log format `{0}` (expected text, json or journald)")]
    InvalidFormat(String),

    #[error("invalid log filter `{0}`")]
    InvalidLevel(String),

    #[error("journald output needs linux and the `journald` feature")]
    JournaldUnavailable,

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}
