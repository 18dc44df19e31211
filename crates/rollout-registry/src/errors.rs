use rollout_core::RegistryError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum HttpRegistryError {
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("registry returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("actor definition not found: {0}")]
    NotFound(Uuid),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<HttpRegistryError> for RegistryError {
    fn from(err: HttpRegistryError) -> Self {
        match err {
            HttpRegistryError::Request(e) => RegistryError::Transport(e.to_string()),
            HttpRegistryError::Status { status, body } => RegistryError::Status { status, body },
            HttpRegistryError::NotFound(id) => RegistryError::NotFound(id),
            HttpRegistryError::InvalidResponse(msg) => RegistryError::InvalidResponse(msg),
        }
    }
}
