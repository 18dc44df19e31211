use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Lifecycle status of a connector version as reported by the registry.
///
/// Informational only: verification never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportState {
    Supported,
    Deprecated,
    Unsupported,
}

impl SupportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportState::Supported => "supported",
            SupportState::Deprecated => "deprecated",
            SupportState::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for SupportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportState {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supported" => Ok(SupportState::Supported),
            "deprecated" => Ok(SupportState::Deprecated),
            "unsupported" => Ok(SupportState::Unsupported),
            _ => Err(ModelError::UnknownSupportState(s.to_string())),
        }
    }
}
