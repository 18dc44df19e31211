use serde::{Deserialize, Serialize};

use crate::SupportState;

/// Default-version record for an actor definition, as returned by one registry call.
///
/// Only `docker_image_tag` takes part in verification.
/// The remaining fields are carried through untouched so callers can log them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    /// Image repository, e.g. `airbyte/source-faker`.
    pub docker_repository: String,
    /// Image tag currently promoted to default.
    pub docker_image_tag: String,
    /// Whether a per-actor version override is in effect.
    #[serde(default)]
    pub is_version_override_applied: bool,
    /// Registry lifecycle status of this version.
    pub support_state: SupportState,
    #[serde(default)]
    pub supports_refreshes: bool,
    #[serde(default)]
    pub supports_file_transfer: bool,
}

impl VersionSnapshot {
    /// Returns `repository:tag`.
    pub fn image(&self) -> String {
        format!("{}:{}", self.docker_repository, self.docker_image_tag)
    }
}
