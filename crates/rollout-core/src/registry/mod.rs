use std::sync::Arc;

use async_trait::async_trait;
use rollout_model::VersionSnapshot;
use uuid::Uuid;

use crate::error::RegistryError;

/// Read-only access to the registry holding actor-definition default versions.
///
/// Implementations are shared between concurrent verifications and must be safe for concurrent use.
/// A returned error is final for the calling verification; implementations should not retry internally.
#[async_trait]
pub trait VersionRegistry: Send + Sync + 'static {
    /// Fetch the current default version of an actor definition.
    async fn fetch_default_version(
        &self,
        actor_definition_id: Uuid,
    ) -> Result<VersionSnapshot, RegistryError>;
}

/// Shared handle to a registry implementation.
pub type RegistryHandle = Arc<dyn VersionRegistry>;
