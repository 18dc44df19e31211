//! In-test fakes for the registry, the orchestrator heartbeat and metrics.
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use rollout_model::{SupportState, VerificationStatus, VersionSnapshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::{Cancelled, RegistryError},
    heartbeat::{Heartbeat, HeartbeatDetails},
    metrics::MetricsBackend,
    registry::VersionRegistry,
};

pub const REPOSITORY: &str = "airbyte/source-faker";

pub fn snapshot(tag: &str) -> VersionSnapshot {
    VersionSnapshot {
        docker_repository: REPOSITORY.to_string(),
        docker_image_tag: tag.to_string(),
        is_version_override_applied: true,
        support_state: SupportState::Supported,
        supports_refreshes: true,
        supports_file_transfer: false,
    }
}

/// Registry that replays a script of responses; the last entry repeats forever.
pub struct ScriptedRegistry {
    script: Mutex<VecDeque<Result<VersionSnapshot, RegistryError>>>,
    calls: AtomicU32,
}

impl ScriptedRegistry {
    pub fn new(script: Vec<Result<VersionSnapshot, RegistryError>>) -> Arc<Self> {
        assert!(!script.is_empty(), "script must not be empty");
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        })
    }

    pub fn tags(tags: &[&str]) -> Arc<Self> {
        Self::new(tags.iter().map(|t| Ok(snapshot(t))).collect())
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionRegistry for ScriptedRegistry {
    async fn fetch_default_version(
        &self,
        _actor_definition_id: Uuid,
    ) -> Result<VersionSnapshot, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

/// Token-backed heartbeat that counts beats and can cancel itself on the n-th beat.
pub struct CountingHeartbeat {
    token: CancellationToken,
    beats: AtomicU32,
    cancel_on_beat: Option<u32>,
}

impl CountingHeartbeat {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            beats: AtomicU32::new(0),
            cancel_on_beat: None,
        }
    }

    pub fn cancelling_on(beat: u32) -> Self {
        Self {
            cancel_on_beat: Some(beat),
            ..Self::new()
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn beats(&self) -> u32 {
        self.beats.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Heartbeat for CountingHeartbeat {
    async fn beat(&self, details: &HeartbeatDetails) -> Result<(), Cancelled> {
        let n = self.beats.fetch_add(1, Ordering::SeqCst) + 1;
        if self.cancel_on_beat == Some(n) {
            self.token.cancel();
        }
        self.token.beat(details).await
    }

    async fn until_cancelled(&self) {
        self.token.cancelled().await
    }
}

#[derive(Default)]
pub struct RecordingMetrics {
    pub started: AtomicU32,
    pub matched: AtomicU32,
    pub mismatched: AtomicU32,
    pub completed: Mutex<Vec<(VerificationStatus, Duration)>>,
}

impl MetricsBackend for RecordingMetrics {
    fn verification_started(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn observation(&self, matched: bool) {
        if matched {
            self.matched.fetch_add(1, Ordering::SeqCst);
        } else {
            self.mismatched.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn verification_completed(&self, status: VerificationStatus, duration: Duration) {
        self.completed.lock().unwrap().push((status, duration));
    }
}
