pub mod error;
pub use error::{Cancelled, PollError, RegistryError, VerificationError};

pub mod tag;
pub use tag::{strip_rc_suffix, tag_matches};

pub mod registry;
pub use registry::{RegistryHandle, VersionRegistry};

pub mod heartbeat;
pub use heartbeat::{Heartbeat, HeartbeatDetails};

pub mod metrics;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, noop_metrics};

pub mod poller;
pub use poller::{BoundedPoller, PollBudget};

pub mod activity;
pub use activity::{VerifyConfig, VerifyDefaultVersionActivity};

#[cfg(test)]
pub(crate) mod testing;
