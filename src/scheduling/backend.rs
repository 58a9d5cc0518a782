use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Fidelity of the mechanism a trigger is installed through, best first.
/// `Precise` fires at the exact instant even while the device idles,
/// `BestEffort` may be delayed by power management, `Deferred` runs the
/// trigger as relative-delay background work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchedulingTier {
    Precise,
    BestEffort,
    Deferred,
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("exact scheduling is not permitted")]
    PermissionDenied,
    #[error("platform rejected the trigger: {0}")]
    Platform(String),
}

/// One scheduling mechanism. Holds at most one pending trigger; installing
/// replaces it.
#[async_trait]
pub trait SchedulingBackend: Send + Sync {
    fn tier(&self) -> SchedulingTier;

    async fn install(&self, fire_at: DateTime<Utc>) -> Result<(), InstallError>;

    /// Idempotent, a no-op when nothing is pending. Never fails observably.
    async fn cancel(&self);
}

/// Asks the platform whether exact scheduling is currently allowed.
/// Consulted before every `Precise` install attempt, never cached.
pub trait CapabilityProbe: Send + Sync {
    fn can_schedule_exactly(&self) -> bool;
}
