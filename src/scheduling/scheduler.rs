use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::model::ReminderTarget;
use crate::trigger_time::next_fire_instant;

use super::{CapabilityProbe, SchedulingBackend, SchedulingTier};

#[derive(Debug, Error)]
#[error("every scheduling tier failed to install the bedtime trigger")]
pub struct SchedulingFailed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTrigger {
    pub tier: SchedulingTier,
    pub fire_at: DateTime<Utc>,
}

/// Owns the single pending bedtime trigger. All backend install/cancel
/// calls funnel through here, under one mutex, so two racing reschedules
/// can never leave two triggers armed.
pub struct ReminderScheduler {
    backends: Vec<Arc<dyn SchedulingBackend>>,
    probe: Arc<dyn CapabilityProbe>,
    armed: Mutex<Option<ArmedTrigger>>,
}

impl ReminderScheduler {
    pub fn new(
        mut backends: Vec<Arc<dyn SchedulingBackend>>,
        probe: Arc<dyn CapabilityProbe>,
    ) -> Self {
        backends.sort_by_key(|backend| backend.tier());

        Self {
            backends,
            probe,
            armed: Mutex::new(None),
        }
    }

    /// Replace whatever trigger is pending with one for the next occurrence
    /// of `target`. Cancels across every tier first, a capability change
    /// must not leave a stale trigger armed on a tier we no longer use.
    pub async fn reschedule<Tz: TimeZone>(
        &self,
        target: &ReminderTarget,
        now: &DateTime<Tz>,
    ) -> Result<DateTime<Utc>, SchedulingFailed> {
        let mut armed = self.armed.lock().await;
        self.cancel_all_tiers().await;
        *armed = None;

        let fire_at = next_fire_instant(target, now).with_timezone(&Utc);

        for backend in &self.backends {
            let tier = backend.tier();
            if tier == SchedulingTier::Precise && !self.probe.can_schedule_exactly() {
                log::info!("[RESCHEDULE] Exact scheduling not permitted, skipping {tier:?}");
                continue;
            }

            match backend.install(fire_at).await {
                Ok(()) => {
                    log::info!("[RESCHEDULE] Armed {tier:?} trigger for {fire_at}");
                    *armed = Some(ArmedTrigger { tier, fire_at });
                    return Ok(fire_at);
                }
                Err(error) => {
                    log::warn!(
                        "[RESCHEDULE] Install failed, falling back a tier. [tier = {tier:?}, error = {error}]"
                    );
                }
            }
        }

        log::error!("[RESCHEDULE] No tier left, the bedtime reminder stays disarmed");
        Err(SchedulingFailed)
    }

    /// Cancels across all tiers unconditionally. Idempotent.
    pub async fn cancel(&self) {
        let mut armed = self.armed.lock().await;
        self.cancel_all_tiers().await;
        *armed = None;
    }

    pub async fn armed(&self) -> Option<ArmedTrigger> {
        *self.armed.lock().await
    }

    async fn cancel_all_tiers(&self) {
        for backend in &self.backends {
            backend.cancel().await;
        }
    }
}
