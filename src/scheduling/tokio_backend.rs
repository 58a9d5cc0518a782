use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::{task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::delivery::ReminderDelivery;

use super::{InstallError, SchedulingBackend, SchedulingTier};

const CANCEL_TIMEOUT: Duration = Duration::from_secs(5);

struct ScheduledTask {
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ScheduledTask {
    fn new(task_handle: JoinHandle<()>, cancellation_token: CancellationToken) -> Self {
        Self {
            task_handle,
            cancellation_token,
        }
    }

    async fn cancel(self, timeout: Duration) {
        self.cancellation_token.cancel();
        let cancel_with_timeout = time::timeout(timeout, self.task_handle);
        let _ = cancel_with_timeout.await;
    }
}

/// In-process stand-in for the platform's one-shot wake primitive: a
/// spawned sleep that invokes the delivery collaborator on expiry. One
/// instance per tier; the `Deferred` tier re-expresses the instant as a
/// relative delay at install time, the others sleep until the instant.
pub struct TimerBackend {
    tier: SchedulingTier,
    delivery: Arc<dyn ReminderDelivery>,
    slot: tokio::sync::Mutex<Option<ScheduledTask>>,
}

impl TimerBackend {
    pub fn new(tier: SchedulingTier, delivery: Arc<dyn ReminderDelivery>) -> Self {
        Self {
            tier,
            delivery,
            slot: tokio::sync::Mutex::new(None),
        }
    }
}

#[async_trait]
impl SchedulingBackend for TimerBackend {
    fn tier(&self) -> SchedulingTier {
        self.tier
    }

    async fn install(&self, fire_at: DateTime<Utc>) -> Result<(), InstallError> {
        let delay = (fire_at - Utc::now())
            .to_std()
            .map_err(|_| InstallError::Platform("fire instant is already in the past".into()))?;

        let tier = self.tier;
        match tier {
            SchedulingTier::Deferred => {
                log::info!("[INSTALL] Enqueueing deferred work with {delay:?} delay")
            }
            _ => log::info!("[INSTALL] Arming {tier:?} one-shot trigger for {fire_at}"),
        }

        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();
        let delivery = Arc::clone(&self.delivery);

        let task_handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancellation_token.cancelled() => {
                    log::debug!("{tier:?} trigger cancelled before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    delivery.present_reminder().await;
                }
            }
        });

        let mut slot = self.slot.lock().await;
        if let Some(previous) = slot.take() {
            previous.cancel(CANCEL_TIMEOUT).await;
        }
        *slot = Some(ScheduledTask::new(task_handle, cancellation_token));

        Ok(())
    }

    async fn cancel(&self) {
        if let Some(task) = self.slot.lock().await.take() {
            task.cancel(CANCEL_TIMEOUT).await;
        }
    }
}
