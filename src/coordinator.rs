use std::sync::Arc;

use chrono::Local;
use tokio::sync::RwLock;

use crate::model::{CalmItem, CalmItemId, DEFAULT_CALM_ITEMS, ReminderTarget, Settings};
use crate::scheduling::ReminderScheduler;
use crate::storage::{CalmItemStorage, SettingsStorage};

/// Wires the scheduler, the completion state machine and the storage
/// collaborators together. Holds the settings snapshot the UI reads;
/// mutations land in memory first and are persisted after, so a failed
/// write never rolls back what the user already saw.
pub struct Coordinator {
    settings_storage: Arc<dyn SettingsStorage>,
    item_storage: Arc<dyn CalmItemStorage>,
    scheduler: Arc<ReminderScheduler>,
    default_bedtime: ReminderTarget,
    state: RwLock<Settings>,
}

impl Coordinator {
    pub fn new(
        settings_storage: Arc<dyn SettingsStorage>,
        item_storage: Arc<dyn CalmItemStorage>,
        scheduler: Arc<ReminderScheduler>,
        default_bedtime: ReminderTarget,
    ) -> Self {
        Self {
            settings_storage,
            item_storage,
            scheduler,
            default_bedtime,
            state: RwLock::new(Settings::with_bedtime(default_bedtime)),
        }
    }

    /// Load-or-seed the settings record, evaluate rollover before anything
    /// is shown, seed the default checklist on first run and arm the
    /// reminder for the stored bedtime.
    pub async fn start_up(&self) -> anyhow::Result<Settings> {
        let mut settings = match self.settings_storage.read_settings().await? {
            Some(stored) => stored,
            None => {
                let fresh = Settings::with_bedtime(self.default_bedtime);
                self.settings_storage.write_settings(&fresh).await?;
                fresh
            }
        };

        if settings.completion.check_rollover(Local::now().date_naive()) {
            log::info!("[STARTUP] New day detected, completion reset to pending");
            self.settings_storage.write_settings(&settings).await?;
        }

        if self.item_storage.count().await? == 0 {
            for (order, text) in DEFAULT_CALM_ITEMS.iter().enumerate() {
                self.item_storage
                    .insert((*text).to_string(), order as u32)
                    .await?;
            }
        }

        *self.state.write().await = settings.clone();
        self.dispatch_reschedule(settings.bedtime);

        Ok(settings)
    }

    /// Snapshot for the UI. Rollover is always evaluated first; when it
    /// fires, the reset is persisted after the in-memory state already
    /// moved on.
    pub async fn current_settings(&self) -> anyhow::Result<Settings> {
        let today = Local::now().date_naive();
        let (snapshot, rolled_over) = {
            let mut state = self.state.write().await;
            let rolled_over = state.completion.check_rollover(today);
            (state.clone(), rolled_over)
        };

        if rolled_over {
            self.settings_storage.write_settings(&snapshot).await?;
        }

        Ok(snapshot)
    }

    /// Store the new bedtime, then rearm the reminder off the caller's
    /// path. A bedtime change never touches completion state, and a
    /// scheduling failure never fails the user's action.
    pub async fn update_bedtime(&self, hour: u32, minute: u32) -> anyhow::Result<()> {
        let bedtime = ReminderTarget::new(hour, minute)?;

        let snapshot = {
            let mut state = self.state.write().await;
            state.bedtime = bedtime;
            state.clone()
        };
        self.settings_storage.write_settings(&snapshot).await?;

        self.dispatch_reschedule(bedtime);
        Ok(())
    }

    /// Plain pass-through for the trust-mode toggle; its behavior lives in
    /// the UI layer.
    pub async fn update_trust_mode(&self, enabled: bool) -> anyhow::Result<()> {
        let snapshot = {
            let mut state = self.state.write().await;
            state.trust_mode_enabled = enabled;
            state.clone()
        };
        self.settings_storage.write_settings(&snapshot).await?;
        Ok(())
    }

    /// "Close the day": mark completion with the current wall-clock time,
    /// persist, reset the checklist for tomorrow. Never touches the
    /// bedtime.
    pub async fn close_day(&self) -> anyhow::Result<Settings> {
        let now = Local::now();
        let snapshot = {
            let mut state = self.state.write().await;
            state.completion.close(&now);
            state.clone()
        };

        self.settings_storage.write_settings(&snapshot).await?;
        self.item_storage.uncheck_all().await?;

        Ok(snapshot)
    }

    pub async fn calm_items(&self) -> anyhow::Result<Vec<CalmItem>> {
        Ok(self.item_storage.all().await?)
    }

    pub async fn add_calm_item(&self, text: &str) -> anyhow::Result<Option<CalmItem>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let order = self.item_storage.count().await?;
        let item = self.item_storage.insert(text.to_string(), order).await?;
        Ok(Some(item))
    }

    pub async fn delete_calm_item(&self, id: CalmItemId) -> anyhow::Result<()> {
        self.item_storage.delete(id).await?;
        Ok(())
    }

    pub async fn toggle_calm_item(&self, id: CalmItemId) -> anyhow::Result<()> {
        if let Some(item) = self.item_storage.get(id).await? {
            self.item_storage.set_checked(id, !item.checked).await?;
        }
        Ok(())
    }

    pub async fn shutdown(&self) {
        self.scheduler.cancel().await;
    }

    fn dispatch_reschedule(&self, bedtime: ReminderTarget) {
        let scheduler = Arc::clone(&self.scheduler);
        tokio::spawn(async move {
            // Exhaustion is already logged by the scheduler; the reminder
            // is best-effort by product definition.
            let _ = scheduler.reschedule(&bedtime, &Local::now()).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeDelta, Utc};

    use crate::model::CompletionRecord;
    use crate::scheduling::{CapabilityProbe, InstallError, SchedulingBackend, SchedulingTier};
    use crate::storage::{InMemoryCalmItemStorage, InMemorySettingsStorage, StorageError};

    use super::*;

    struct NoopBackend(SchedulingTier);

    #[async_trait]
    impl SchedulingBackend for NoopBackend {
        fn tier(&self) -> SchedulingTier {
            self.0
        }

        async fn install(&self, _fire_at: DateTime<Utc>) -> Result<(), InstallError> {
            Ok(())
        }

        async fn cancel(&self) {}
    }

    struct AllowAll;

    impl CapabilityProbe for AllowAll {
        fn can_schedule_exactly(&self) -> bool {
            true
        }
    }

    struct FailingSettingsStorage;

    #[async_trait]
    impl SettingsStorage for FailingSettingsStorage {
        async fn read_settings(&self) -> Result<Option<Settings>, StorageError> {
            Ok(None)
        }

        async fn write_settings(&self, _settings: &Settings) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("store is gone".into()))
        }
    }

    fn scheduler() -> Arc<ReminderScheduler> {
        Arc::new(ReminderScheduler::new(
            vec![Arc::new(NoopBackend(SchedulingTier::Precise))],
            Arc::new(AllowAll),
        ))
    }

    fn coordinator_with(settings_storage: Arc<dyn SettingsStorage>) -> Coordinator {
        Coordinator::new(
            settings_storage,
            Arc::new(InMemoryCalmItemStorage::new()),
            scheduler(),
            ReminderTarget::default(),
        )
    }

    #[tokio::test]
    async fn startup_seeds_defaults_and_checklist() {
        let settings_storage = Arc::new(InMemorySettingsStorage::new());
        let coordinator = coordinator_with(settings_storage.clone());

        let settings = coordinator.start_up().await.unwrap();

        assert_eq!(settings.bedtime, ReminderTarget::default());
        assert!(!settings.completion.completed);
        assert_eq!(
            settings_storage.read_settings().await.unwrap(),
            Some(settings)
        );
        assert_eq!(
            coordinator.calm_items().await.unwrap().len(),
            DEFAULT_CALM_ITEMS.len()
        );
    }

    #[tokio::test]
    async fn startup_rolls_over_a_stale_completion() {
        let settings_storage = Arc::new(InMemorySettingsStorage::new());
        let mut stale = Settings::default();
        stale.completion.close(&(Local::now() - TimeDelta::days(2)));
        settings_storage.write_settings(&stale).await.unwrap();

        let coordinator = coordinator_with(settings_storage.clone());
        let settings = coordinator.start_up().await.unwrap();

        assert_eq!(settings.completion, CompletionRecord::default());
        assert_eq!(
            settings_storage
                .read_settings()
                .await
                .unwrap()
                .unwrap()
                .completion,
            CompletionRecord::default()
        );
    }

    #[tokio::test]
    async fn bedtime_change_never_touches_completion() {
        let coordinator = coordinator_with(Arc::new(InMemorySettingsStorage::new()));
        coordinator.start_up().await.unwrap();
        let closed = coordinator.close_day().await.unwrap();

        coordinator.update_bedtime(23, 15).await.unwrap();

        let settings = coordinator.current_settings().await.unwrap();
        assert_eq!(settings.bedtime, ReminderTarget::new(23, 15).unwrap());
        assert_eq!(settings.completion, closed.completion);
    }

    #[tokio::test]
    async fn close_day_marks_completed_and_unchecks_items() {
        let settings_storage = Arc::new(InMemorySettingsStorage::new());
        let coordinator = coordinator_with(settings_storage.clone());
        coordinator.start_up().await.unwrap();

        let items = coordinator.calm_items().await.unwrap();
        coordinator.toggle_calm_item(items[0].id).await.unwrap();

        let settings = coordinator.close_day().await.unwrap();

        assert!(settings.completion.completed);
        assert_eq!(
            settings.completion.completion_date,
            Some(Local::now().date_naive())
        );
        assert!(
            settings_storage
                .read_settings()
                .await
                .unwrap()
                .unwrap()
                .completion
                .completed
        );
        assert!(
            coordinator
                .calm_items()
                .await
                .unwrap()
                .iter()
                .all(|item| !item.checked)
        );
    }

    #[tokio::test]
    async fn close_day_keeps_the_memory_state_when_persisting_fails() {
        let coordinator = coordinator_with(Arc::new(FailingSettingsStorage));

        assert!(coordinator.close_day().await.is_err());

        // Optimistic update: the in-memory transition survives the write.
        let settings = coordinator.current_settings().await.unwrap();
        assert!(settings.completion.completed);
    }

    #[tokio::test]
    async fn close_then_read_on_the_same_day_stays_completed() {
        let coordinator = coordinator_with(Arc::new(InMemorySettingsStorage::new()));
        coordinator.start_up().await.unwrap();

        coordinator.close_day().await.unwrap();
        let settings = coordinator.current_settings().await.unwrap();

        assert!(settings.completion.completed);
    }

    #[tokio::test]
    async fn trust_mode_toggle_persists_and_touches_nothing_else() {
        let settings_storage = Arc::new(InMemorySettingsStorage::new());
        let coordinator = coordinator_with(settings_storage.clone());
        coordinator.start_up().await.unwrap();

        coordinator.update_trust_mode(true).await.unwrap();

        let settings = coordinator.current_settings().await.unwrap();
        assert!(settings.trust_mode_enabled);
        assert_eq!(settings.bedtime, ReminderTarget::default());
        assert_eq!(settings.completion, CompletionRecord::default());
        assert!(
            settings_storage
                .read_settings()
                .await
                .unwrap()
                .unwrap()
                .trust_mode_enabled
        );
    }

    #[tokio::test]
    async fn update_bedtime_rejects_out_of_range_values() {
        let coordinator = coordinator_with(Arc::new(InMemorySettingsStorage::new()));

        assert!(coordinator.update_bedtime(24, 0).await.is_err());
        assert!(coordinator.update_bedtime(8, 60).await.is_err());
    }

    #[tokio::test]
    async fn blank_calm_items_are_ignored() {
        let coordinator = coordinator_with(Arc::new(InMemorySettingsStorage::new()));

        assert!(coordinator.add_calm_item("   ").await.unwrap().is_none());

        let added = coordinator.add_calm_item("Doors are locked.").await.unwrap();
        assert_eq!(added.unwrap().order, 0);
    }
}
