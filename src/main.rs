use std::sync::Arc;

use winddown::appsettings;
use winddown::delivery::{LogDelivery, ReminderDelivery};
use winddown::scheduling::{
    CapabilityProbe, ReminderScheduler, SchedulingBackend, SchedulingTier, TimerBackend,
};
use winddown::storage::{InMemoryCalmItemStorage, InMemorySettingsStorage};
use winddown::{Coordinator, ReminderTarget};

// In-process builds always allow exact timers; a platform adapter would
// ask the OS here.
struct AlwaysExact;

impl CapabilityProbe for AlwaysExact {
    fn can_schedule_exactly(&self) -> bool {
        true
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let defaults = appsettings::get();
    let default_bedtime = ReminderTarget::new(defaults.reminder.hour, defaults.reminder.minute)?;

    let delivery: Arc<dyn ReminderDelivery> = Arc::new(LogDelivery);
    let backends: Vec<Arc<dyn SchedulingBackend>> = vec![
        Arc::new(TimerBackend::new(
            SchedulingTier::Precise,
            Arc::clone(&delivery),
        )),
        Arc::new(TimerBackend::new(
            SchedulingTier::BestEffort,
            Arc::clone(&delivery),
        )),
        Arc::new(TimerBackend::new(
            SchedulingTier::Deferred,
            Arc::clone(&delivery),
        )),
    ];
    let scheduler = Arc::new(ReminderScheduler::new(backends, Arc::new(AlwaysExact)));

    let coordinator = Coordinator::new(
        Arc::new(InMemorySettingsStorage::new()),
        Arc::new(InMemoryCalmItemStorage::new()),
        scheduler,
        default_bedtime,
    );

    let settings = coordinator.start_up().await?;
    log::info!(
        "Wind-down reminder armed for {:02}:{:02}",
        settings.bedtime.hour(),
        settings.bedtime.minute()
    );

    tokio::signal::ctrl_c().await?;
    coordinator.shutdown().await;

    Ok(())
}
