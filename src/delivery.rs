use async_trait::async_trait;

/// The core's responsibility ends at asking this collaborator to deliver.
/// Formatting, icons and tap-routing live on the other side.
#[async_trait]
pub trait ReminderDelivery: Send + Sync {
    async fn present_reminder(&self);
}

pub struct LogDelivery;

#[async_trait]
impl ReminderDelivery for LogDelivery {
    async fn present_reminder(&self) {
        log::info!("Time to wind down: review your list and close the day");
    }
}
