mod backend;
mod scheduler;
mod tokio_backend;

pub use backend::{CapabilityProbe, InstallError, SchedulingBackend, SchedulingTier};
pub use scheduler::{ArmedTrigger, ReminderScheduler, SchedulingFailed};
pub use tokio_backend::TimerBackend;
