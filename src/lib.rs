pub mod appsettings;
pub mod completion;
pub mod coordinator;
pub mod delivery;
pub mod model;
pub mod scheduling;
pub mod storage;
pub mod trigger_time;

pub use coordinator::Coordinator;
pub use model::{CalmItem, CalmItemId, CompletionRecord, ReminderTarget, Settings};
pub use scheduling::{
    CapabilityProbe, ReminderScheduler, SchedulingBackend, SchedulingFailed, SchedulingTier,
    TimerBackend,
};
