use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BEDTIME_HOUR: u32 = 22;
pub const DEFAULT_BEDTIME_MINUTE: u32 = 30;

pub const DEFAULT_CALM_ITEMS: [&str; 4] = [
    "Home feels safe.",
    "Kitchen is settled.",
    "Water's off, day's off.",
    "Mind ready for rest.",
];

#[derive(Debug, Error)]
#[error("bedtime out of range: {hour}:{minute}")]
pub struct InvalidTarget {
    pub hour: u32,
    pub minute: u32,
}

/// Wall-clock time of day the bedtime reminder should fire at. Never an
/// absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TargetRepr", into = "TargetRepr")]
pub struct ReminderTarget(NaiveTime);

impl ReminderTarget {
    pub fn new(hour: u32, minute: u32) -> Result<Self, InvalidTarget> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or(InvalidTarget { hour, minute })
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl Default for ReminderTarget {
    fn default() -> Self {
        Self::new(DEFAULT_BEDTIME_HOUR, DEFAULT_BEDTIME_MINUTE).expect("Will never fail.")
    }
}

#[derive(Serialize, Deserialize, Clone, Copy)]
struct TargetRepr {
    hour: u32,
    minute: u32,
}

impl TryFrom<TargetRepr> for ReminderTarget {
    type Error = InvalidTarget;

    fn try_from(repr: TargetRepr) -> Result<Self, Self::Error> {
        Self::new(repr.hour, repr.minute)
    }
}

impl From<ReminderTarget> for TargetRepr {
    fn from(target: ReminderTarget) -> Self {
        Self {
            hour: target.hour(),
            minute: target.minute(),
        }
    }
}

/// Per-day completion flag. `completed == true` implies both the time and
/// the date are present; `false` implies both are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub completed: bool,
    pub completion_time: Option<String>,
    pub completion_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub bedtime: ReminderTarget,
    pub completion: CompletionRecord,
    pub trust_mode_enabled: bool,
}

impl Settings {
    pub fn with_bedtime(bedtime: ReminderTarget) -> Self {
        Self {
            bedtime,
            completion: CompletionRecord::default(),
            trust_mode_enabled: false,
        }
    }
}

pub type CalmItemId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalmItem {
    pub id: CalmItemId,
    pub text: String,
    pub order: u32,
    pub checked: bool,
}
