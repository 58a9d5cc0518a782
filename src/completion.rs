use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::model::CompletionRecord;

/// "10:42 PM" style, matching what the summary screen shows.
const COMPLETION_TIME_FORMAT: &str = "%-I:%M %p";

impl CompletionRecord {
    /// Close the day. Re-closing an already closed day just overwrites the
    /// timestamp, the caller never sees an error.
    pub fn close<Tz: TimeZone>(&mut self, now: &DateTime<Tz>)
    where
        Tz::Offset: fmt::Display,
    {
        self.completed = true;
        self.completion_time = Some(now.format(COMPLETION_TIME_FORMAT).to_string());
        self.completion_date = Some(now.date_naive());
    }

    /// Reset to pending when the recorded completion date is no longer
    /// today. Evaluated lazily before every user-visible read, never by a
    /// background timer. Returns whether a transition fired.
    pub fn check_rollover(&mut self, today: NaiveDate) -> bool {
        if self.completed && self.completion_date != Some(today) {
            self.completed = false;
            self.completion_time = None;
            self.completion_date = None;
            return true;
        }

        false
    }
}
