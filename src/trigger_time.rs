use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone};

use crate::model::ReminderTarget;

/// Next absolute instant at which the bedtime target comes up, strictly
/// after `now`. Advances by one calendar day (not a flat 24h) when today's
/// occurrence has already passed, so the result stays on the wall clock
/// across DST transitions.
pub fn next_fire_instant<Tz: TimeZone>(target: &ReminderTarget, now: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.date_naive();

    loop {
        match resolve_local(&tz, date.and_time(target.time())) {
            Some(candidate) if candidate > *now => return candidate,
            _ => {}
        }
        date = date.succ_opt().expect("Not realistic to overflow");
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Some(instant),
        // Fall-back: the wall-clock minute happens twice, take the first.
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        // Spring-forward gap: the wall-clock minute does not exist, slide
        // an hour later.
        LocalResult::None => tz
            .from_local_datetime(&(local + TimeDelta::hours(1)))
            .earliest(),
    }
}
