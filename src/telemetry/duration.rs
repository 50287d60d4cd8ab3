//! Duration rendering for telemetry records.

use chrono::{DateTime, Utc};
use std::time::Duration;

const SECS_PER_DAY: u64 = 86_400;

/// Render `elapsed` as `[dd.]hh:mm:ss.fffffff`.
///
/// The fraction is in 100ns ticks derived from whole microseconds. The day
/// prefix only appears once at least one full day has elapsed.
pub fn format_duration(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let days = total_secs / SECS_PER_DAY;
    let hours = (total_secs % SECS_PER_DAY) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let ticks = elapsed.subsec_micros() * 10;

    if days > 0 {
        format!("{:02}.{:02}:{:02}:{:02}.{:07}", days, hours, minutes, seconds, ticks)
    } else {
        format!("{:02}:{:02}:{:02}.{:07}", hours, minutes, seconds, ticks)
    }
}

/// Time between two wall-clock instants, clamped at zero if the clock stepped back.
pub fn elapsed_between(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Duration {
    (finished_at - started_at).to_std().unwrap_or(Duration::ZERO)
}
