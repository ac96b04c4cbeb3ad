// src/common/timing.rs

use core::time::Duration;

/// Length of one publish-period unit.
pub const MINUTE: Duration = Duration::from_secs(60);

/// Publish period used when nothing valid is persisted.
pub const DEFAULT_PUBLISH_PERIOD_MIN: u8 = 1;

/// Converts a publish period in minutes into a timer duration.
///
/// Returns `None` for 0, which disables periodic publishing.
pub const fn period_duration(minutes: u8) -> Option<Duration> {
    if minutes == 0 {
        None
    } else {
        Some(Duration::from_secs(MINUTE.as_secs() * minutes as u64))
    }
}
