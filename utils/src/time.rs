//! Time formatting helpers.

use std::time::Duration;

/// Format a duration to a short human-readable string.
pub fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let secs = elapsed.as_secs();
    if secs == 0 {
        format!("{millis}ms")
    } else if secs < 60 {
        format!("{}.{}s", secs, (millis % 1000) / 100)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
