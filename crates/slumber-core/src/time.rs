//! Minecraft day-cycle arithmetic.

pub const DAY_START: i64 = 0;
pub const NOON: i64 = 6000;
pub const SUNSET_START: i64 = 12000;
pub const NIGHT_START: i64 = 13000;
pub const MIDNIGHT: i64 = 18000;
pub const SUNRISE_START: i64 = 23000;
pub const DAY_LENGTH: i64 = 24000;

/// Time of day a skipped night lands on.
pub const MORNING_TIME: i64 = 1000;

/// Wall-clock length of one server tick.
pub const TICK_MILLIS: u64 = 50;

/// Convert server ticks to milliseconds.
pub fn ticks_to_millis(ticks: u64) -> u64 {
    ticks.saturating_mul(TICK_MILLIS)
}

/// Wrap a full world time to a time of day in `0..24000`.
pub fn time_of_day(time: i64) -> i64 {
    time.rem_euclid(DAY_LENGTH)
}

pub fn is_night(time: i64) -> bool {
    let t = time_of_day(time);
    (NIGHT_START..SUNRISE_START).contains(&t)
}

pub fn is_day(time: i64) -> bool {
    !is_night(time)
}

/// Human-readable name for the current part of the day.
pub fn describe(time: i64) -> &'static str {
    match time_of_day(time) {
        t if t < NOON => "Morning",
        t if t < SUNSET_START => "Afternoon",
        t if t < NIGHT_START => "Evening",
        t if t < MIDNIGHT => "Night",
        t if t < SUNRISE_START => "Late Night",
        _ => "Dawn",
    }
}

/// Fraction of the night already passed, or `None` during the day.
pub fn night_progress(time: i64) -> Option<f64> {
    if !is_night(time) {
        return None;
    }
    let elapsed = time_of_day(time) - NIGHT_START;
    Some(elapsed as f64 / (SUNRISE_START - NIGHT_START) as f64)
}

pub fn ticks_until_sunrise(time: i64) -> i64 {
    if is_night(time) {
        SUNRISE_START - time_of_day(time)
    } else {
        0
    }
}

/// The next full time at which the day reads [`MORNING_TIME`].
///
/// Never moves backwards: a world already past morning goes to the next day.
pub fn next_morning(time: i64) -> i64 {
    let mut margin = (MORNING_TIME - time).rem_euclid(DAY_LENGTH);
    if margin == 0 {
        margin = DAY_LENGTH;
    }
    time + margin
}

/// Format a tick count as `"Xm Ys"` or `"Ys"`.
pub fn format_ticks(ticks: u64) -> String {
    let seconds = ticks / 20;
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_window() {
        assert!(!is_night(12999));
        assert!(is_night(13000));
        assert!(is_night(22999));
        assert!(!is_night(23000));
        // Day count does not matter.
        assert!(is_night(24000 * 5 + 18000));
        assert!(is_day(24000 * 5 + 1000));
    }

    #[test]
    fn descriptions() {
        assert_eq!(describe(0), "Morning");
        assert_eq!(describe(6000), "Afternoon");
        assert_eq!(describe(12500), "Evening");
        assert_eq!(describe(13000), "Night");
        assert_eq!(describe(20000), "Late Night");
        assert_eq!(describe(23500), "Dawn");
    }

    #[test]
    fn progress_through_night() {
        assert_eq!(night_progress(6000), None);
        assert_eq!(night_progress(13000), Some(0.0));
        assert_eq!(night_progress(18000), Some(0.5));
        assert_eq!(ticks_until_sunrise(18000), 5000);
        assert_eq!(ticks_until_sunrise(1000), 0);
    }

    #[test]
    fn next_morning_moves_forward() {
        assert_eq!(next_morning(18000), 25000);
        assert_eq!(next_morning(24000 * 3 + 14000), 24000 * 4 + 1000);
        assert_eq!(next_morning(500), 1000);
        assert_eq!(next_morning(1000), 25000);
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_ticks(65), "3s");
        assert_eq!(format_ticks(20 * 90), "1m 30s");
        assert_eq!(ticks_to_millis(65), 3250);
    }
}
