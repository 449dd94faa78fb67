const SECOND_MS: u64 = 1_000;
const MINUTE_MS: u64 = 60 * SECOND_MS;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Formats a millisecond duration as `"Dd Hh Mmin Ssec"`.
///
/// Leading zero units are dropped; seconds are always shown. Days, minutes
/// and seconds are floored, hours are rounded to the nearest hour.
pub fn format_duration(duration_ms: u64) -> String {
    let days = duration_ms / DAY_MS;
    let rest = duration_ms % DAY_MS;
    let hours = (rest + HOUR_MS / 2) / HOUR_MS;
    let minutes = (rest % HOUR_MS) / MINUTE_MS;
    let seconds = (rest % MINUTE_MS) / SECOND_MS;

    if days == 0 && hours == 0 && minutes == 0 {
        format!("{seconds}sec")
    } else if days == 0 && hours == 0 {
        format!("{minutes}min {seconds}sec")
    } else if days == 0 {
        format!("{hours}h {minutes}min {seconds}sec")
    } else {
        format!("{days}d{hours}h {minutes}min {seconds}sec")
    }
}
