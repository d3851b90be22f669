use chrono::{Datelike, Timelike};

/// Caption title for `now`, e.g. `2024年3月10日  星期0  09:05`.
///
/// Weekdays count from Sunday (0) to Saturday (6).
pub fn title_for<T: Datelike + Timelike>(now: &T) -> String {
    format!(
        "{}年{}月{}日  星期{}  {:02}:{:02}",
        now.year(),
        now.month(),
        now.day(),
        now.weekday().num_days_from_sunday(),
        now.hour(),
        now.minute()
    )
}
