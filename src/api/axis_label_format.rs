use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use crate::core::time_unit::{MILLIS_PER_DAY, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, MILLIS_PER_YEAR};

use super::axis_config::TimeZoneSpec;
use super::value_format::ValueFormatterFn;

const YEAR_INTERVAL_PATTERN: &str = "%Y";
const DAY_INTERVAL_PATTERN: &str = "%m/%d";
const MONTH_START_PATTERN: &str = "%b %Y";
const MONTH_DAY_PATTERN: &str = "%b %-d";
const MIDNIGHT_PATTERN: &str = "%b %d";

/// Labels for time-axis splits (milliseconds) at a given tick increment.
///
/// Increments above a week use calendar labels; anything shorter uses a
/// wall-clock label whose precision follows the increment. A non-positive
/// increment is derived from the visible range instead.
#[must_use]
pub fn format_time_labels(
    splits_ms: &[f64],
    increment_ms: f64,
    visible_range_ms: f64,
    zone: TimeZoneSpec,
) -> Vec<String> {
    let increment_ms = if increment_ms.is_finite() && increment_ms > 0.0 {
        increment_ms
    } else {
        let approx = splits_ms.len().max(1) as f64;
        super::axis_ticks::select_increment(visible_range_ms / 1_000.0 / approx).increment_ms
    };

    splits_ms
        .iter()
        .map(|split| {
            zone.datetime_from_millis(*split).map_or_else(
                || "nan".to_owned(),
                |local| format_time_label(local, increment_ms),
            )
        })
        .collect()
}

fn format_time_label(local: DateTime<FixedOffset>, increment_ms: f64) -> String {
    if increment_ms > 7.0 * MILLIS_PER_DAY {
        let year_rounded = (MILLIS_PER_YEAR / MILLIS_PER_DAY).round();
        let increment_rounded = (increment_ms / MILLIS_PER_DAY).round();
        let pattern = if increment_rounded == year_rounded {
            YEAR_INTERVAL_PATTERN
        } else if increment_ms <= MILLIS_PER_YEAR {
            if local.day() == 1 {
                MONTH_START_PATTERN
            } else {
                MONTH_DAY_PATTERN
            }
        } else {
            DAY_INTERVAL_PATTERN
        };
        return local.format(pattern).to_string();
    }

    let show_seconds = increment_ms < MILLIS_PER_MINUTE;
    let show_millis = increment_ms < MILLIS_PER_SECOND;
    if local.hour() == 0 && local.minute() == 0 && !show_seconds {
        return local.format(MIDNIGHT_PATTERN).to_string();
    }

    let pattern = match (show_seconds, show_millis) {
        (_, true) => "%H:%M:%S%.3f",
        (true, false) => "%H:%M:%S",
        (false, false) => "%H:%M",
    };
    local.format(pattern).to_string()
}

/// Humanized distance between `timestamp_ms` and `now_ms`
/// (`"5 minutes ago"`, `"in a day"`).
#[must_use]
pub fn format_time_ago(timestamp_ms: f64, now_ms: f64) -> String {
    if !timestamp_ms.is_finite() || !now_ms.is_finite() {
        return String::new();
    }

    let delta_seconds = (now_ms - timestamp_ms) / 1_000.0;
    let phrase = humanize_seconds(delta_seconds.abs());
    if delta_seconds >= 0.0 {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

fn humanize_seconds(seconds: f64) -> String {
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    if seconds < 45.0 {
        "a few seconds".to_owned()
    } else if seconds < 90.0 {
        "a minute".to_owned()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes.round())
    } else if minutes < 90.0 {
        "an hour".to_owned()
    } else if hours < 22.0 {
        format!("{} hours", hours.round())
    } else if hours < 36.0 {
        "a day".to_owned()
    } else if days < 26.0 {
        format!("{} days", days.round())
    } else if days < 45.0 {
        "a month".to_owned()
    } else if days < 320.0 {
        format!("{} months", (days / 30.4).round().max(2.0))
    } else if days < 548.0 {
        "a year".to_owned()
    } else {
        format!("{} years", (days / 365.0).round().max(2.0))
    }
}

/// Value-axis label: formatter text followed by its trimmed suffix.
#[must_use]
pub fn format_value_label(formatter: &ValueFormatterFn, value: f64) -> String {
    let formatted = formatter(value);
    let mut label = formatted.text;
    label.push_str(formatted.suffix.trim());
    label
}

/// Deterministic width estimate for a label rendered at `font_size_px`.
#[must_use]
pub fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            'M' | 'W' | 'm' | 'w' => 0.86,
            _ => 0.58,
        }
    });
    if text.is_empty() {
        return 0.0;
    }
    (units * font_size_px).max(font_size_px)
}
