use std::fmt;

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Time zone used for axis labels, tooltip headers and day-boundary checks.
///
/// Parsed from `"UTC"`, an IANA name (`"Europe/Madrid"`), a fixed offset
/// (`"+05:30"`) or `"local"`. Absent configuration means the host's local zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZoneSpec {
    #[default]
    Local,
    Utc,
    FixedOffsetMinutes {
        minutes: i16,
    },
    Named(Tz),
}

impl TimeZoneSpec {
    pub fn parse(input: &str) -> ChartResult<Self> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Self::Utc);
        }
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if let Some(minutes) = parse_offset_minutes(trimmed) {
            return Ok(Self::FixedOffsetMinutes { minutes });
        }
        trimmed
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| ChartError::InvalidTimeZone(trimmed.to_owned()))
    }

    /// Resolves an optional configured zone, defaulting to local time.
    pub fn resolve(input: Option<&str>) -> ChartResult<Self> {
        input.map_or(Ok(Self::Local), Self::parse)
    }

    /// Wall-clock date-time for a unix timestamp in milliseconds.
    #[must_use]
    pub fn datetime_from_millis(self, millis: f64) -> Option<DateTime<FixedOffset>> {
        if !millis.is_finite() {
            return None;
        }
        let utc = Utc.timestamp_millis_opt(millis.round() as i64).single()?;
        Some(match self {
            Self::Local => utc.with_timezone(&Local).fixed_offset(),
            Self::Utc => utc.fixed_offset(),
            Self::FixedOffsetMinutes { minutes } => {
                let offset = FixedOffset::east_opt(i32::from(minutes) * 60)?;
                utc.with_timezone(&offset)
            }
            Self::Named(tz) => utc.with_timezone(&tz).fixed_offset(),
        })
    }

    /// Wall-clock date-time for a unix timestamp in seconds.
    #[must_use]
    pub fn datetime_from_seconds(self, seconds: f64) -> Option<DateTime<FixedOffset>> {
        self.datetime_from_millis(seconds * 1_000.0)
    }

    /// UTC offset in seconds in effect at `seconds`.
    #[must_use]
    pub fn offset_seconds_at(self, seconds: f64) -> i32 {
        self.datetime_from_seconds(seconds)
            .map_or(0, |dt| dt.offset().local_minus_utc())
    }
}

impl fmt::Display for TimeZoneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Utc => f.write_str("UTC"),
            Self::FixedOffsetMinutes { minutes } => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let abs = minutes.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
            }
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl TryFrom<String> for TimeZoneSpec {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeZoneSpec> for String {
    fn from(value: TimeZoneSpec) -> Self {
        value.to_string()
    }
}

fn parse_offset_minutes(input: &str) -> Option<i16> {
    let (sign, rest) = match input.as_bytes().first()? {
        b'+' => (1, &input[1..]),
        b'-' => (-1, &input[1..]),
        _ => return None,
    };
    if !rest.is_ascii() {
        return None;
    }
    let (hours, minutes) = match rest.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i16 = hours.parse().ok()?;
    let minutes: i16 = minutes.parse().ok()?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

/// Axis tick spacing used for the time axis, by plot width.
#[must_use]
pub fn time_axis_tick_spacing_px(plot_width_px: f64) -> f64 {
    if plot_width_px < 400.0 {
        100.0
    } else if plot_width_px < 800.0 {
        150.0
    } else {
        250.0
    }
}

/// Axis tick spacing used for the value axis, by plot height.
#[must_use]
pub fn value_axis_tick_spacing_px(plot_height_px: f64) -> f64 {
    if plot_height_px <= 100.0 {
        30.0
    } else if plot_height_px <= 150.0 {
        35.0
    } else if plot_height_px <= 200.0 {
        45.0
    } else if plot_height_px <= 250.0 {
        55.0
    } else if plot_height_px <= 300.0 {
        60.0
    } else {
        70.0
    }
}

/// Static sizing of the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueAxisStyle {
    pub tick_size_px: f64,
    pub gap_px: f64,
    pub font_size_px: f64,
}

impl Default for ValueAxisStyle {
    fn default() -> Self {
        Self {
            tick_size_px: 10.0,
            gap_px: 0.0,
            font_size_px: 11.0,
        }
    }
}

/// Fixed height of the time axis strip.
pub const TIME_AXIS_SIZE_PX: f64 = 20.0;
