use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::time_unit::{MILLIS_PER_SECOND, TICK_SCALE_UNITS, TimeUnit};
use crate::core::nice_step;

use super::axis_config::{
    TimeZoneSpec, ValueAxisStyle, time_axis_tick_spacing_px, value_axis_tick_spacing_px,
};
use super::axis_label_format::{
    estimate_label_text_width_px, format_time_ago, format_time_labels, format_value_label,
};
use super::value_format::ValueFormatterFn;

const SECONDS_PER_HOUR: f64 = 3_600.0;
const MAX_VALUE_TICKS: usize = 64;

/// Chosen time-axis tick step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeIncrement {
    pub increment_ms: f64,
    pub multiplier: u32,
    pub unit: TimeUnit,
}

impl TimeIncrement {
    #[must_use]
    pub fn seconds(self) -> f64 {
        self.increment_ms / MILLIS_PER_SECOND
    }
}

/// Smallest "nice" increment whose duration is at least `target_seconds`.
///
/// Scans seconds through years in order; targets beyond a century get the
/// largest year increment.
#[must_use]
pub fn select_increment(target_seconds: f64) -> TimeIncrement {
    for unit in TICK_SCALE_UNITS {
        for multiplier in unit.increments() {
            let seconds = unit.size_seconds() * f64::from(*multiplier);
            if seconds >= target_seconds {
                return TimeIncrement {
                    increment_ms: seconds * MILLIS_PER_SECOND,
                    multiplier: *multiplier,
                    unit,
                };
            }
        }
    }

    let unit = TimeUnit::Year;
    let multiplier = unit.increments().last().copied().unwrap_or(1);
    TimeIncrement {
        increment_ms: unit.size_ms() * f64::from(multiplier),
        multiplier,
        unit,
    }
}

/// Time-axis tick positions (seconds) with their labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XAxisTicks {
    pub splits: Vec<f64>,
    pub labels: Vec<String>,
    /// `None` for the relative axis, which has no regular step.
    pub increment: Option<TimeIncrement>,
}

/// Inputs for planning the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxisRequest {
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub plot_width_px: f64,
    pub zone: TimeZoneSpec,
    pub relative: bool,
    pub now_ms: f64,
}

/// Plans time-axis ticks for the visible range.
///
/// The relative axis has exactly two ticks at the range ends labelled with
/// "time ago" phrases. Otherwise ticks fall on multiples of the selected
/// increment; increments of an hour or more align to the zone's wall clock.
#[must_use]
pub fn plan_time_axis_ticks(request: TimeAxisRequest) -> XAxisTicks {
    let TimeAxisRequest {
        min_seconds: min,
        max_seconds: max,
        plot_width_px,
        zone,
        relative,
        now_ms,
    } = request;
    if !min.is_finite() || !max.is_finite() || max < min {
        return XAxisTicks::default();
    }

    if relative {
        let splits = vec![min, max];
        let labels = splits
            .iter()
            .map(|split| format_time_ago(split * MILLIS_PER_SECOND, now_ms))
            .collect();
        return XAxisTicks {
            splits,
            labels,
            increment: None,
        };
    }

    let range = max - min;
    let spacing = time_axis_tick_spacing_px(plot_width_px);
    let approx_ticks = (plot_width_px / spacing).floor().max(1.0);
    let increment = select_increment(range / approx_ticks);
    let step = increment.seconds();

    let offset = if step >= SECONDS_PER_HOUR {
        f64::from(zone.offset_seconds_at(min))
    } else {
        0.0
    };
    let mut splits = Vec::new();
    let mut tick = ((min + offset) / step).ceil() * step - offset;
    while tick <= max {
        splits.push(tick);
        tick += step;
    }

    let splits_ms: Vec<f64> = splits.iter().map(|split| split * MILLIS_PER_SECOND).collect();
    let labels = format_time_labels(
        &splits_ms,
        increment.increment_ms,
        range * MILLIS_PER_SECOND,
        zone,
    );
    trace!(
        ticks = splits.len(),
        increment_ms = increment.increment_ms,
        "planned time axis"
    );

    XAxisTicks {
        splits,
        labels,
        increment: Some(increment),
    }
}

/// Value-axis tick values with labels and the axis width they need.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YAxisTicks {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    pub step: f64,
    pub size_px: f64,
}

/// Plans value-axis ticks between `min` and `max` on nice-step multiples.
#[must_use]
pub fn plan_value_axis_ticks(
    min: f64,
    max: f64,
    plot_height_px: f64,
    formatter: &ValueFormatterFn,
    style: ValueAxisStyle,
) -> YAxisTicks {
    if !min.is_finite() || !max.is_finite() || max < min {
        return YAxisTicks::default();
    }

    let spacing = value_axis_tick_spacing_px(plot_height_px);
    let approx_ticks = (plot_height_px / spacing).floor().max(1.0);
    let step = nice_step((max - min) / approx_ticks);

    let values = if step > 0.0 {
        let first = (min / step).ceil();
        let tolerance = step * 1e-9;
        (0..MAX_VALUE_TICKS)
            .map(|offset| (first + offset as f64) * step)
            .take_while(|value| *value <= max + tolerance)
            .collect()
    } else {
        vec![min]
    };

    let labels: Vec<String> = values
        .iter()
        .map(|value| format_value_label(formatter, *value))
        .collect();
    let size_px = value_axis_size_px(&labels, style);

    YAxisTicks {
        values,
        labels,
        step,
        size_px,
    }
}

/// Axis width: tick size plus gap plus the estimated width of the longest label.
#[must_use]
pub fn value_axis_size_px(labels: &[String], style: ValueAxisStyle) -> f64 {
    let longest = labels.iter().fold("", |longest, label| {
        if label.chars().count() > longest.chars().count() {
            label.as_str()
        } else {
            longest
        }
    });
    let label_width = estimate_label_text_width_px(longest, style.font_size_px);
    (style.tick_size_px + style.gap_px + label_width).ceil()
}
