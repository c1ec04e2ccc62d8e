use serde::{Deserialize, Serialize};

use super::nice_step::{DEFAULT_TARGET_TICKS, nice_ceil};

/// Range used when every observed value is exactly zero.
pub const EMPTY_DATA_RANGE: (f64, f64) = (0.0, 100.0);

/// Headroom added above the observed maximum (and below a negative minimum).
const RANGE_PADDING_RATIO: f64 = 1.0;

/// Values below this are "sub-unity" and get a `[.., 1]` axis.
const SUB_UNITY_MAX: f64 = 0.9999;

/// Builds the value-axis `[min, max]` from observed data extremes.
///
/// Explicit `predefined_min` / `predefined_max` always win over the computed
/// bound on the same side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRangeBuilder {
    unit: Option<String>,
    predefined_min: Option<f64>,
    predefined_max: Option<f64>,
    target_ticks: u32,
}

impl ValueRangeBuilder {
    #[must_use]
    pub fn new(unit: Option<&str>, predefined_min: Option<f64>, predefined_max: Option<f64>) -> Self {
        Self {
            unit: unit.map(str::to_owned),
            predefined_min,
            predefined_max,
            target_ticks: DEFAULT_TARGET_TICKS,
        }
    }

    #[must_use]
    pub fn with_target_ticks(mut self, target_ticks: u32) -> Self {
        self.target_ticks = target_ticks.max(1);
        self
    }

    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Resolves the axis range for the observed `[data_min, data_max]`.
    #[must_use]
    pub fn resolve(&self, data_min: f64, data_max: f64) -> (f64, f64) {
        if data_min == 0.0 && data_max == 0.0 {
            return self.finish(EMPTY_DATA_RANGE.0, EMPTY_DATA_RANGE.1);
        }

        let padded_max = data_max * (1.0 + RANGE_PADDING_RATIO);
        let padded_min = if data_min < 0.0 {
            data_min * (1.0 + RANGE_PADDING_RATIO)
        } else {
            0.0
        };

        if let Some(ceiling) = self.percent_ceiling() {
            let min = if data_min < 0.0 { padded_min } else { 0.0 };
            let max = if data_max > ceiling { padded_max } else { ceiling };
            return self.finish(min, max);
        }

        if data_max <= SUB_UNITY_MAX {
            let min = if data_min <= 0.0 { padded_min } else { 0.0 };
            return self.finish(min, 1.0);
        }

        let nice_max = nice_ceil(padded_max, self.target_ticks);
        if data_min < 0.0 {
            let nice_min = nice_ceil(padded_min.abs(), self.target_ticks);
            return self.finish(-nice_min, nice_max);
        }

        self.finish(0.0, nice_max)
    }

    fn percent_ceiling(&self) -> Option<f64> {
        match self.unit.as_deref() {
            Some("percent") => Some(100.0),
            Some("percentunit") => Some(1.0),
            _ => None,
        }
    }

    fn finish(&self, min: f64, max: f64) -> (f64, f64) {
        (
            self.predefined_min.unwrap_or(min),
            self.predefined_max.unwrap_or(max),
        )
    }
}
