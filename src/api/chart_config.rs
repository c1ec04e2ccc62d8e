use serde::{Deserialize, Serialize};

use crate::core::Threshold;
use crate::error::{ChartError, ChartResult};

use super::axis_config::TimeZoneSpec;
use super::color::{ColorResolver, ThemeVariables};

/// Number of tooltip rows shown before the rest collapse into a summary.
pub const DEFAULT_VISIBILITY_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    #[default]
    Line,
    Area,
    Step,
    Spline,
}

impl ChartType {
    /// Bar and area charts stack their series.
    #[must_use]
    pub const fn is_stacked(self) -> bool {
        matches!(self, Self::Bar | Self::Area)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipConfig {
    pub hide: bool,
    /// `None` and `Some(0)` keep [`DEFAULT_VISIBILITY_LIMIT`].
    pub visibility_limit: Option<usize>,
}

impl TooltipConfig {
    #[must_use]
    pub fn effective_visibility_limit(self) -> usize {
        self.visibility_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_VISIBILITY_LIMIT)
    }
}

/// Visual options of one chart.
///
/// Serializable so hosts can persist chart setups; caller colours are
/// closures and must be attached with [`ChartVisualConfig::with_colors`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartVisualConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub unit: Option<String>,
    pub fill: bool,
    pub thresholds: Vec<Threshold>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub time_zone: Option<String>,
    pub hide_axis: bool,
    pub hide_cursor: bool,
    pub relative_time_axis: bool,
    pub invert_sort: bool,
    pub disable_suggested_label: bool,
    pub tooltip: TooltipConfig,
    pub theme: ThemeVariables,
    #[serde(skip)]
    pub colors: Option<ColorResolver>,
}

impl ChartVisualConfig {
    #[must_use]
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.thresholds.push(threshold);
        self
    }

    /// Pins the value-axis bounds; `None` leaves a bound data-driven.
    #[must_use]
    pub fn with_value_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    #[must_use]
    pub fn with_hide_axis(mut self, hide_axis: bool) -> Self {
        self.hide_axis = hide_axis;
        self
    }

    #[must_use]
    pub fn with_hide_cursor(mut self, hide_cursor: bool) -> Self {
        self.hide_cursor = hide_cursor;
        self
    }

    #[must_use]
    pub fn with_relative_time_axis(mut self, relative: bool) -> Self {
        self.relative_time_axis = relative;
        self
    }

    #[must_use]
    pub fn with_invert_sort(mut self, invert_sort: bool) -> Self {
        self.invert_sort = invert_sort;
        self
    }

    #[must_use]
    pub fn with_disable_suggested_label(mut self, disable: bool) -> Self {
        self.disable_suggested_label = disable;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = tooltip;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemeVariables) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: ColorResolver) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn resolved_time_zone(&self) -> ChartResult<TimeZoneSpec> {
        TimeZoneSpec::resolve(self.time_zone.as_deref())
    }

    /// Rejects non-finite or inverted fixed bounds and unknown time zones.
    pub fn validate(&self) -> ChartResult<()> {
        for bound in [self.min, self.max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(ChartError::InvalidData(
                    "value axis bounds must be finite".to_owned(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ChartError::InvalidData(format!(
                    "value axis min {min} is above max {max}"
                )));
            }
        }
        self.resolved_time_zone().map(|_| ())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}
