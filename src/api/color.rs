use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Series, ThresholdLevel};

use super::chart_config::ChartType;

/// Fully transparent white, used whenever no colour can be resolved.
pub const TRANSPARENT: &str = "#ffffff00";

/// Palette cycled when neither the caller nor the theme provides colours.
pub const DEFAULT_COLORS: [&str; 12] = [
    "oklch(0.70 0.24 293)",
    "oklch(0.85 0.18 95)",
    "oklch(0.65 0.25 255)",
    "oklch(0.72 0.26 27)",
    "oklch(0.70 0.22 150)",
    "oklch(0.78 0.18 50)",
    "oklch(0.72 0.18 215)",
    "oklch(0.70 0.27 301)",
    "oklch(0.75 0.20 90)",
    "oklch(0.68 0.23 277)",
    "oklch(0.70 0.18 193)",
    "oklch(0.68 0.25 4)",
];

const FILL_ALPHA: &str = " / 0.4)";
const THEME_SERIES_SLOTS: usize = 12;

/// `(series, index, chart type, filling) -> colour`.
pub type ColorFn = Arc<dyn Fn(&Series, usize, ChartType, bool) -> String + Send + Sync + 'static>;
/// Per-sample colour, keyed by sample index.
pub type PositionColorFn = Arc<dyn Fn(usize) -> String + Send + Sync + 'static>;

/// Caller-provided series colours.
#[derive(Clone)]
pub enum ColorResolver {
    /// One colour per series, used for both stroke and fill.
    Static(Vec<String>),
    /// Separate fill and border lists.
    Split { fill: Vec<String>, border: Vec<String> },
    Computed(ColorFn),
}

impl fmt::Debug for ColorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(colors) => f.debug_tuple("Static").field(colors).finish(),
            Self::Split { fill, border } => f
                .debug_struct("Split")
                .field("fill", fill)
                .field("border", border)
                .finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl ColorResolver {
    fn resolve(
        &self,
        series: &Series,
        index: usize,
        chart_type: ChartType,
        filling: bool,
    ) -> Option<String> {
        match self {
            Self::Static(colors) => colors.get(index).cloned(),
            Self::Split { fill, border } => {
                let colors = if filling { fill } else { border };
                colors.get(index).cloned()
            }
            Self::Computed(resolve) => Some(resolve(series, index, chart_type, filling)),
        }
    }
}

/// Colour variables exported by the host theme (`serie-color-1`,
/// `threshold-warning`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeVariables(IndexMap<String, String>);

impl ThemeVariables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Trimmed value of `name`; blank values count as unset.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Series stroke: one colour, or a colour chosen per sample.
#[derive(Clone)]
pub enum Stroke {
    Static(String),
    Dynamic(PositionColorFn),
}

impl Stroke {
    #[must_use]
    pub fn color_at(&self, index: usize) -> String {
        match self {
            Self::Static(color) => color.clone(),
            Self::Dynamic(color_at) => color_at(index),
        }
    }
}

impl fmt::Debug for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(color) => f.debug_tuple("Static").field(color).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl PartialEq for Stroke {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(left), Self::Static(right)) => left == right,
            (Self::Dynamic(left), Self::Dynamic(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

/// Colour for series `index`.
///
/// Caller colours win, then theme variables, then [`DEFAULT_COLORS`]. Fills
/// of bar and area charts use the solid theme colour, or the palette colour
/// at 40% alpha; other chart types fill with the theme's fill variable.
#[must_use]
pub fn resolve_series_color(
    series: &Series,
    index: usize,
    colors: Option<&ColorResolver>,
    chart_type: ChartType,
    theme: &ThemeVariables,
    filling: bool,
) -> String {
    if let Some(colors) = colors {
        return colors
            .resolve(series, index, chart_type, filling)
            .unwrap_or_else(|| TRANSPARENT.to_owned());
    }

    let use_solid = chart_type.is_stacked();
    let slot = index % THEME_SERIES_SLOTS + 1;
    let variable = if filling && !use_solid {
        format!("serie-fill-color-{slot}")
    } else {
        format!("serie-color-{slot}")
    };
    if let Some(color) = theme.get(&variable) {
        return color.to_owned();
    }

    let base = DEFAULT_COLORS[index % DEFAULT_COLORS.len()];
    if filling && use_solid {
        base.replacen(')', FILL_ALPHA, 1)
    } else {
        base.to_owned()
    }
}

/// Stroke colour of a threshold at `level`, falling back to `threshold-default`.
#[must_use]
pub fn threshold_color(theme: &ThemeVariables, level: Option<ThresholdLevel>) -> String {
    themed_threshold_color(theme, level, "")
}

/// Fill colour of a range threshold band at `level`.
#[must_use]
pub fn threshold_fill_color(theme: &ThemeVariables, level: Option<ThresholdLevel>) -> String {
    themed_threshold_color(theme, level, "-fill")
}

fn themed_threshold_color(
    theme: &ThemeVariables,
    level: Option<ThresholdLevel>,
    suffix: &str,
) -> String {
    level
        .and_then(|level| theme.get(&format!("threshold-{}{suffix}", level.as_str())))
        .or_else(|| theme.get(&format!("threshold-default{suffix}")))
        .unwrap_or(TRANSPARENT)
        .to_owned()
}
