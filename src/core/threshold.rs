use serde::{Deserialize, Serialize};

/// Severity used to pick a threshold's colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdLevel {
    Info,
    Warning,
    Error,
    Ok,
}

impl ThresholdLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Ok => "ok",
        }
    }
}

/// Stroke style of a threshold reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdLineStyle {
    #[serde(rename = "line", alias = "solid")]
    Solid,
    #[default]
    Dashed,
    Bold,
}

impl ThresholdLineStyle {
    #[must_use]
    pub const fn stroke_width(self) -> f64 {
        match self {
            Self::Bold => 2.0,
            Self::Solid | Self::Dashed => 1.0,
        }
    }

    /// Dash pattern in pixels; `None` draws a continuous line.
    #[must_use]
    pub const fn dash(self) -> Option<[f64; 2]> {
        match self {
            Self::Solid => None,
            Self::Dashed | Self::Bold => Some([5.0, 5.0]),
        }
    }
}

/// Horizontal reference overlay drawn on top of the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    /// Single reference line at `value`.
    Line {
        value: f64,
        #[serde(default, rename = "type")]
        style: Option<ThresholdLineStyle>,
        #[serde(default)]
        level: Option<ThresholdLevel>,
        #[serde(default)]
        label: Option<String>,
    },
    /// Shaded band between `from` and `to`; a missing `to` leaves the upper
    /// edge absent.
    Range {
        from: f64,
        #[serde(default)]
        to: Option<f64>,
        #[serde(default, rename = "type")]
        style: Option<ThresholdLineStyle>,
        #[serde(default)]
        level: Option<ThresholdLevel>,
        #[serde(default)]
        label: Option<String>,
    },
}

impl Threshold {
    #[must_use]
    pub fn line(value: f64) -> Self {
        Self::Line {
            value,
            style: None,
            level: None,
            label: None,
        }
    }

    #[must_use]
    pub fn range(from: f64, to: f64) -> Self {
        Self::Range {
            from,
            to: Some(to),
            style: None,
            level: None,
            label: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, new_level: ThresholdLevel) -> Self {
        match &mut self {
            Self::Line { level, .. } | Self::Range { level, .. } => *level = Some(new_level),
        }
        self
    }

    #[must_use]
    pub fn with_style(mut self, new_style: ThresholdLineStyle) -> Self {
        match &mut self {
            Self::Line { style, .. } | Self::Range { style, .. } => *style = Some(new_style),
        }
        self
    }

    #[must_use]
    pub fn level(&self) -> Option<ThresholdLevel> {
        match self {
            Self::Line { level, .. } | Self::Range { level, .. } => *level,
        }
    }

    #[must_use]
    pub fn style(&self) -> ThresholdLineStyle {
        match self {
            Self::Line { style, .. } | Self::Range { style, .. } => style.unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Line { label, .. } | Self::Range { label, .. } => label.as_deref(),
        }
    }

    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Number of synthetic columns this threshold contributes.
    #[must_use]
    pub fn column_count(&self) -> usize {
        match self {
            Self::Line { .. } => 1,
            Self::Range { .. } => 2,
        }
    }

    /// Flat columns of length `len`, in plotting order.
    #[must_use]
    pub fn synthetic_columns(&self, len: usize) -> Vec<Vec<Option<f64>>> {
        match self {
            Self::Line { value, .. } => vec![vec![Some(*value); len]],
            Self::Range { from, to, .. } => vec![vec![Some(*from); len], vec![*to; len]],
        }
    }
}
