use serde::{Deserialize, Serialize};
use tracing::trace;

use super::series::AlignedData;
use super::threshold::Threshold;

/// Which side of the upper column a band fills towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BandDirection {
    /// Fill down from `upper` to `lower`.
    #[default]
    Below,
    /// Fill up from `lower` to `upper`.
    Above,
}

/// Filled region between two value columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upper: usize,
    pub lower: usize,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub direction: BandDirection,
}

impl Band {
    #[must_use]
    pub fn between(upper: usize, lower: usize) -> Self {
        Self {
            upper,
            lower,
            fill: None,
            direction: BandDirection::Below,
        }
    }
}

/// Render-ready data plus the bands to fill between stack layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StackedData {
    pub data: AlignedData,
    pub bands: Vec<Band>,
}

impl StackedData {
    /// Appends flat threshold columns after the (possibly stacked) series.
    ///
    /// Returns the column index of each threshold's first synthetic column.
    pub fn append_thresholds(&mut self, thresholds: &[Threshold]) -> Vec<usize> {
        let len = self.data.len();
        let mut first_columns = Vec::with_capacity(thresholds.len());
        for threshold in thresholds {
            first_columns.push(self.data.columns.len());
            self.data.columns.extend(threshold.synthetic_columns(len));
        }
        first_columns
    }
}

/// Turns raw series into cumulative stack layers.
///
/// With `omit` the columns pass through untouched and no bands are produced.
/// Otherwise every column becomes the running per-index total; absent samples
/// contribute zero and take the running total as their output value.
#[must_use]
pub fn stack(aligned: &AlignedData, omit: bool) -> StackedData {
    if omit {
        return StackedData {
            data: aligned.clone(),
            bands: Vec::new(),
        };
    }

    let mut accumulator = vec![0.0; aligned.len()];
    let columns: Vec<Vec<Option<f64>>> = aligned
        .columns
        .iter()
        .map(|column| {
            column
                .iter()
                .zip(accumulator.iter_mut())
                .map(|(value, total)| {
                    *total += value.unwrap_or(0.0);
                    Some(*total)
                })
                .collect()
        })
        .collect();

    let column_count = columns.len();
    let bands: Vec<Band> = (1..column_count)
        .map(|upper| Band::between(upper, upper - 1))
        .collect();
    trace!(columns = column_count, bands = bands.len(), "stacked series");

    StackedData {
        data: AlignedData {
            times: aligned.times.clone(),
            columns,
        },
        bands,
    }
}

/// Recovers one layer's own contribution from cumulative columns.
///
/// The first layer is returned as-is; absent cumulative values stay absent.
#[must_use]
pub fn destack_value(data: &AlignedData, column: usize, index: usize) -> Option<f64> {
    let value = data.value(column, index)?;
    if column == 0 {
        return Some(value);
    }
    Some(value - data.value(column - 1, index).unwrap_or(0.0))
}
