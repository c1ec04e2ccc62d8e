use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::LinearScale;

/// Result of resolving one cursor position against the sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorSnap {
    /// Cursor x in plot pixels, moved onto the snapped sample when snapping applied.
    pub left: f64,
    pub top: f64,
    /// Sample index carrying visible data, `None` when no snapping happened.
    pub index: Option<usize>,
}

impl CursorSnap {
    #[must_use]
    pub fn unsnapped(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            index: None,
        }
    }
}

/// Public cursor state exposed to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CursorState {
    pub hovering: bool,
    pub left: f64,
    pub top: f64,
    pub snapped_index: Option<usize>,
    pub snapped_time: Option<f64>,
}

impl CursorState {
    pub fn on_pointer_enter(&mut self) {
        self.hovering = true;
    }

    pub fn on_pointer_leave(&mut self) {
        *self = Self::default();
    }

    pub fn on_snap(&mut self, snap: CursorSnap, time: Option<f64>) {
        self.left = snap.left;
        self.top = snap.top;
        self.snapped_index = snap.index;
        self.snapped_time = time;
    }
}

/// Index of the sample closest to `value` in an ascending time axis.
///
/// Binary-searches the pair of samples straddling `value` and keeps the
/// closer one; equal distances resolve to the lower index.
#[must_use]
pub fn nearest_index_by_value(times: &[f64], value: f64) -> Option<usize> {
    if times.is_empty() || value.is_nan() {
        return None;
    }

    let mut lo = 0;
    let mut hi = times.len() - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if times[mid] < value {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    if (times[lo] - value).abs() <= (times[hi] - value).abs() {
        Some(lo)
    } else {
        Some(hi)
    }
}

/// Whether any column has a value at `index`.
#[must_use]
pub fn has_value_at(columns: &[Vec<Option<f64>>], index: usize) -> bool {
    columns
        .iter()
        .any(|column| column.get(index).copied().flatten().is_some())
}

/// Walks outward from `index` (left before right at each radius) to the
/// nearest index where some column has a value.
///
/// Returns `index` unchanged when no such index exists.
#[must_use]
pub fn nearest_non_null_index(columns: &[Vec<Option<f64>>], len: usize, index: usize) -> usize {
    if has_value_at(columns, index) {
        return index;
    }

    let mut radius = 1;
    while index + radius < len || radius <= index {
        let mut candidates: SmallVec<[usize; 2]> = SmallVec::new();
        if let Some(left) = index.checked_sub(radius) {
            candidates.push(left);
        }
        if index + radius < len {
            candidates.push(index + radius);
        }
        if let Some(found) = candidates
            .into_iter()
            .find(|candidate| has_value_at(columns, *candidate))
        {
            return found;
        }
        radius += 1;
    }

    index
}

/// Nearest sample to `value` that carries at least one visible value.
#[must_use]
pub fn nearest_visible_index(
    times: &[f64],
    columns: &[Vec<Option<f64>>],
    value: f64,
) -> Option<usize> {
    let nearest = nearest_index_by_value(times, value)?;
    Some(nearest_non_null_index(columns, times.len(), nearest))
}

/// Resolves a plot-pixel cursor position to a snapped sample.
///
/// Out-of-bounds cursors (negative coordinates) and empty axes come back
/// unchanged without snapping.
#[must_use]
pub fn snap_cursor(
    times: &[f64],
    columns: &[Vec<Option<f64>>],
    scale: LinearScale,
    plot_width_px: f64,
    left: f64,
    top: f64,
) -> CursorSnap {
    if left < 0.0 || top < 0.0 || times.is_empty() {
        return CursorSnap::unsnapped(left, top);
    }

    let Ok(value) = scale.pixel_to_value(left, plot_width_px) else {
        return CursorSnap::unsnapped(left, top);
    };
    let Some(index) = nearest_visible_index(times, columns, value) else {
        return CursorSnap::unsnapped(left, top);
    };
    let Ok(snapped_left) = scale.value_to_pixel(times[index], plot_width_px) else {
        return CursorSnap::unsnapped(left, top);
    };

    CursorSnap {
        left: snapped_left,
        top,
        index: Some(index),
    }
}
