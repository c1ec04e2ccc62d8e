use std::fmt;

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{AlignedData, MetadataMap, MetricMetadata, Series, destack_value};

use super::axis_config::TimeZoneSpec;
use super::axis_label_format::format_value_label;
use super::color::{Stroke, TRANSPARENT};
use super::value_format::ValueFormatterFn;

const MULTI_DAY_HEADER_PATTERN: &str = "%b %d, %H:%M";
const SINGLE_DAY_HEADER_PATTERN: &str = "%H:%M";

/// One row of the tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipEntry {
    /// Position of the series in the chart's input order.
    pub series_index: usize,
    pub metric: MetricMetadata,
    pub display_name: String,
    pub color: String,
    pub value: Option<f64>,
    /// `None` renders as an empty-value placeholder.
    pub formatted_value: Option<String>,
    pub attributes: Option<IndexMap<String, String>>,
}

impl TooltipEntry {
    /// Value used for ordering; absent and NaN values rank as zero.
    #[must_use]
    pub fn sort_key(&self) -> f64 {
        self.value.filter(|value| !value.is_nan()).unwrap_or(0.0)
    }
}

/// Tooltip presentation chosen from what the hovered series have in common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TooltipLayout {
    SingleMetric,
    MultipleMetrics,
    /// One metric split by attributes; the metric name becomes the title.
    SingleMetricAttributes,
    MultipleMetricsAttributes,
}

/// Collapsed rows past the visibility limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipSummary {
    NoData { count: usize },
    ZeroValues { count: usize },
    /// Remaining values are all on one side of `bound` (the first collapsed value that is present).
    Bounded {
        count: usize,
        bound: String,
        inverted: bool,
    },
}

impl TooltipSummary {
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::NoData { count } | Self::ZeroValues { count } | Self::Bounded { count, .. } => {
                *count
            }
        }
    }
}

impl fmt::Display for TooltipSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData { count } => write!(f, "+{count} more with no data"),
            Self::ZeroValues { count } => write!(f, "+{count} more with zero values"),
            Self::Bounded {
                count,
                bound,
                inverted,
            } => {
                let relation = if *inverted { '≥' } else { '≤' };
                write!(f, "+{count} more with {relation} {bound}")
            }
        }
    }
}

/// Everything a tooltip surface needs to draw one hover state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipViewModel {
    /// Snapped sample time in seconds.
    pub timestamp: f64,
    pub header: String,
    pub layout: TooltipLayout,
    pub title: Option<String>,
    /// All rows, sorted; the first `visible_count` are shown.
    pub entries: Vec<TooltipEntry>,
    pub visible_count: usize,
    pub summary: Option<TooltipSummary>,
    pub has_attributes: bool,
    pub has_multiple_metrics: bool,
    pub has_multiple_attributes: bool,
    pub spans_multiple_days: bool,
    pub stacked: bool,
}

impl TooltipViewModel {
    #[must_use]
    pub fn visible_entries(&self) -> &[TooltipEntry] {
        &self.entries[..self.visible_count]
    }

    #[must_use]
    pub fn collapsed_entries(&self) -> &[TooltipEntry] {
        &self.entries[self.visible_count..]
    }
}

/// Inputs shared by every tooltip built for one chart.
#[derive(Clone, Copy)]
pub struct TooltipContext<'a> {
    /// Plotted columns: series first (cumulative when stacked), thresholds after.
    pub data: &'a AlignedData,
    pub series: &'a [Series],
    pub metadata: &'a MetadataMap,
    pub strokes: &'a [Stroke],
    pub stacked: bool,
    pub formatter: &'a ValueFormatterFn,
    pub zone: TimeZoneSpec,
    pub visibility_limit: usize,
    pub invert_sort: bool,
    pub disable_suggested_label: bool,
}

/// Builds the tooltip for sample `index`.
///
/// Series without metadata are skipped. Returns `None` when `index` is
/// outside the time axis.
#[must_use]
pub fn build_tooltip_model(ctx: &TooltipContext<'_>, index: usize) -> Option<TooltipViewModel> {
    let timestamp = *ctx.data.times.get(index)?;

    let mut entries = Vec::with_capacity(ctx.series.len());
    let mut seen_metrics: IndexSet<&str> = IndexSet::new();
    let mut seen_attribute_keys: IndexSet<&str> = IndexSet::new();
    let mut has_attributes = false;

    for (series_index, serie) in ctx.series.iter().enumerate() {
        let value = if ctx.stacked {
            destack_value(ctx.data, series_index, index)
        } else {
            ctx.data.value(series_index, index)
        };

        let Some(metric) = ctx.metadata.get(&serie.metric) else {
            warn!(metric = %serie.metric, "metric metadata not found; skipping tooltip row");
            continue;
        };
        seen_metrics.insert(serie.metric.as_str());

        if let Some(attributes) = serie.attributes.as_ref().filter(|map| !map.is_empty()) {
            has_attributes = true;
            seen_attribute_keys.extend(attributes.keys().map(String::as_str));
        }

        let color = ctx
            .strokes
            .get(series_index)
            .map_or_else(|| TRANSPARENT.to_owned(), |stroke| stroke.color_at(index));

        entries.push(TooltipEntry {
            series_index,
            display_name: metric.display_name(ctx.disable_suggested_label).to_owned(),
            metric: metric.clone(),
            color,
            value,
            formatted_value: value.map(|value| format_value_label(ctx.formatter, value)),
            attributes: serie.attributes.clone(),
        });
    }

    sort_entries(&mut entries, ctx.invert_sort);

    let has_multiple_metrics = seen_metrics.len() > 1;
    let layout = match (has_attributes, has_multiple_metrics) {
        (false, false) => TooltipLayout::SingleMetric,
        (false, true) => TooltipLayout::MultipleMetrics,
        (true, false) => TooltipLayout::SingleMetricAttributes,
        (true, true) => TooltipLayout::MultipleMetricsAttributes,
    };
    let title = match layout {
        TooltipLayout::SingleMetricAttributes => {
            entries.first().map(|entry| entry.display_name.clone())
        }
        _ => None,
    };

    let spans_multiple_days = spans_multiple_days(&ctx.data.times, ctx.zone);
    let header = format_header(timestamp, spans_multiple_days, ctx.zone);
    let visible_count = ctx.visibility_limit.min(entries.len());
    let summary = summarize(&entries[visible_count..], ctx.invert_sort);

    Some(TooltipViewModel {
        timestamp,
        header,
        layout,
        title,
        entries,
        visible_count,
        summary,
        has_attributes,
        has_multiple_metrics,
        has_multiple_attributes: seen_attribute_keys.len() > 1,
        spans_multiple_days,
        stacked: ctx.stacked,
    })
}

/// Orders rows by value, largest first (smallest first when `inverted`).
///
/// The sort is stable, so equal values keep series order.
pub fn sort_entries(entries: &mut [TooltipEntry], inverted: bool) {
    if inverted {
        entries.sort_by_key(|entry| OrderedFloat(entry.sort_key()));
    } else {
        entries.sort_by_key(|entry| std::cmp::Reverse(OrderedFloat(entry.sort_key())));
    }
}

/// Summary line for rows hidden past the visibility limit.
#[must_use]
pub fn summarize(collapsed: &[TooltipEntry], inverted: bool) -> Option<TooltipSummary> {
    if collapsed.is_empty() {
        return None;
    }
    let count = collapsed.len();

    if collapsed.iter().all(|entry| entry.value.is_none()) {
        return Some(TooltipSummary::NoData { count });
    }
    if collapsed.iter().all(|entry| entry.value.unwrap_or(0.0) == 0.0) {
        return Some(TooltipSummary::ZeroValues { count });
    }
    // Absent rows sort as zero but carry no text; bound on the first real value.
    let bound = collapsed
        .iter()
        .find_map(|entry| entry.formatted_value.clone())
        .unwrap_or_else(|| "0".to_owned());
    Some(TooltipSummary::Bounded {
        count,
        bound,
        inverted,
    })
}

/// Whether the first and last timestamps (seconds) fall on different
/// calendar dates in `zone`.
#[must_use]
pub fn spans_multiple_days(times: &[f64], zone: TimeZoneSpec) -> bool {
    let (Some(first), Some(last)) = (times.first(), times.last()) else {
        return false;
    };
    match (
        zone.datetime_from_seconds(*first),
        zone.datetime_from_seconds(*last),
    ) {
        (Some(first), Some(last)) => first.date_naive() != last.date_naive(),
        _ => false,
    }
}

fn format_header(timestamp: f64, spans_multiple_days: bool, zone: TimeZoneSpec) -> String {
    let pattern = if spans_multiple_days {
        MULTI_DAY_HEADER_PATTERN
    } else {
        SINGLE_DAY_HEADER_PATTERN
    };
    zone.datetime_from_seconds(timestamp)
        .map(|local| local.format(pattern).to_string())
        .unwrap_or_default()
}
