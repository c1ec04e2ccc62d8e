use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    AlignedData, Band, BandDirection, MetadataMap, PlotPadding, Series, StackedData, Threshold,
    ValueRangeBuilder, stack,
};
use crate::error::{ChartError, ChartResult};

use super::axis_config::TimeZoneSpec;
use super::chart_config::{ChartType, ChartVisualConfig};
use super::color::{Stroke, resolve_series_color, threshold_color, threshold_fill_color};
use super::tooltip::TooltipContext;
use super::value_format::{ValueFormatterFn, default_value_formatter, resolve_unit};

/// How a series' path is drawn; drawing itself belongs to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathStrategy {
    /// Straight segments; gaps are not bridged.
    Linear { align_gaps: i8 },
    /// Bars at `width_factor` of the slot, capped at `max_width_px`.
    Bars { width_factor: f64, max_width_px: f64 },
    Spline { align_gaps: i8 },
    Stepped { align_gaps: i8 },
}

impl PathStrategy {
    #[must_use]
    pub const fn for_chart_type(chart_type: ChartType) -> Self {
        match chart_type {
            ChartType::Line | ChartType::Area => Self::Linear { align_gaps: 0 },
            ChartType::Bar => Self::Bars {
                width_factor: 0.6,
                max_width_px: 100.0,
            },
            ChartType::Spline => Self::Spline { align_gaps: 1 },
            ChartType::Step => Self::Stepped { align_gaps: 1 },
        }
    }
}

/// Stroke width for series of `chart_type`.
#[must_use]
pub const fn series_stroke_width(chart_type: ChartType, fill: bool) -> f64 {
    match chart_type {
        ChartType::Bar | ChartType::Area => 1.0,
        ChartType::Line | ChartType::Spline => {
            if fill {
                1.5
            } else {
                2.0
            }
        }
        ChartType::Step => 1.5,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: String,
    pub stroke: Stroke,
    pub width: f64,
    pub fill: Option<String>,
    pub path: PathStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStyle {
    pub label: Option<String>,
    pub stroke: String,
    pub width: f64,
    pub dash: Option<[f64; 2]>,
    /// Synthetic data columns drawn with this style.
    pub columns: Range<usize>,
}

/// Everything derived from one chart's data and configuration.
///
/// Rebuilt whenever data or configuration changes; cursor handling only reads it.
#[derive(Clone)]
pub struct ChartPlan {
    pub config: ChartVisualConfig,
    pub series: Vec<Series>,
    pub metadata: MetadataMap,
    /// Plotted columns: series (cumulative when stacked), then thresholds.
    pub stacked: StackedData,
    pub series_styles: Vec<SeriesStyle>,
    pub threshold_styles: Vec<ThresholdStyle>,
    pub unit: Option<String>,
    pub value_range: ValueRangeBuilder,
    pub formatter: ValueFormatterFn,
    pub zone: TimeZoneSpec,
    pub padding: PlotPadding,
    strokes: Vec<Stroke>,
}

impl fmt::Debug for ChartPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartPlan")
            .field("chart_type", &self.config.chart_type)
            .field("series", &self.series.len())
            .field("samples", &self.stacked.data.len())
            .field("bands", &self.stacked.bands.len())
            .field("unit", &self.unit)
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

impl ChartPlan {
    /// Builds the plan for `series` aligned to `times` (seconds).
    ///
    /// Returns `Ok(None)` when there is nothing to plot. Without an injected
    /// `formatter` the default formatter for the resolved unit is used.
    pub fn build(
        times: Vec<f64>,
        series: Vec<Series>,
        metadata: MetadataMap,
        config: ChartVisualConfig,
        formatter: Option<ValueFormatterFn>,
    ) -> ChartResult<Option<Self>> {
        if series.is_empty() {
            warn!("no series provided; nothing to plan");
            return Ok(None);
        }
        config.validate()?;
        validate_time_axis(&times)?;

        let chart_type = config.chart_type;
        let stacked = chart_type.is_stacked();
        let aligned = AlignedData::from_series(times, &series)?;
        let mut plotted = stack(&aligned, !stacked);
        let threshold_columns = plotted.append_thresholds(&config.thresholds);

        let unit = resolve_unit(config.unit.as_deref(), &series, &metadata);
        let formatter = formatter.unwrap_or_else(|| default_value_formatter(unit.as_deref()));
        let zone = config.resolved_time_zone()?;
        let value_range = ValueRangeBuilder::new(unit.as_deref(), config.min, config.max);

        let series_styles = build_series_styles(&series, &config);
        let threshold_styles = build_threshold_styles(&config, &threshold_columns);
        plotted
            .bands
            .extend(range_threshold_bands(&config, &threshold_columns));

        debug!(
            series = series.len(),
            samples = plotted.data.len(),
            thresholds = config.thresholds.len(),
            bands = plotted.bands.len(),
            unit = unit.as_deref().unwrap_or(""),
            "built chart plan"
        );

        Ok(Some(Self {
            strokes: series_styles.iter().map(|style| style.stroke.clone()).collect(),
            padding: PlotPadding::for_time_axis(config.relative_time_axis),
            series,
            metadata,
            stacked: plotted,
            series_styles,
            threshold_styles,
            unit,
            value_range,
            formatter,
            zone,
            config,
        }))
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.stacked.data.times
    }

    /// Columns holding series data; threshold columns are excluded.
    #[must_use]
    pub fn series_columns(&self) -> &[Vec<Option<f64>>] {
        let count = self.series.len().min(self.stacked.data.columns.len());
        &self.stacked.data.columns[..count]
    }

    #[must_use]
    pub fn is_stacked(&self) -> bool {
        self.config.chart_type.is_stacked()
    }

    /// Value-axis range over the plotted series; thresholds do not widen it.
    #[must_use]
    pub fn value_axis_range(&self) -> (f64, f64) {
        let (data_min, data_max) = self
            .stacked
            .data
            .value_extent(0..self.series.len())
            .unwrap_or((0.0, 0.0));
        self.value_range.resolve(data_min, data_max)
    }

    /// Time-axis domain: first and last sample.
    #[must_use]
    pub fn time_domain(&self) -> Option<(f64, f64)> {
        Some((*self.times().first()?, *self.times().last()?))
    }

    #[must_use]
    pub fn tooltip_context(&self) -> TooltipContext<'_> {
        TooltipContext {
            data: &self.stacked.data,
            series: &self.series,
            metadata: &self.metadata,
            strokes: &self.strokes,
            stacked: self.is_stacked(),
            formatter: &self.formatter,
            zone: self.zone,
            visibility_limit: self.config.tooltip.effective_visibility_limit(),
            invert_sort: self.config.invert_sort,
            disable_suggested_label: self.config.disable_suggested_label,
        }
    }

    /// Replaces the stroke of series `index`, e.g. with a per-sample gradient.
    pub fn set_series_stroke(&mut self, index: usize, stroke: Stroke) -> ChartResult<()> {
        let style = self.series_styles.get_mut(index).ok_or_else(|| {
            ChartError::InvalidData(format!("series index {index} is out of range"))
        })?;
        style.stroke = stroke.clone();
        self.strokes[index] = stroke;
        Ok(())
    }
}

fn validate_time_axis(times: &[f64]) -> ChartResult<()> {
    if times.iter().any(|time| !time.is_finite()) {
        return Err(ChartError::InvalidData(
            "time axis contains non-finite timestamps".to_owned(),
        ));
    }
    if times.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(ChartError::InvalidData(
            "time axis must be sorted ascending".to_owned(),
        ));
    }
    Ok(())
}

fn build_series_styles(series: &[Series], config: &ChartVisualConfig) -> Vec<SeriesStyle> {
    let chart_type = config.chart_type;
    let width = series_stroke_width(chart_type, config.fill);
    let filled = config.fill || chart_type.is_stacked();
    let colors = config.colors.as_ref();

    series
        .iter()
        .enumerate()
        .map(|(index, serie)| SeriesStyle {
            label: serie.metric.clone(),
            stroke: Stroke::Static(resolve_series_color(
                serie,
                index,
                colors,
                chart_type,
                &config.theme,
                false,
            )),
            width,
            fill: filled.then(|| {
                resolve_series_color(serie, index, colors, chart_type, &config.theme, true)
            }),
            path: PathStrategy::for_chart_type(chart_type),
        })
        .collect()
}

fn build_threshold_styles(
    config: &ChartVisualConfig,
    first_columns: &[usize],
) -> Vec<ThresholdStyle> {
    config
        .thresholds
        .iter()
        .zip(first_columns)
        .map(|(threshold, first)| {
            let style = threshold.style();
            ThresholdStyle {
                label: threshold.label().map(str::to_owned),
                stroke: threshold_color(&config.theme, threshold.level()),
                width: style.stroke_width(),
                dash: style.dash(),
                columns: *first..*first + threshold.column_count(),
            }
        })
        .collect()
}

fn range_threshold_bands(config: &ChartVisualConfig, first_columns: &[usize]) -> Vec<Band> {
    config
        .thresholds
        .iter()
        .zip(first_columns)
        .filter(|(threshold, _)| threshold.is_range())
        .map(|(threshold, first): (&Threshold, &usize)| Band {
            upper: *first,
            lower: *first + 1,
            fill: Some(threshold_fill_color(&config.theme, threshold.level())),
            direction: BandDirection::Above,
        })
        .collect()
}
