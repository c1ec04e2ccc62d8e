//! Public planning API: axes, tooltip aggregation, overlay arbitration and
//! the per-chart engine facade.

mod axis_config;
mod axis_label_format;
mod axis_ticks;
mod chart_config;
mod chart_plan;
mod color;
mod engine;
mod overlay;
mod tooltip;
mod value_format;

pub use axis_config::{
    TIME_AXIS_SIZE_PX, TimeZoneSpec, ValueAxisStyle, time_axis_tick_spacing_px,
    value_axis_tick_spacing_px,
};
pub use axis_label_format::{
    estimate_label_text_width_px, format_time_ago, format_time_labels, format_value_label,
};
pub use axis_ticks::{
    TimeAxisRequest, TimeIncrement, XAxisTicks, YAxisTicks, plan_time_axis_ticks,
    plan_value_axis_ticks, select_increment, value_axis_size_px,
};
pub use chart_config::{ChartType, ChartVisualConfig, DEFAULT_VISIBILITY_LIMIT, TooltipConfig};
pub use chart_plan::{ChartPlan, PathStrategy, SeriesStyle, ThresholdStyle, series_stroke_width};
pub use color::{
    ColorFn, ColorResolver, DEFAULT_COLORS, PositionColorFn, Stroke, TRANSPARENT, ThemeVariables,
    resolve_series_color, threshold_color, threshold_fill_color,
};
pub use engine::{ChartEngine, ChartInput};
pub use overlay::{ChartId, OverlayManager, OverlayState, PositionTicket, SharedOverlay};
pub use tooltip::{
    TooltipContext, TooltipEntry, TooltipLayout, TooltipSummary, TooltipViewModel,
    build_tooltip_model, sort_entries, spans_multiple_days, summarize,
};
pub use value_format::{
    FormattedValue, ValueFormatterFn, default_value_formatter, normalize_unit, resolve_unit,
};
