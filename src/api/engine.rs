use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{LinearScale, MetadataMap, Point, Series, Size, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CursorState, snap_cursor};
use crate::render::{PlacedOverlay, TooltipSurface};

use super::axis_config::{TIME_AXIS_SIZE_PX, ValueAxisStyle};
use super::axis_ticks::{
    TimeAxisRequest, XAxisTicks, YAxisTicks, plan_time_axis_ticks, plan_value_axis_ticks,
};
use super::chart_config::ChartVisualConfig;
use super::chart_plan::ChartPlan;
use super::overlay::{ChartId, OverlayManager, SharedOverlay};
use super::tooltip::{TooltipViewModel, build_tooltip_model};
use super::value_format::ValueFormatterFn;

/// Attaches the shared overlay; a failure leaves the chart without a tooltip.
fn initialize_overlay<S: TooltipSurface>(manager: &mut OverlayManager<S>, id: ChartId) {
    if let Err(err) = manager.initialize() {
        warn!(chart = id.get(), error = %err, "tooltip overlay unavailable");
    }
}

/// Raw chart input: shared time axis (seconds), series aligned to it and
/// metadata keyed by metric name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartInput {
    pub times: Vec<f64>,
    pub series: Vec<Series>,
    #[serde(default)]
    pub metadata: MetadataMap,
}

impl ChartInput {
    #[must_use]
    pub fn new(times: Vec<f64>, series: Vec<Series>, metadata: MetadataMap) -> Self {
        Self {
            times,
            series,
            metadata,
        }
    }
}

/// One interactive chart: plan, cursor and its claim on the shared tooltip.
///
/// Pointer handlers never fail; problems are logged and the event dropped.
pub struct ChartEngine<S: TooltipSurface> {
    id: ChartId,
    overlay: SharedOverlay<S>,
    viewport: Viewport,
    bounds_origin: Point,
    input: ChartInput,
    config: ChartVisualConfig,
    formatter: Option<ValueFormatterFn>,
    value_axis_style: ValueAxisStyle,
    plan: Option<ChartPlan>,
    cursor: CursorState,
    last_anchor: Option<Point>,
    destroyed: bool,
}

impl<S: TooltipSurface> ChartEngine<S> {
    pub fn new(
        overlay: SharedOverlay<S>,
        viewport: Viewport,
        input: ChartInput,
        config: ChartVisualConfig,
    ) -> ChartResult<Self> {
        Self::with_formatter(overlay, viewport, input, config, None)
    }

    /// Like [`ChartEngine::new`] with a host-provided value formatter.
    pub fn with_formatter(
        overlay: SharedOverlay<S>,
        viewport: Viewport,
        input: ChartInput,
        config: ChartVisualConfig,
        formatter: Option<ValueFormatterFn>,
    ) -> ChartResult<Self> {
        validate_viewport(viewport)?;
        let plan = ChartPlan::build(
            input.times.clone(),
            input.series.clone(),
            input.metadata.clone(),
            config.clone(),
            formatter.clone(),
        )?;

        let id = {
            let mut manager = overlay.try_borrow_mut().map_err(|_| {
                ChartError::InvalidData("tooltip overlay is busy".to_owned())
            })?;
            let id = manager.register();
            if plan.is_some() && !config.tooltip.hide {
                initialize_overlay(&mut manager, id);
            }
            id
        };

        Ok(Self {
            id,
            overlay,
            viewport,
            bounds_origin: Point::default(),
            input,
            config,
            formatter,
            value_axis_style: ValueAxisStyle::default(),
            plan,
            cursor: CursorState::default(),
            last_anchor: None,
            destroyed: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.id
    }

    #[must_use]
    pub fn plan(&self) -> Option<&ChartPlan> {
        self.plan.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &ChartVisualConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn cursor_state(&self) -> CursorState {
        self.cursor
    }

    /// Whether the host should draw the cursor guide.
    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        self.cursor.hovering && !self.config.hide_cursor
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Replaces data and configuration and rebuilds the plan.
    pub fn update(&mut self, input: ChartInput, config: ChartVisualConfig) -> ChartResult<()> {
        let plan = ChartPlan::build(
            input.times.clone(),
            input.series.clone(),
            input.metadata.clone(),
            config.clone(),
            self.formatter.clone(),
        )?;
        self.release_overlay();
        self.cursor = CursorState::default();
        self.plan = plan;
        self.input = input;
        self.config = config;
        if self.plan.is_some() && !self.config.tooltip.hide {
            if let Ok(mut manager) = self.overlay.try_borrow_mut() {
                initialize_overlay(&mut manager, self.id);
            }
        }
        Ok(())
    }

    pub fn set_value_formatter(&mut self, formatter: Option<ValueFormatterFn>) -> ChartResult<()> {
        self.formatter = formatter;
        let input = self.input.clone();
        let config = self.config.clone();
        self.update(input, config)
    }

    pub fn set_value_axis_style(&mut self, style: ValueAxisStyle) {
        self.value_axis_style = style;
    }

    /// Plot-area size after padding and axes.
    #[must_use]
    pub fn plot_size(&self) -> Size {
        let Some(plan) = self.plan.as_ref() else {
            return Size::new(f64::from(self.viewport.width), f64::from(self.viewport.height));
        };
        let padding = plan.padding;
        let axis_height = if self.config.hide_axis {
            0.0
        } else {
            TIME_AXIS_SIZE_PX
        };
        let height = (f64::from(self.viewport.height) - padding.top - padding.bottom - axis_height)
            .max(0.0);
        let axis_width = if self.config.hide_axis {
            0.0
        } else {
            self.value_axis_ticks_for_height(plan, height).size_px
        };
        let width = (f64::from(self.viewport.width) - padding.left - padding.right - axis_width)
            .max(0.0);
        Size::new(width, height)
    }

    /// Value-axis `[min, max]` for the current data.
    #[must_use]
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.plan.as_ref().map(ChartPlan::value_axis_range)
    }

    #[must_use]
    pub fn y_axis(&self) -> Option<YAxisTicks> {
        let plan = self.plan.as_ref()?;
        Some(self.value_axis_ticks_for_height(plan, self.plot_size().height))
    }

    /// Time-axis ticks; relative labels are measured against the wall clock.
    #[must_use]
    pub fn x_axis(&self) -> Option<XAxisTicks> {
        self.x_axis_at(Utc::now().timestamp_millis() as f64)
    }

    /// Time-axis ticks with relative labels measured against `now_ms`.
    #[must_use]
    pub fn x_axis_at(&self, now_ms: f64) -> Option<XAxisTicks> {
        let plan = self.plan.as_ref()?;
        let (min_seconds, max_seconds) = plan.time_domain()?;
        Some(plan_time_axis_ticks(TimeAxisRequest {
            min_seconds,
            max_seconds,
            plot_width_px: self.plot_size().width,
            zone: plan.zone,
            relative: self.config.relative_time_axis,
            now_ms,
        }))
    }

    /// Page-space origin of the plotting surface, refreshed on scroll/resize.
    pub fn set_bounds_origin(&mut self, origin: Point) {
        self.bounds_origin = origin;
    }

    #[must_use]
    pub fn bounds_origin(&self) -> Point {
        self.bounds_origin
    }

    /// Applies a new viewport and re-places the tooltip if this chart shows it.
    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        validate_viewport(viewport)?;
        self.viewport = viewport;
        if let Some(anchor) = self.last_anchor {
            let id = self.id;
            self.with_overlay(|manager| {
                if manager.owner() == Some(id) {
                    manager.position(id, anchor);
                }
            });
        }
        Ok(())
    }

    pub fn pointer_enter(&mut self) {
        if self.destroyed {
            return;
        }
        self.cursor.on_pointer_enter();
        if self.tooltip_enabled() {
            self.with_overlay(OverlayManager::show);
        }
    }

    /// Handles a cursor move in plot-pixel coordinates.
    ///
    /// Returns the overlay placement when a tooltip was shown.
    pub fn pointer_move(&mut self, left: f64, top: f64) -> Option<PlacedOverlay> {
        if self.destroyed {
            return None;
        }
        let plan = self.plan.as_ref()?;
        let plot_width = self.plot_size().width;
        let snap = match LinearScale::from_samples(plan.times()) {
            Ok(scale) => snap_cursor(plan.times(), plan.series_columns(), scale, plot_width, left, top),
            Err(err) => {
                debug!(error = %err, "cursor ignored");
                return None;
            }
        };
        let time = snap.index.and_then(|index| plan.times().get(index).copied());
        self.cursor.on_snap(snap, time);
        trace!(left, top, index = ?snap.index, "cursor moved");

        let model = match snap.index {
            Some(index) if self.cursor.hovering && self.tooltip_enabled() => {
                build_tooltip_model(&plan.tooltip_context(), index)
            }
            _ => None,
        };
        let Some(model) = model else {
            self.release_overlay();
            return None;
        };

        let anchor = Point::new(
            snap.left + self.bounds_origin.x,
            snap.top + self.bounds_origin.y,
        );
        self.last_anchor = Some(anchor);
        let id = self.id;
        self.with_overlay(|manager| {
            manager.show();
            manager.render(id, Some(&model));
            manager.position(id, anchor)
        })
        .flatten()
    }

    pub fn pointer_leave(&mut self) {
        self.cursor.on_pointer_leave();
        self.release_overlay();
    }

    /// Tooltip for sample `index` without touching the overlay.
    #[must_use]
    pub fn tooltip_at(&self, index: usize) -> Option<TooltipViewModel> {
        let plan = self.plan.as_ref()?;
        build_tooltip_model(&plan.tooltip_context(), index)
    }

    /// Releases the overlay and stops reacting to pointer events.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        let id = self.id;
        self.with_overlay(|manager| manager.unregister(id));
        self.cursor = CursorState::default();
        self.last_anchor = None;
        self.destroyed = true;
    }

    fn tooltip_enabled(&self) -> bool {
        self.plan.is_some() && !self.config.tooltip.hide
    }

    fn release_overlay(&mut self) {
        self.last_anchor = None;
        let id = self.id;
        self.with_overlay(|manager| {
            if manager.owner() == Some(id) {
                manager.hide(id);
            }
        });
    }

    fn with_overlay<T>(&self, action: impl FnOnce(&mut OverlayManager<S>) -> T) -> Option<T> {
        match self.overlay.try_borrow_mut() {
            Ok(mut manager) => Some(action(&mut manager)),
            Err(_) => {
                warn!(chart = self.id.get(), "tooltip overlay busy; event dropped");
                None
            }
        }
    }

    fn value_axis_ticks_for_height(&self, plan: &ChartPlan, plot_height: f64) -> YAxisTicks {
        let (min, max) = plan.value_axis_range();
        plan_value_axis_ticks(min, max, plot_height, &plan.formatter, self.value_axis_style)
    }
}

impl<S: TooltipSurface> Drop for ChartEngine<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn validate_viewport(viewport: Viewport) -> ChartResult<()> {
    if viewport.is_valid() {
        Ok(())
    } else {
        Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        })
    }
}
