mod null_surface;
mod placement;

pub use null_surface::NullSurface;
pub use placement::{
    PlacedOverlay, Placement, PlacementOptions, TOOLTIP_DISTANCE_CURSOR,
    TOOLTIP_PADDING_FROM_CURSOR, compute_position,
};

use crate::api::TooltipViewModel;
use crate::core::{Point, Size};
use crate::error::ChartResult;

/// Contract implemented by whatever hosts the shared tooltip overlay.
///
/// A surface is one page-level node (fixed position, no pointer events) plus
/// a render target bound to it. The overlay manager is the only caller, so
/// implementations need no ownership bookkeeping of their own.
pub trait TooltipSurface {
    /// Creates the node and attaches it to the page.
    fn attach(&mut self) -> ChartResult<()>;

    /// Removes the node from the page.
    fn detach(&mut self);

    fn set_visible(&mut self, visible: bool);

    /// Replaces the rendered content; `None` clears it.
    fn render(&mut self, content: Option<&TooltipViewModel>);

    /// Current laid-out size of the node.
    fn measure(&self) -> Size;

    /// Size of the area the node must stay inside (usually the window).
    fn boundary(&self) -> Size;

    /// Writes final page coordinates.
    fn move_to(&mut self, position: Point);
}
