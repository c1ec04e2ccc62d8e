use crate::api::TooltipViewModel;
use crate::core::{Point, Size};
use crate::error::ChartResult;
use crate::render::TooltipSurface;

/// In-memory surface used by tests and headless hosts.
///
/// It records every call so tests can assert what a real page would show.
#[derive(Debug, Clone, PartialEq)]
pub struct NullSurface {
    pub attach_count: usize,
    pub attached: bool,
    pub visible: bool,
    pub content: Option<TooltipViewModel>,
    pub render_count: usize,
    pub position: Option<Point>,
    pub size: Size,
    pub window: Size,
}

impl NullSurface {
    #[must_use]
    pub fn new(size: Size, window: Size) -> Self {
        Self {
            attach_count: 0,
            attached: false,
            visible: false,
            content: None,
            render_count: 0,
            position: None,
            size,
            window,
        }
    }
}

impl Default for NullSurface {
    fn default() -> Self {
        Self::new(Size::new(160.0, 90.0), Size::new(1280.0, 800.0))
    }
}

impl TooltipSurface for NullSurface {
    fn attach(&mut self) -> ChartResult<()> {
        self.attach_count += 1;
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = false;
        self.visible = false;
        self.content = None;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn render(&mut self, content: Option<&TooltipViewModel>) {
        self.render_count += 1;
        self.content = content.cloned();
    }

    fn measure(&self) -> Size {
        self.size
    }

    fn boundary(&self) -> Size {
        self.window
    }

    fn move_to(&mut self, position: Point) {
        self.position = Some(position);
    }
}
