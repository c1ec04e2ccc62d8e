use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Point, Size};
use crate::error::{ChartError, ChartResult};
use crate::render::{PlacedOverlay, PlacementOptions, TooltipSurface, compute_position};

use super::tooltip::TooltipViewModel;

/// Identity of a chart sharing the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChartId(u64);

impl ChartId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverlayState {
    #[default]
    Uninitialized,
    Idle,
    Visible,
    Destroyed,
}

/// Pending placement captured at request time.
///
/// Committing re-validates it, so a result computed for a chart that lost the
/// overlay in the meantime is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionTicket {
    pub owner: ChartId,
    pub anchor: Point,
    generation: u64,
}

/// Overlay shared by every chart on a UI thread.
pub type SharedOverlay<S> = Rc<RefCell<OverlayManager<S>>>;

/// Single tooltip overlay arbitrated between charts.
///
/// The last chart to render content owns the overlay; hides and placements
/// from any other chart are ignored.
#[derive(Debug)]
pub struct OverlayManager<S: TooltipSurface> {
    surface: S,
    state: OverlayState,
    owner: Option<ChartId>,
    next_chart_id: u64,
    generation: u64,
    placement_options: PlacementOptions,
    placement: Option<PlacedOverlay>,
}

impl<S: TooltipSurface> OverlayManager<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: OverlayState::Uninitialized,
            owner: None,
            next_chart_id: 1,
            generation: 0,
            placement_options: PlacementOptions::default(),
            placement: None,
        }
    }

    #[must_use]
    pub fn with_placement_options(mut self, options: PlacementOptions) -> Self {
        self.placement_options = options;
        self
    }

    /// Wraps the manager for sharing between engines.
    #[must_use]
    pub fn into_shared(self) -> SharedOverlay<S> {
        Rc::new(RefCell::new(self))
    }

    /// Hands out a fresh chart identity.
    pub fn register(&mut self) -> ChartId {
        let id = ChartId(self.next_chart_id);
        self.next_chart_id += 1;
        debug!(chart = id.0, "registered chart with tooltip overlay");
        id
    }

    /// Attaches the surface on first call; later calls are no-ops.
    pub fn initialize(&mut self) -> ChartResult<()> {
        match self.state {
            OverlayState::Uninitialized => {
                self.surface.attach()?;
                self.state = OverlayState::Idle;
                debug!("tooltip overlay attached");
                Ok(())
            }
            OverlayState::Idle | OverlayState::Visible => Ok(()),
            OverlayState::Destroyed => Err(ChartError::InvalidData(
                "tooltip overlay was disposed".to_owned(),
            )),
        }
    }

    /// Makes the overlay visible without touching its content.
    pub fn show(&mut self) {
        match self.state {
            OverlayState::Idle => {
                self.surface.set_visible(true);
                self.state = OverlayState::Visible;
            }
            OverlayState::Visible => {}
            OverlayState::Uninitialized | OverlayState::Destroyed => {
                debug!(state = ?self.state, "show ignored");
            }
        }
    }

    /// Replaces overlay content; rendering content transfers ownership to `owner`.
    pub fn render(&mut self, owner: ChartId, content: Option<&TooltipViewModel>) {
        if matches!(
            self.state,
            OverlayState::Uninitialized | OverlayState::Destroyed
        ) {
            debug!(chart = owner.0, state = ?self.state, "render ignored");
            return;
        }
        self.surface.render(content);
        self.owner = content.map(|_| owner);
        self.generation += 1;
    }

    /// Hides and clears the overlay when `owner` rendered it last.
    ///
    /// Returns whether anything was hidden.
    pub fn hide(&mut self, owner: ChartId) -> bool {
        if self.owner != Some(owner) {
            warn!(
                chart = owner.0,
                owner = ?self.owner.map(ChartId::get),
                "hide from a chart that does not own the tooltip overlay"
            );
            return false;
        }
        self.surface.set_visible(false);
        self.surface.render(None);
        self.owner = None;
        self.generation += 1;
        self.placement = None;
        if self.state == OverlayState::Visible {
            self.state = OverlayState::Idle;
        }
        true
    }

    /// Starts an asynchronous placement next to `anchor` (page coordinates).
    #[must_use]
    pub fn request_position(&self, owner: ChartId, anchor: Point) -> Option<PositionTicket> {
        if !self.is_visible_for(owner) {
            debug!(chart = owner.0, "position request from non-owner ignored");
            return None;
        }
        Some(PositionTicket {
            owner,
            anchor,
            generation: self.generation,
        })
    }

    /// Finishes a placement using the overlay size measured after render.
    pub fn commit_position(
        &mut self,
        ticket: PositionTicket,
        measured: Size,
    ) -> Option<PlacedOverlay> {
        if !self.is_visible_for(ticket.owner) || ticket.generation != self.generation {
            debug!(chart = ticket.owner.0, "stale tooltip placement discarded");
            return None;
        }
        let placed = compute_position(
            ticket.anchor,
            measured,
            self.surface.boundary(),
            self.placement_options,
        );
        self.surface.move_to(placed.position);
        self.placement = Some(placed);
        Some(placed)
    }

    /// Places the overlay immediately using the surface's current size.
    pub fn position(&mut self, owner: ChartId, anchor: Point) -> Option<PlacedOverlay> {
        let ticket = self.request_position(owner, anchor)?;
        let measured = self.surface.measure();
        self.commit_position(ticket, measured)
    }

    /// Releases the overlay if `owner` holds it; called on chart teardown.
    pub fn unregister(&mut self, owner: ChartId) {
        if self.owner == Some(owner) {
            self.hide(owner);
        }
        debug!(chart = owner.0, "chart left tooltip overlay");
    }

    /// Detaches the surface for good.
    pub fn dispose(&mut self) {
        if matches!(self.state, OverlayState::Idle | OverlayState::Visible) {
            self.surface.detach();
        }
        self.owner = None;
        self.placement = None;
        self.state = OverlayState::Destroyed;
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    #[must_use]
    pub fn owner(&self) -> Option<ChartId> {
        self.owner
    }

    #[must_use]
    pub fn placement(&self) -> Option<PlacedOverlay> {
        self.placement
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn is_visible_for(&self, owner: ChartId) -> bool {
        self.state == OverlayState::Visible && self.owner == Some(owner)
    }
}
