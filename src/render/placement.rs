use serde::{Deserialize, Serialize};

use crate::core::{Point, Size};

/// Gap between the cursor and the overlay along the placement side.
pub const TOOLTIP_DISTANCE_CURSOR: f64 = 4.0;
/// Shift along the alignment axis so the overlay does not sit under the pointer.
pub const TOOLTIP_PADDING_FROM_CURSOR: f64 = 8.0;

/// Side and alignment of the overlay relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Placement {
    #[default]
    TopStart,
    BottomStart,
    TopEnd,
    BottomEnd,
}

impl Placement {
    #[must_use]
    pub const fn flipped_side(self) -> Self {
        match self {
            Self::TopStart => Self::BottomStart,
            Self::BottomStart => Self::TopStart,
            Self::TopEnd => Self::BottomEnd,
            Self::BottomEnd => Self::TopEnd,
        }
    }

    #[must_use]
    pub const fn flipped_alignment(self) -> Self {
        match self {
            Self::TopStart => Self::TopEnd,
            Self::TopEnd => Self::TopStart,
            Self::BottomStart => Self::BottomEnd,
            Self::BottomEnd => Self::BottomStart,
        }
    }

    const fn is_top(self) -> bool {
        matches!(self, Self::TopStart | Self::TopEnd)
    }

    const fn is_start(self) -> bool {
        matches!(self, Self::TopStart | Self::BottomStart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementOptions {
    pub preferred: Placement,
    pub main_axis_offset: f64,
    pub cross_axis_offset: f64,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            preferred: Placement::TopStart,
            main_axis_offset: TOOLTIP_DISTANCE_CURSOR,
            cross_axis_offset: TOOLTIP_PADDING_FROM_CURSOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedOverlay {
    pub position: Point,
    pub placement: Placement,
}

/// Places a floating box of `floating` size next to a zero-size anchor.
///
/// The preferred placement is used when it fits inside `boundary`; otherwise
/// the side flips, then the alignment, then both. When nothing fits the
/// candidate with the smallest overflow wins.
///
/// The cross-axis offset mirrors with the alignment: `*Start` boxes sit
/// right of the anchor and `*End` boxes left of it, so the pointer stays
/// uncovered on either side.
#[must_use]
pub fn compute_position(
    anchor: Point,
    floating: Size,
    boundary: Size,
    options: PlacementOptions,
) -> PlacedOverlay {
    let preferred = options.preferred;
    let candidates = [
        preferred,
        preferred.flipped_side(),
        preferred.flipped_alignment(),
        preferred.flipped_side().flipped_alignment(),
    ];

    let mut best: Option<(f64, PlacedOverlay)> = None;
    for placement in candidates {
        let position = position_for(anchor, floating, placement, options);
        let overflow = overflow_amount(position, floating, boundary);
        let placed = PlacedOverlay {
            position,
            placement,
        };
        if overflow <= 0.0 {
            return placed;
        }
        match best {
            Some((current, _)) if current <= overflow => {}
            _ => best = Some((overflow, placed)),
        }
    }

    best.map_or(
        PlacedOverlay {
            position: position_for(anchor, floating, preferred, options),
            placement: preferred,
        },
        |(_, placed)| placed,
    )
}

fn position_for(anchor: Point, floating: Size, placement: Placement, options: PlacementOptions) -> Point {
    let y = if placement.is_top() {
        anchor.y - floating.height - options.main_axis_offset
    } else {
        anchor.y + options.main_axis_offset
    };
    let x = if placement.is_start() {
        anchor.x + options.cross_axis_offset
    } else {
        anchor.x - floating.width - options.cross_axis_offset
    };
    Point::new(x, y)
}

fn overflow_amount(position: Point, floating: Size, boundary: Size) -> f64 {
    let left = (-position.x).max(0.0);
    let right = (position.x + floating.width - boundary.width).max(0.0);
    let top = (-position.y).max(0.0);
    let bottom = (position.y + floating.height - boundary.height).max(0.0);
    left + right + top + bottom
}
