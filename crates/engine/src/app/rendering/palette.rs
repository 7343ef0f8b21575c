use crate::layout::SeatStatus;
use crate::pricing::{Rgba, TierTable};

pub const CLEAR_COLOR: Rgba = [17, 24, 39, 255];
pub const AVAILABLE_COLOR: Rgba = [0x10, 0xb9, 0x81, 255];
pub const RESERVED_COLOR: Rgba = [0xf5, 0x9e, 0x0b, 255];
pub const SOLD_COLOR: Rgba = [0xef, 0x44, 0x44, 255];
pub const HELD_COLOR: Rgba = [0x8b, 0x5c, 0xf6, 255];
pub const SELECTED_COLOR: Rgba = [0x3b, 0x82, 0xf6, 255];
pub const FOCUSED_COLOR: Rgba = [0x1d, 0x4e, 0xd8, 255];
pub const FOCUS_OUTLINE_COLOR: Rgba = [255, 255, 255, 255];

/// Which rule decided a seat's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatPaint {
    Selected,
    Focused,
    Tier(Rgba),
    Status(SeatStatus),
}

impl SeatPaint {
    pub fn color(self) -> Rgba {
        match self {
            SeatPaint::Selected => SELECTED_COLOR,
            SeatPaint::Focused => FOCUSED_COLOR,
            SeatPaint::Tier(color) => color,
            SeatPaint::Status(status) => status_color(status),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PaintInputs {
    pub selected: bool,
    pub focused: bool,
    pub heat_map: bool,
    pub tier: u32,
    pub status: SeatStatus,
}

/// Precedence: selected, then focused, then the tier color when the heat map
/// is on, then the status color. A tier missing from the table falls through
/// to the status color.
pub fn resolve_seat_paint(inputs: PaintInputs, tiers: &TierTable) -> SeatPaint {
    if inputs.selected {
        return SeatPaint::Selected;
    }
    if inputs.focused {
        return SeatPaint::Focused;
    }
    if inputs.heat_map {
        if let Some(color) = tiers.color_for(inputs.tier) {
            return SeatPaint::Tier(color);
        }
    }
    SeatPaint::Status(inputs.status)
}

pub fn status_color(status: SeatStatus) -> Rgba {
    match status {
        SeatStatus::Available => AVAILABLE_COLOR,
        SeatStatus::Reserved => RESERVED_COLOR,
        SeatStatus::Sold => SOLD_COLOR,
        SeatStatus::Held => HELD_COLOR,
    }
}
