//! Zoom-driven level of detail shared by drawing and hit testing.

pub const SEAT_BASE_SIZE_PX: f32 = 12.0;
pub const SEAT_MIN_SIZE_PX: f32 = 6.0;
pub const LOD_ULTRA_ZOOM_THRESHOLD: f32 = 0.5;
pub const LOD_LOW_ZOOM_THRESHOLD: f32 = 0.8;
const ULTRA_SHRINK: f32 = 0.7;
pub const FOCUS_OUTLINE_GROW_PX: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LodTier {
    Ultra,
    Low,
    High,
}

pub fn lod_tier_for_zoom(zoom: f32) -> LodTier {
    if zoom < LOD_ULTRA_ZOOM_THRESHOLD {
        LodTier::Ultra
    } else if zoom < LOD_LOW_ZOOM_THRESHOLD {
        LodTier::Low
    } else {
        LodTier::High
    }
}

/// Edge length in surface pixels of a seat drawn at `zoom`.
///
/// The hit tester uses this exact function for its hit box.
pub fn seat_draw_size(zoom: f32) -> f32 {
    let base = (SEAT_BASE_SIZE_PX * zoom).max(SEAT_MIN_SIZE_PX);
    match lod_tier_for_zoom(zoom) {
        LodTier::Ultra => (base * ULTRA_SHRINK).max(SEAT_MIN_SIZE_PX),
        LodTier::Low | LodTier::High => base,
    }
}

/// Corner radius of a seat; only the high tier rounds corners.
pub fn seat_corner_radius(zoom: f32) -> f32 {
    match lod_tier_for_zoom(zoom) {
        LodTier::High => (2.0 * zoom).max(1.0),
        LodTier::Ultra | LodTier::Low => 0.0,
    }
}

pub fn focus_outline_size(zoom: f32) -> f32 {
    seat_draw_size(zoom) + FOCUS_OUTLINE_GROW_PX
}

pub fn focus_outline_corner_radius(zoom: f32) -> f32 {
    match lod_tier_for_zoom(zoom) {
        LodTier::High => (4.0 * zoom).max(2.0),
        LodTier::Ultra | LodTier::Low => 0.0,
    }
}
