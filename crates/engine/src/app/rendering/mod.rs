mod lod;
mod palette;
mod plan;
mod raster;
mod renderer;
mod snapshot;
mod transform;

pub use lod::{
    focus_outline_size, lod_tier_for_zoom, seat_corner_radius, seat_draw_size, LodTier,
    LOD_LOW_ZOOM_THRESHOLD, LOD_ULTRA_ZOOM_THRESHOLD, SEAT_BASE_SIZE_PX, SEAT_MIN_SIZE_PX,
};
pub use palette::{resolve_seat_paint, status_color, PaintInputs, SeatPaint};
pub use plan::{
    strategy_for_seat_count, CulledBatched, Direct, DrawBatch, FocusOutline, FrameInputs,
    FramePlan, FrameStats, PlannedSeat, RenderStrategy, SeatShape, CULLED_STRATEGY_THRESHOLD,
    CULL_BUFFER_PX,
};
pub use raster::rasterize_plan;
pub use renderer::Renderer;
pub use snapshot::{render_snapshot, write_snapshot_png, SnapshotError};
pub use transform::{view_bounds_world, world_to_surface_px, Viewport, WorldBounds};
