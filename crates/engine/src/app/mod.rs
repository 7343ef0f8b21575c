mod camera;
mod focus;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod schedule;
mod session;

pub use camera::{
    Camera, CameraLimits, Vec2, CAMERA_ZOOM_DEFAULT, CAMERA_ZOOM_MAX, CAMERA_ZOOM_MIN,
    CAMERA_ZOOM_STEP, CAMERA_ZOOM_STEP_LARGE,
};
pub use focus::{next_focus, FocusDirection};
pub use hit_test::{hit_test, is_actionable};
pub use input::{InputAction, InputSnapshot, DRAG_THRESHOLD_PX};
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig, RENDER_FPS_CAP_ENV_VAR};
pub use metrics::{FrameRateHealth, LoopMetricsSnapshot, MetricsHandle, CRITICAL_FPS, WARNING_FPS};
pub use rendering::{
    focus_outline_size, lod_tier_for_zoom, rasterize_plan, render_snapshot, resolve_seat_paint,
    seat_corner_radius, seat_draw_size, status_color, strategy_for_seat_count, view_bounds_world,
    world_to_surface_px, write_snapshot_png, CulledBatched, Direct, DrawBatch, FocusOutline,
    FrameInputs, FramePlan, FrameStats, LodTier, PaintInputs, PlannedSeat, RenderStrategy,
    Renderer, SeatPaint, SeatShape, SnapshotError, Viewport, WorldBounds,
    CULLED_STRATEGY_THRESHOLD, CULL_BUFFER_PX, LOD_LOW_ZOOM_THRESHOLD, LOD_ULTRA_ZOOM_THRESHOLD,
    SEAT_BASE_SIZE_PX, SEAT_MIN_SIZE_PX,
};
pub use schedule::{FrameScheduler, FrameTicket};
pub use session::{InputResponse, ReloadReport, SeatAction, SeatMapSession, SessionConfig};
