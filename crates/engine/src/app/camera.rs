#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

pub const CAMERA_ZOOM_DEFAULT: f32 = 1.0;
pub const CAMERA_ZOOM_MIN: f32 = 0.5;
pub const CAMERA_ZOOM_MAX: f32 = 3.0;
/// Step used by mouse wheel and trackpad zoom.
pub const CAMERA_ZOOM_STEP: f32 = 0.1;
/// Step used by the zoom buttons and keyboard shortcuts.
pub const CAMERA_ZOOM_STEP_LARGE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLimits {
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            min_zoom: CAMERA_ZOOM_MIN,
            max_zoom: CAMERA_ZOOM_MAX,
        }
    }
}

impl CameraLimits {
    /// Falls back to the defaults when the bounds are non-finite, non-positive
    /// or inverted.
    pub fn normalized(self) -> Self {
        let valid = self.min_zoom.is_finite()
            && self.max_zoom.is_finite()
            && self.min_zoom > 0.0
            && self.min_zoom <= self.max_zoom;
        if valid {
            self
        } else {
            Self::default()
        }
    }
}

/// Surface position of a world point is `world * zoom + pan`, origin at the
/// top-left of the draw surface, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan: Vec2,
    pub zoom: f32,
    limits: CameraLimits,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraLimits::default())
    }
}

impl Camera {
    pub fn new(limits: CameraLimits) -> Self {
        let limits = limits.normalized();
        Self {
            pan: Vec2::default(),
            zoom: clamp_camera_zoom(CAMERA_ZOOM_DEFAULT, limits),
            limits,
        }
    }

    pub fn limits(&self) -> CameraLimits {
        self.limits
    }

    pub fn effective_zoom(&self) -> f32 {
        clamp_camera_zoom(self.zoom, self.limits)
    }

    pub fn set_zoom_clamped(&mut self, zoom: f32) {
        self.zoom = clamp_camera_zoom(zoom, self.limits);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom_clamped(self.zoom + CAMERA_ZOOM_STEP_LARGE);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom_clamped(self.zoom - CAMERA_ZOOM_STEP_LARGE);
    }

    pub fn apply_zoom_steps(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        let target_zoom = self.zoom + steps as f32 * CAMERA_ZOOM_STEP;
        self.set_zoom_clamped(target_zoom);
    }

    /// Wheel zoom that keeps the world point under `anchor_px` in place.
    pub fn apply_zoom_steps_around(&mut self, steps: i32, anchor_px: Vec2) {
        if steps == 0 || !anchor_px.x.is_finite() || !anchor_px.y.is_finite() {
            return;
        }
        let anchor_world = self.surface_to_world(anchor_px);
        self.apply_zoom_steps(steps);
        let zoom = self.effective_zoom();
        self.pan = Vec2 {
            x: anchor_px.x - anchor_world.x * zoom,
            y: anchor_px.y - anchor_world.y * zoom,
        };
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.pan.x += dx;
        self.pan.y += dy;
    }

    pub fn reset_view(&mut self) {
        self.pan = Vec2::default();
        self.set_zoom_clamped(CAMERA_ZOOM_DEFAULT);
    }

    pub fn world_to_surface(&self, world: Vec2) -> Vec2 {
        let zoom = self.effective_zoom();
        Vec2 {
            x: world.x * zoom + self.pan.x,
            y: world.y * zoom + self.pan.y,
        }
    }

    pub fn surface_to_world(&self, surface: Vec2) -> Vec2 {
        let zoom = self.effective_zoom();
        Vec2 {
            x: (surface.x - self.pan.x) / zoom,
            y: (surface.y - self.pan.y) / zoom,
        }
    }
}

fn clamp_camera_zoom(zoom: f32, limits: CameraLimits) -> f32 {
    if !zoom.is_finite() {
        return CAMERA_ZOOM_DEFAULT.clamp(limits.min_zoom, limits.max_zoom);
    }
    zoom.clamp(limits.min_zoom, limits.max_zoom)
}
