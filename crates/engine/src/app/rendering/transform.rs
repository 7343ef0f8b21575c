use crate::app::{Camera, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl WorldBounds {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Surface rectangle grown by `padding_px` on every side, expressed in world
/// coordinates.
pub fn view_bounds_world(camera: &Camera, viewport: Viewport, padding_px: f32) -> WorldBounds {
    let padding = padding_px.max(0.0);
    let top_left = camera.surface_to_world(Vec2 {
        x: -padding,
        y: -padding,
    });
    let bottom_right = camera.surface_to_world(Vec2 {
        x: viewport.width as f32 + padding,
        y: viewport.height as f32 + padding,
    });

    WorldBounds {
        min_x: top_left.x,
        max_x: bottom_right.x,
        min_y: top_left.y,
        max_y: bottom_right.y,
    }
}

pub fn world_to_surface_px(camera: &Camera, world: Vec2) -> (i32, i32) {
    let surface = camera.world_to_surface(world);
    (surface.x.round() as i32, surface.y.round() as i32)
}
