use crate::app::Vec2;
use crate::pricing::Rgba;

use super::plan::{FocusOutline, FramePlan};

const FOCUS_OUTLINE_THICKNESS_PX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SurfaceRect {
    left: f32,
    top: f32,
    size: f32,
    corner_radius: f32,
}

impl SurfaceRect {
    fn centered(center: Vec2, size: f32, corner_radius: f32) -> Self {
        Self {
            left: center.x - size * 0.5,
            top: center.y - size * 0.5,
            size,
            corner_radius: corner_radius.clamp(0.0, size * 0.5),
        }
    }

    fn inset(self, amount: f32) -> Self {
        let size = (self.size - 2.0 * amount).max(0.0);
        Self {
            left: self.left + amount,
            top: self.top + amount,
            size,
            corner_radius: (self.corner_radius - amount).clamp(0.0, size * 0.5),
        }
    }

    /// Pixel-center containment, corners trimmed to `corner_radius`.
    fn contains_pixel(&self, x: i32, y: i32) -> bool {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let right = self.left + self.size;
        let bottom = self.top + self.size;
        if px < self.left || px >= right || py < self.top || py >= bottom {
            return false;
        }
        let radius = self.corner_radius;
        if radius <= 0.0 {
            return true;
        }

        let corner_x = if px < self.left + radius {
            self.left + radius
        } else if px > right - radius {
            right - radius
        } else {
            return true;
        };
        let corner_y = if py < self.top + radius {
            self.top + radius
        } else if py > bottom - radius {
            bottom - radius
        } else {
            return true;
        };
        let dx = px - corner_x;
        let dy = py - corner_y;
        dx * dx + dy * dy <= radius * radius
    }

    fn pixel_span(&self, width: u32, height: u32) -> Option<(i32, i32, i32, i32)> {
        if self.size <= 0.0 {
            return None;
        }
        let x0 = (self.left.floor() as i32).max(0);
        let y0 = (self.top.floor() as i32).max(0);
        let x1 = ((self.left + self.size).ceil() as i32).min(width as i32);
        let y1 = ((self.top + self.size).ceil() as i32).min(height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }
}

/// Writes the whole plan into an RGBA frame of `width * height` pixels.
pub fn rasterize_plan(frame: &mut [u8], width: u32, height: u32, plan: &FramePlan) {
    if width == 0 || height == 0 {
        return;
    }
    clear_frame(frame, plan.background);

    for batch in &plan.batches {
        for seat in &batch.seats {
            let rect = SurfaceRect::centered(seat.center, plan.shape.size, plan.shape.corner_radius);
            fill_rect(frame, width, height, rect, batch.color);
        }
    }

    if let Some(outline) = plan.focus_outline {
        draw_focus_outline(frame, width, height, &outline);
    }
}

pub fn clear_frame(frame: &mut [u8], color: Rgba) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&color);
    }
}

fn draw_focus_outline(frame: &mut [u8], width: u32, height: u32, outline: &FocusOutline) {
    let outer = SurfaceRect::centered(outline.center, outline.size, outline.corner_radius);
    let inner = outer.inset(FOCUS_OUTLINE_THICKNESS_PX);
    let Some((x0, y0, x1, y1)) = outer.pixel_span(width, height) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            if outer.contains_pixel(x, y) && !inner.contains_pixel(x, y) {
                write_pixel_rgba_clipped(frame, width as usize, x, y, outline.color);
            }
        }
    }
}

fn fill_rect(frame: &mut [u8], width: u32, height: u32, rect: SurfaceRect, color: Rgba) {
    let Some((x0, y0, x1, y1)) = rect.pixel_span(width, height) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            if rect.contains_pixel(x, y) {
                write_pixel_rgba_clipped(frame, width as usize, x, y, color);
            }
        }
    }
}

fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: Rgba) {
    if x < 0 || y < 0 {
        return;
    }
    let x = x as usize;
    let y = y as usize;
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::plan::{DrawBatch, PlannedSeat, SeatShape};
    use crate::app::rendering::Viewport;

    const RED: Rgba = [255, 0, 0, 255];
    const BLACK: Rgba = [0, 0, 0, 255];

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> Rgba {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn single_seat_plan(center: Vec2, zoom: f32) -> FramePlan {
        FramePlan {
            viewport: Viewport {
                width: 64,
                height: 64,
            },
            background: BLACK,
            shape: SeatShape::for_zoom(zoom),
            batches: vec![DrawBatch {
                color: RED,
                seats: vec![PlannedSeat { index: 0, center }],
            }],
            focus_outline: None,
            stats: Default::default(),
        }
    }

    fn painted_count(frame: &[u8], color: Rgba) -> usize {
        frame
            .chunks_exact(4)
            .filter(|chunk| *chunk == color.as_slice())
            .count()
    }

    #[test]
    fn square_seat_covers_size_squared_pixels() {
        let mut frame = vec![0u8; 64 * 64 * 4];
        rasterize_plan(&mut frame, 64, 64, &single_seat_plan(Vec2 { x: 32.0, y: 32.0 }, 0.6));
        let painted = painted_count(&frame, RED);
        assert!(painted >= 36 && painted <= 64, "painted {painted}");
        assert_eq!(pixel(&frame, 64, 32, 32), RED);
        assert_eq!(pixel(&frame, 64, 0, 0), BLACK);
    }

    #[test]
    fn rounded_seat_trims_corners() {
        let mut frame = vec![0u8; 64 * 64 * 4];
        rasterize_plan(&mut frame, 64, 64, &single_seat_plan(Vec2 { x: 32.0, y: 32.0 }, 3.0));
        assert_eq!(pixel(&frame, 64, 32, 32), RED);
        assert_eq!(pixel(&frame, 64, 14, 14), BLACK);
        assert_eq!(pixel(&frame, 64, 14, 32), RED);
    }

    #[test]
    fn seats_partially_off_surface_are_clipped() {
        let mut frame = vec![0u8; 64 * 64 * 4];
        rasterize_plan(&mut frame, 64, 64, &single_seat_plan(Vec2 { x: 0.0, y: 63.0 }, 1.0));
        assert_eq!(pixel(&frame, 64, 0, 63), RED);
        assert_eq!(frame.len(), 64 * 64 * 4);
    }

    #[test]
    fn focus_outline_is_a_ring() {
        let mut frame = vec![0u8; 64 * 64 * 4];
        let mut plan = single_seat_plan(Vec2 { x: 32.0, y: 32.0 }, 1.0);
        plan.focus_outline = Some(FocusOutline {
            index: 0,
            center: Vec2 { x: 32.0, y: 32.0 },
            size: 16.0,
            corner_radius: 0.0,
            color: [255, 255, 255, 255],
        });
        rasterize_plan(&mut frame, 64, 64, &plan);

        assert_eq!(pixel(&frame, 64, 24, 32), [255, 255, 255, 255]);
        assert_eq!(pixel(&frame, 64, 32, 32), RED);
        assert_eq!(pixel(&frame, 64, 20, 32), BLACK);
    }

    #[test]
    fn zero_extent_frame_is_left_untouched() {
        let mut frame: Vec<u8> = Vec::new();
        rasterize_plan(&mut frame, 0, 0, &single_seat_plan(Vec2::default(), 1.0));
        assert!(frame.is_empty());
    }
}
