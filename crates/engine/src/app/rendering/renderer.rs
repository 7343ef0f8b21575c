use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use tracing::debug;
use winit::window::Window;

use super::plan::FramePlan;
use super::raster::rasterize_plan;
use super::Viewport;

/// Window-backed software renderer. Draws a [`FramePlan`] into the `pixels`
/// frame and presents it.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width.max(1), size.height.max(1))?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        self.viewport = Viewport { width, height };
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Zero-extent surfaces (a minimised window) skip the frame; the next tick
    /// tries again.
    pub fn render_plan(&mut self, plan: &FramePlan) -> Result<(), Error> {
        if !plan_fits_surface(plan, self.viewport) {
            debug!(
                width = self.viewport.width,
                height = self.viewport.height,
                "render_skipped"
            );
            return Ok(());
        }

        rasterize_plan(
            self.pixels.frame_mut(),
            self.viewport.width,
            self.viewport.height,
            plan,
        );
        self.pixels.render()
    }
}

fn plan_fits_surface(plan: &FramePlan, surface: Viewport) -> bool {
    !surface.is_empty() && plan.viewport == surface
}
