use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::info;

use crate::atomic_io::write_bytes_atomic;

use super::plan::FramePlan;
use super::raster::rasterize_plan;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot snapshot a {width}x{height} surface")]
    EmptySurface { width: u32, height: u32 },
    #[error("failed to encode snapshot png: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to write snapshot {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rasterises `plan` off-screen, exactly as the window renderer would.
pub fn render_snapshot(plan: &FramePlan) -> Result<RgbaImage, SnapshotError> {
    let width = plan.viewport.width;
    let height = plan.viewport.height;
    let empty = || SnapshotError::EmptySurface { width, height };
    if plan.viewport.is_empty() {
        return Err(empty());
    }

    let byte_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(empty)?;
    let mut frame = vec![0u8; byte_len];
    rasterize_plan(&mut frame, width, height, plan);
    RgbaImage::from_raw(width, height, frame).ok_or_else(empty)
}

pub fn write_snapshot_png(path: &Path, image: &RgbaImage) -> Result<(), SnapshotError> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(SnapshotError::Encode)?;
    write_bytes_atomic(path, bytes.get_ref()).map_err(|source| SnapshotError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "snapshot_written"
    );
    Ok(())
}
