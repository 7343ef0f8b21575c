use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
mod atomic_io;
pub mod layout;
pub mod pricing;
pub mod selection;

pub use app::{
    hit_test, render_snapshot, run_app, run_app_with_metrics, write_snapshot_png, AppError,
    Camera, CameraLimits, FocusDirection, FramePlan, InputAction, InputSnapshot, LoopConfig,
    LoopMetricsSnapshot, MetricsHandle, ReloadReport, Renderer, SeatAction, SeatMapSession,
    SessionConfig, SnapshotError, Vec2, Viewport,
};
pub use layout::{
    generate_stadium_venue, load_venue_from_path, parse_venue_json, validate_venue,
    write_venue_json, LayoutError, SeatStatus, SpatialDataset, Venue,
};
pub use pricing::{PriceTier, TierTable, TierTableError};
pub use selection::{
    find_adjacent, SelectedSeat, SelectionStore, SelectionSummary, SummaryHandle,
    DEFAULT_MAX_SELECTABLE,
};

pub const ROOT_ENV_VAR: &str = "SEATMAP_ROOT";
pub const LAYOUT_ENV_VAR: &str = "SEATMAP_LAYOUT";
pub const TIERS_ENV_VAR: &str = "SEATMAP_TIERS";
pub const MAX_SEATS_ENV_VAR: &str = "SEATMAP_MAX_SEATS";

pub const DEFAULT_LAYOUT_FILE: &str = "venue.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub default_layout: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "SEATMAP_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/seatmap\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Locates the project root and the bundled layout under `assets/`.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    Ok(app_paths_for_root(root))
}

fn app_paths_for_root(root: PathBuf) -> AppPaths {
    let assets_dir = root.join("assets");
    let default_layout = assets_dir.join(DEFAULT_LAYOUT_FILE);
    AppPaths {
        root,
        assets_dir,
        default_layout,
    }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            find_root_from(&exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn find_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
