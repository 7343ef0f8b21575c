use std::path::{Path, PathBuf};
use std::sync::Arc;

use seatmap_engine::{
    generate_stadium_venue, load_venue_from_path, resolve_app_paths, run_app, write_snapshot_png,
    write_venue_json, LoopConfig, SeatMapSession, SessionConfig, TierTable, Venue, Viewport,
    LAYOUT_ENV_VAR, MAX_SEATS_ENV_VAR, TIERS_ENV_VAR,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 42;
const DEFAULT_SNAPSHOT_WIDTH: u32 = 1280;
const DEFAULT_SNAPSHOT_HEIGHT: u32 = 800;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Mode {
    Window,
    Snapshot {
        out: PathBuf,
        width: u32,
        height: u32,
        zoom: Option<f32>,
        heat_map: bool,
    },
    Generate {
        out: PathBuf,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CliOptions {
    pub(crate) layout: Option<PathBuf>,
    pub(crate) large: bool,
    pub(crate) seed: u64,
    pub(crate) tiers: Option<PathBuf>,
    pub(crate) max_seats: Option<usize>,
    pub(crate) mode: Mode,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            layout: None,
            large: false,
            seed: DEFAULT_SEED,
            tiers: None,
            max_seats: None,
            mode: Mode::Window,
        }
    }
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

pub(crate) fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut snapshot_out: Option<PathBuf> = None;
    let mut generate_out: Option<PathBuf> = None;
    let mut width = DEFAULT_SNAPSHOT_WIDTH;
    let mut height = DEFAULT_SNAPSHOT_HEIGHT;
    let mut zoom: Option<f32> = None;
    let mut heat_map = false;
    let mut snapshot_only_flag: Option<&str> = None;

    let mut index = 0usize;
    while index < args.len() {
        let flag = args[index].as_str();
        let value = || {
            args.get(index + 1)
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag {
            "-h" | "--help" => {
                options.mode = Mode::Help;
                return Ok(options);
            }
            "--layout" => {
                options.layout = Some(PathBuf::from(value()?));
                index += 2;
            }
            "--large" => {
                options.large = true;
                index += 1;
            }
            "--seed" => {
                let raw = value()?;
                options.seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --seed value '{raw}' (expected u64)"))?;
                index += 2;
            }
            "--tiers" => {
                options.tiers = Some(PathBuf::from(value()?));
                index += 2;
            }
            "--max-seats" => {
                options.max_seats = Some(parse_max_seats(value()?, "--max-seats")?);
                index += 2;
            }
            "--snapshot" => {
                snapshot_out = Some(PathBuf::from(value()?));
                index += 2;
            }
            "--width" => {
                let raw = value()?;
                width = parse_dimension(raw, "--width")?;
                snapshot_only_flag.get_or_insert("--width");
                index += 2;
            }
            "--height" => {
                let raw = value()?;
                height = parse_dimension(raw, "--height")?;
                snapshot_only_flag.get_or_insert("--height");
                index += 2;
            }
            "--zoom" => {
                let raw = value()?;
                let parsed = raw
                    .parse::<f32>()
                    .ok()
                    .filter(|zoom| zoom.is_finite() && *zoom > 0.0)
                    .ok_or_else(|| format!("invalid --zoom value '{raw}' (expected > 0)"))?;
                zoom = Some(parsed);
                snapshot_only_flag.get_or_insert("--zoom");
                index += 2;
            }
            "--heat-map" => {
                heat_map = true;
                snapshot_only_flag.get_or_insert("--heat-map");
                index += 1;
            }
            "--generate" => {
                generate_out = Some(PathBuf::from(value()?));
                index += 2;
            }
            other => return Err(format!("unknown argument '{other}'\n\n{}", usage_text())),
        }
    }

    options.mode = match (snapshot_out, generate_out) {
        (Some(_), Some(_)) => {
            return Err("--snapshot and --generate cannot be combined".to_string());
        }
        (Some(out), None) => Mode::Snapshot {
            out,
            width,
            height,
            zoom,
            heat_map,
        },
        (None, Some(out)) => {
            if let Some(flag) = snapshot_only_flag {
                return Err(format!("{flag} only applies to --snapshot"));
            }
            Mode::Generate { out }
        }
        (None, None) => {
            if let Some(flag) = snapshot_only_flag {
                return Err(format!("{flag} only applies to --snapshot"));
            }
            Mode::Window
        }
    };
    Ok(options)
}

/// Fills unset options from `SEATMAP_LAYOUT`, `SEATMAP_TIERS` and
/// `SEATMAP_MAX_SEATS`. Flags win over the environment.
pub(crate) fn apply_env_overrides(
    mut options: CliOptions,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CliOptions, String> {
    if options.layout.is_none() && !options.large {
        options.layout = lookup(LAYOUT_ENV_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);
    }
    if options.tiers.is_none() {
        options.tiers = lookup(TIERS_ENV_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);
    }
    if options.max_seats.is_none() {
        if let Some(raw) = lookup(MAX_SEATS_ENV_VAR) {
            options.max_seats = Some(parse_max_seats(&raw, MAX_SEATS_ENV_VAR)?);
        }
    }
    Ok(options)
}

pub(crate) fn run(options: CliOptions) -> Result<(), String> {
    info!("=== Seat Map Startup ===");
    match &options.mode {
        Mode::Help => {
            println!("{}", usage_text());
            Ok(())
        }
        Mode::Generate { out } => generate(out, options.seed),
        Mode::Snapshot {
            out,
            width,
            height,
            zoom,
            heat_map,
        } => {
            let mut session = build_session(&options)?;
            if let Some(zoom) = zoom {
                session.set_zoom(*zoom);
            }
            if *heat_map {
                session.toggle_heat_map();
            }
            let image = session
                .snapshot(Viewport {
                    width: *width,
                    height: *height,
                })
                .map_err(|error| error.to_string())?;
            write_snapshot_png(out, &image).map_err(|error| error.to_string())
        }
        Mode::Window => {
            let session = build_session(&options)?;
            let window_title = session
                .venue()
                .map(|venue| format!("Seat Map | {}", venue.label))
                .unwrap_or_else(|| LoopConfig::default().window_title);
            let config = LoopConfig {
                window_title,
                ..LoopConfig::default()
            };
            run_app(session, config).map_err(|error| error.to_string())
        }
    }
}

fn generate(out: &Path, seed: u64) -> Result<(), String> {
    let venue = generate_stadium_venue(seed);
    write_venue_json(out, &venue).map_err(|error| error.to_string())?;
    info!(
        path = %out.display(),
        seed,
        seat_count = venue.seat_count(),
        "layout_generated"
    );
    Ok(())
}

fn build_session(options: &CliOptions) -> Result<SeatMapSession, String> {
    let tiers = match &options.tiers {
        Some(path) => TierTable::load_from_path(path).map_err(|error| error.to_string())?,
        None => TierTable::default(),
    };
    let config = SessionConfig {
        max_selectable: options
            .max_seats
            .unwrap_or(SessionConfig::default().max_selectable),
        ..SessionConfig::default()
    };
    let mut session = SeatMapSession::new(config, Arc::new(tiers));
    let venue = resolve_venue(options)?;
    session
        .load_venue(venue)
        .map_err(|error| error.to_string())?;
    Ok(session)
}

fn resolve_venue(options: &CliOptions) -> Result<Venue, String> {
    if options.large {
        return Ok(generate_stadium_venue(options.seed));
    }
    if let Some(path) = &options.layout {
        return load_venue_from_path(path).map_err(|error| error.to_string());
    }

    let paths = resolve_app_paths().map_err(|error| error.to_string())?;
    if paths.default_layout.is_file() {
        return load_venue_from_path(&paths.default_layout).map_err(|error| error.to_string());
    }
    warn!(
        path = %paths.default_layout.display(),
        fallback = "generated_stadium",
        "default_layout_missing"
    );
    Ok(generate_stadium_venue(options.seed))
}

fn parse_max_seats(raw: &str, source: &str) -> Result<usize, String> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| format!("invalid {source} value '{raw}' (expected integer >= 1)"))
}

fn parse_dimension(raw: &str, flag: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| format!("invalid {flag} value '{raw}' (expected integer >= 1)"))
}

pub(crate) fn usage_text() -> String {
    [
        "seatmap-viewer - interactive seat map",
        "",
        "Usage:",
        "  seatmap-viewer [--layout <file> | --large [--seed <u64>]] [--tiers <file>] [--max-seats <n>]",
        "  seatmap-viewer [layout options] --snapshot <out.png> [--width <px>] [--height <px>] [--zoom <f32>] [--heat-map]",
        "  seatmap-viewer [--seed <u64>] --generate <out.json>",
        "",
        "Environment:",
        "  SEATMAP_ROOT       project root holding assets/venue.json",
        "  SEATMAP_LAYOUT     layout file when --layout is not given",
        "  SEATMAP_TIERS      tier table file when --tiers is not given",
        "  SEATMAP_MAX_SEATS  selection capacity when --max-seats is not given",
        "  SEATMAP_MAX_FPS    render fps cap (0 disables)",
        "",
        "Keys:",
        "  click toggle seat, drag pan, wheel / + / - zoom, 0 reset view",
        "  arrows move focus, Enter/Space toggle focused seat, Esc clear focus or quit",
        "  1-8 pick adjacent seats, H heat map, Delete clear selection",
    ]
    .join("\n")
}
