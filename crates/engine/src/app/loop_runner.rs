use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::selection::SelectionSummary;

use super::input::InputCollector;
use super::metrics::{FrameRateHealth, MetricsAccumulator};
use super::schedule::FrameScheduler;
use super::{LoopMetricsSnapshot, MetricsHandle, Renderer, SeatMapSession};

pub const RENDER_FPS_CAP_ENV_VAR: &str = "SEATMAP_MAX_FPS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Seat Map".to_string(),
            window_width: 1280,
            window_height: 800,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(session: SeatMapSession, config: LoopConfig) -> Result<(), AppError> {
    let metrics_handle = MetricsHandle::default();
    run_app_with_metrics(session, config, metrics_handle)
}

pub fn run_app_with_metrics(
    mut session: SeatMapSession,
    config: LoopConfig,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let effective_render_cap = resolve_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let initial_size = window.inner_size();
    let mut input_collector = InputCollector::new(initial_size.width, initial_size.height);
    let summary_handle = session.summary_handle();

    info!(
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        strategy = session.strategy_name().unwrap_or("none"),
        "loop_config"
    );

    let (scheduler, ticket) = FrameScheduler::start();
    let mut ticket = Some(ticket);
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_applied_title: Option<String> = None;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    ticket.take();
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    input_collector.set_window_size(new_size.width, new_size.height);
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    input_collector.set_window_size(size.width, size.height);
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.set_cursor_position_px(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => {
                    input_collector.clear_cursor_position();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    input_collector.handle_mouse_wheel(delta);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let input = input_collector.snapshot_for_frame();
                    let response = session.apply_input(&input);
                    for action in &response.seat_actions {
                        debug!(?action, "seat_action");
                    }
                    if response.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        ticket.take();
                        window_target.exit();
                        return;
                    }

                    // Single render pacing point.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let plan = session.plan_frame(renderer.viewport());
                    if let Err(error) = renderer.render_plan(&plan) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let next_title = window_title(&config.window_title, &summary_handle.summary());
                    if last_applied_title.as_deref() != Some(next_title.as_str()) {
                        window.set_title(&next_title);
                        last_applied_title = Some(next_title);
                    }

                    metrics_accumulator.record_frame(raw_frame_dt, plan.stats);
                    if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                        metrics_handle.publish(snapshot);
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            visible_seats = snapshot.visible_seats,
                            batch_count = snapshot.batch_count,
                            total_seats = plan.stats.total_seats,
                            "loop_metrics"
                        );
                        log_frame_rate_health(&snapshot);
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if scheduler.should_schedule() {
                    window.request_redraw();
                } else {
                    window_target.set_control_flow(ControlFlow::Wait);
                }
            }
            Event::LoopExiting => {
                ticket.take();
                info!(selected = summary_handle.summary().count, "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn log_frame_rate_health(snapshot: &LoopMetricsSnapshot) {
    match snapshot.health() {
        FrameRateHealth::Healthy => {}
        FrameRateHealth::Degraded => warn!(
            fps = snapshot.fps,
            visible_seats = snapshot.visible_seats,
            "frame_rate_degraded"
        ),
        FrameRateHealth::Critical => error!(
            fps = snapshot.fps,
            visible_seats = snapshot.visible_seats,
            "frame_rate_degraded"
        ),
    }
}

fn window_title(base: &str, summary: &SelectionSummary) -> String {
    if summary.count == 0 {
        return base.to_string();
    }
    format!(
        "{base} | {}/{} seats | ${:.2}",
        summary.count, summary.max_selectable, summary.total_price
    )
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

/// `SEATMAP_MAX_FPS=0` turns the cap off.
fn resolve_render_fps_cap(config_cap: Option<u32>) -> Option<u32> {
    let raw = match env::var(RENDER_FPS_CAP_ENV_VAR) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return normalize_render_fps_cap(config_cap),
        Err(err) => {
            warn!(
                env_var = RENDER_FPS_CAP_ENV_VAR,
                error = %err,
                "unable to read render fps env var; falling back to config"
            );
            return normalize_render_fps_cap(config_cap);
        }
    };
    parse_render_fps_cap(&raw).unwrap_or_else(|| {
        warn!(
            env_var = RENDER_FPS_CAP_ENV_VAR,
            value = raw.as_str(),
            "invalid render fps env var value; falling back to config"
        );
        normalize_render_fps_cap(config_cap)
    })
}

fn parse_render_fps_cap(raw: &str) -> Option<Option<u32>> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .map(|fps| normalize_render_fps_cap(Some(fps)))
}
