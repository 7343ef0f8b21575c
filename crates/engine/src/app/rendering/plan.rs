use std::collections::HashMap;
use std::fmt;

use crate::app::{Camera, Vec2};
use crate::layout::SpatialDataset;
use crate::pricing::{Rgba, TierTable};
use crate::selection::SelectionStore;

use super::lod::{
    focus_outline_corner_radius, focus_outline_size, lod_tier_for_zoom, seat_corner_radius,
    seat_draw_size, LodTier,
};
use super::palette::{resolve_seat_paint, PaintInputs, CLEAR_COLOR, FOCUS_OUTLINE_COLOR};
use super::transform::{view_bounds_world, Viewport, WorldBounds};

pub const CULL_BUFFER_PX: f32 = 100.0;
/// Layouts with more seats than this are drawn with culling and batching.
pub const CULLED_STRATEGY_THRESHOLD: usize = 1000;

/// Everything a strategy reads to plan one frame.
#[derive(Clone, Copy)]
pub struct FrameInputs<'a> {
    pub dataset: &'a SpatialDataset,
    pub camera: &'a Camera,
    pub selection: &'a SelectionStore,
    pub focused: Option<&'a str>,
    pub heat_map: bool,
    pub tiers: &'a TierTable,
    pub viewport: Viewport,
    pub cull_buffer_px: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatShape {
    pub tier: LodTier,
    pub size: f32,
    pub corner_radius: f32,
}

impl SeatShape {
    pub fn for_zoom(zoom: f32) -> Self {
        Self {
            tier: lod_tier_for_zoom(zoom),
            size: seat_draw_size(zoom),
            corner_radius: seat_corner_radius(zoom),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedSeat {
    pub index: usize,
    pub center: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub color: Rgba,
    pub seats: Vec<PlannedSeat>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusOutline {
    pub index: usize,
    pub center: Vec2,
    pub size: f32,
    pub corner_radius: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub total_seats: usize,
    pub visible_seats: usize,
    pub batch_count: usize,
}

/// Surface-space description of one frame, ready to rasterise.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub viewport: Viewport,
    pub background: Rgba,
    pub shape: SeatShape,
    pub batches: Vec<DrawBatch>,
    pub focus_outline: Option<FocusOutline>,
    pub stats: FrameStats,
}

impl FramePlan {
    pub fn empty(viewport: Viewport, zoom: f32) -> Self {
        Self {
            viewport,
            background: CLEAR_COLOR,
            shape: SeatShape::for_zoom(zoom),
            batches: Vec::new(),
            focus_outline: None,
            stats: FrameStats::default(),
        }
    }

    pub fn planned_seats(&self) -> impl Iterator<Item = &PlannedSeat> {
        self.batches.iter().flat_map(|batch| batch.seats.iter())
    }
}

pub trait RenderStrategy: fmt::Debug {
    fn name(&self) -> &'static str;

    fn plan(&self, inputs: &FrameInputs<'_>) -> FramePlan;
}

/// Linear cull against the padded view rectangle, then one batch per color
/// in order of first appearance.
#[derive(Debug, Default, Clone, Copy)]
pub struct CulledBatched;

/// Every seat, no culling, one batch per seat in dataset order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Direct;

pub fn strategy_for_seat_count(seat_count: usize) -> Box<dyn RenderStrategy> {
    if seat_count > CULLED_STRATEGY_THRESHOLD {
        Box::new(CulledBatched)
    } else {
        Box::new(Direct)
    }
}

impl RenderStrategy for CulledBatched {
    fn name(&self) -> &'static str {
        "culled_batched"
    }

    fn plan(&self, inputs: &FrameInputs<'_>) -> FramePlan {
        let zoom = inputs.camera.effective_zoom();
        let mut plan = FramePlan::empty(inputs.viewport, zoom);
        plan.stats.total_seats = inputs.dataset.len();
        if inputs.viewport.is_empty() {
            return plan;
        }

        let bounds = cull_bounds(inputs);
        let mut batch_by_color: HashMap<Rgba, usize> = HashMap::new();
        for (index, record) in inputs.dataset.records().iter().enumerate() {
            if !bounds.contains(record.world) {
                continue;
            }
            let color = seat_color(inputs, index);
            let batch_index = *batch_by_color.entry(color).or_insert_with(|| {
                plan.batches.push(DrawBatch {
                    color,
                    seats: Vec::new(),
                });
                plan.batches.len() - 1
            });
            plan.batches[batch_index].seats.push(PlannedSeat {
                index,
                center: inputs.camera.world_to_surface(record.world),
            });
            plan.stats.visible_seats += 1;

            if is_focused(inputs, index) {
                plan.focus_outline = Some(focus_outline(inputs, index, zoom));
            }
        }

        plan.stats.batch_count = plan.batches.len();
        plan
    }
}

impl RenderStrategy for Direct {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn plan(&self, inputs: &FrameInputs<'_>) -> FramePlan {
        let zoom = inputs.camera.effective_zoom();
        let mut plan = FramePlan::empty(inputs.viewport, zoom);
        plan.stats.total_seats = inputs.dataset.len();
        if inputs.viewport.is_empty() {
            return plan;
        }

        for (index, record) in inputs.dataset.records().iter().enumerate() {
            plan.batches.push(DrawBatch {
                color: seat_color(inputs, index),
                seats: vec![PlannedSeat {
                    index,
                    center: inputs.camera.world_to_surface(record.world),
                }],
            });
            if is_focused(inputs, index) {
                plan.focus_outline = Some(focus_outline(inputs, index, zoom));
            }
        }

        plan.stats.visible_seats = plan.batches.len();
        plan.stats.batch_count = plan.batches.len();
        plan
    }
}

pub fn cull_bounds(inputs: &FrameInputs<'_>) -> WorldBounds {
    view_bounds_world(inputs.camera, inputs.viewport, inputs.cull_buffer_px)
}

fn seat_color(inputs: &FrameInputs<'_>, index: usize) -> Rgba {
    let Some(record) = inputs.dataset.record(index) else {
        return CLEAR_COLOR;
    };
    resolve_seat_paint(
        PaintInputs {
            selected: inputs.selection.is_selected(&record.id),
            focused: is_focused(inputs, index),
            heat_map: inputs.heat_map,
            tier: record.tier,
            status: record.status,
        },
        inputs.tiers,
    )
    .color()
}

fn is_focused(inputs: &FrameInputs<'_>, index: usize) -> bool {
    match (inputs.focused, inputs.dataset.record(index)) {
        (Some(focused), Some(record)) => record.id == focused,
        _ => false,
    }
}

fn focus_outline(inputs: &FrameInputs<'_>, index: usize, zoom: f32) -> FocusOutline {
    let world = inputs
        .dataset
        .record(index)
        .map(|record| record.world)
        .unwrap_or_default();
    FocusOutline {
        index,
        center: inputs.camera.world_to_surface(world),
        size: focus_outline_size(zoom),
        corner_radius: focus_outline_corner_radius(zoom),
        color: FOCUS_OUTLINE_COLOR,
    }
}
