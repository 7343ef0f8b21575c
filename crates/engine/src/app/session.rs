use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::layout::{load_venue_from_path, validate_venue, LayoutError, SpatialDataset, Venue};
use crate::pricing::TierTable;
use crate::selection::{find_adjacent, SelectionStore, SummaryHandle, DEFAULT_MAX_SELECTABLE};

use super::focus::{next_focus, FocusDirection};
use super::hit_test::{hit_test, is_actionable};
use super::input::{InputAction, InputSnapshot};
use super::rendering::{
    render_snapshot, strategy_for_seat_count, FrameInputs, FramePlan, RenderStrategy,
    SnapshotError, Viewport, CULL_BUFFER_PX,
};
use super::{Camera, CameraLimits, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub max_selectable: usize,
    pub camera_limits: CameraLimits,
    pub cull_buffer_px: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_selectable: DEFAULT_MAX_SELECTABLE,
            camera_limits: CameraLimits::default(),
            cull_buffer_px: CULL_BUFFER_PX,
        }
    }
}

/// What a pointer click or keyboard activation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatAction {
    Miss,
    NotActionable { seat_id: String },
    Selected { seat_id: String },
    Deselected { seat_id: String },
    Blocked { seat_id: String },
}

/// How the selection survived a layout load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadReport {
    pub venue_changed: bool,
    pub kept: usize,
    pub dropped: usize,
}

/// What one frame of input did to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputResponse {
    pub quit_requested: bool,
    pub seat_actions: Vec<SeatAction>,
}

#[derive(Debug)]
struct LoadedLayout {
    venue: Venue,
    dataset: SpatialDataset,
    strategy: Box<dyn RenderStrategy>,
}

/// Owns every piece of seat map state and funnels all mutation through one
/// place: layout, camera, selection, keyboard focus and the heat-map toggle.
#[derive(Debug)]
pub struct SeatMapSession {
    layout: Option<LoadedLayout>,
    camera: Camera,
    selection: SelectionStore,
    focused: Option<String>,
    heat_map: bool,
    tiers: Arc<TierTable>,
    cull_buffer_px: f32,
}

impl SeatMapSession {
    pub fn new(config: SessionConfig, tiers: Arc<TierTable>) -> Self {
        Self {
            layout: None,
            camera: Camera::new(config.camera_limits),
            selection: SelectionStore::new(config.max_selectable, Arc::clone(&tiers)),
            focused: None,
            heat_map: false,
            tiers,
            cull_buffer_px: config.cull_buffer_px.max(0.0),
        }
    }

    /// Replaces the layout wholesale, or leaves everything untouched when the
    /// venue fails validation.
    ///
    /// A venue with a different id clears selection and focus. Reloading the
    /// same venue id keeps selected seats that still exist at the price they
    /// were selected at, and drops the rest.
    pub fn load_venue(&mut self, venue: Venue) -> Result<ReloadReport, LayoutError> {
        if let Err(error) = validate_venue(&venue) {
            warn!(venue_id = %venue.id, error = %error, "layout_load_failed");
            return Err(error);
        }

        let dataset = SpatialDataset::build(&venue);
        let strategy = strategy_for_seat_count(dataset.len());
        let venue_changed = self
            .layout
            .as_ref()
            .map_or(true, |previous| previous.venue.id != venue.id);

        let dropped = if venue_changed {
            let dropped = self.selection.len();
            self.selection.clear_selection();
            self.focused = None;
            dropped
        } else {
            if let Some(focused) = &self.focused {
                if !dataset.contains(focused) {
                    self.focused = None;
                }
            }
            self.selection
                .retain(|entry| dataset.contains(&entry.seat.id))
        };

        info!(
            strategy = strategy.name(),
            seat_count = dataset.len(),
            "render_strategy_selected"
        );
        info!(
            venue_id = %venue.id,
            section_count = venue.sections.len(),
            seat_count = dataset.len(),
            venue_changed,
            selection_kept = self.selection.len(),
            selection_dropped = dropped,
            "layout_loaded"
        );

        self.layout = Some(LoadedLayout {
            venue,
            dataset,
            strategy,
        });
        Ok(ReloadReport {
            venue_changed,
            kept: self.selection.len(),
            dropped,
        })
    }

    pub fn load_venue_path(&mut self, path: &Path) -> Result<ReloadReport, LayoutError> {
        let venue = load_venue_from_path(path).map_err(|error| {
            warn!(path = %path.display(), error = %error, "layout_load_failed");
            error
        })?;
        self.load_venue(venue)
    }

    pub fn venue(&self) -> Option<&Venue> {
        self.layout.as_ref().map(|layout| &layout.venue)
    }

    pub fn dataset(&self) -> Option<&SpatialDataset> {
        self.layout.as_ref().map(|layout| &layout.dataset)
    }

    pub fn strategy_name(&self) -> Option<&'static str> {
        self.layout.as_ref().map(|layout| layout.strategy.name())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn summary_handle(&self) -> SummaryHandle {
        self.selection.summary_handle()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn heat_map(&self) -> bool {
        self.heat_map
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// New lookups apply to future selections only.
    pub fn set_tiers(&mut self, tiers: Arc<TierTable>) {
        self.selection.set_tiers(Arc::clone(&tiers));
        self.tiers = tiers;
    }

    /// Toggles the seat under `pointer_px`: deselects it when selected,
    /// otherwise tries to select it.
    pub fn click_at(&mut self, pointer_px: Vec2) -> SeatAction {
        let Some(layout) = self.layout.as_ref() else {
            return SeatAction::Miss;
        };
        match hit_test(&layout.dataset, &self.camera, pointer_px) {
            Some(index) => self.toggle_seat(index),
            None => SeatAction::Miss,
        }
    }

    pub fn move_focus(&mut self, direction: FocusDirection) -> bool {
        let Some(layout) = self.layout.as_ref() else {
            return false;
        };
        match next_focus(
            &layout.venue,
            &layout.dataset,
            self.focused.as_deref(),
            direction,
        ) {
            Some(seat_id) => {
                debug!(seat_id = %seat_id, ?direction, "focus_moved");
                self.focused = Some(seat_id);
                true
            }
            None => false,
        }
    }

    /// Enter/Space on the focused seat.
    pub fn activate_focus(&mut self) -> SeatAction {
        let index = match (self.layout.as_ref(), self.focused.as_deref()) {
            (Some(layout), Some(seat_id)) => layout.dataset.index_of(seat_id),
            _ => None,
        };
        match index {
            Some(index) => self.toggle_seat(index),
            None => SeatAction::Miss,
        }
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    pub fn toggle_heat_map(&mut self) -> bool {
        self.heat_map = !self.heat_map;
        info!(heat_map = self.heat_map, "heat_map_toggled");
        self.heat_map
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    pub fn zoom_steps_around(&mut self, steps: i32, anchor_px: Vec2) {
        self.camera.apply_zoom_steps_around(steps, anchor_px);
    }

    pub fn reset_view(&mut self) {
        self.camera.reset_view();
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.camera.pan_by(dx, dy);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.camera.set_zoom_clamped(zoom);
    }

    pub fn deselect_seat(&mut self, seat_id: &str) -> bool {
        self.selection.deselect_seat(seat_id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    /// Replaces the selection with the first adjacent run of `count` seats.
    /// Leaves the selection alone when no run exists or the run would not fit
    /// under the selection cap. Returns how many seats ended up selected.
    pub fn select_adjacent(&mut self, count: usize) -> usize {
        let Some(layout) = self.layout.as_ref() else {
            return 0;
        };
        let max_selectable = self.selection.max_selectable();
        if count > max_selectable {
            info!(count, max_selectable, "adjacent_run_exceeds_capacity");
            return 0;
        }
        let run = find_adjacent(Some(&layout.venue), &self.selection, count);
        if run.is_empty() {
            info!(count, "adjacent_run_not_found");
            return 0;
        }

        self.selection.clear_selection();
        let mut selected = 0;
        for entry in &run {
            let resolved = layout
                .dataset
                .index_of(&entry.seat.id)
                .and_then(|index| layout.dataset.resolve(&layout.venue, index));
            if let Some((section, row, seat)) = resolved {
                if self.selection.select_seat(seat, section, row) {
                    selected += 1;
                }
            }
        }
        info!(
            count,
            selected,
            first_seat = %run[0].seat.id,
            "adjacent_run_selected"
        );
        selected
    }

    pub fn plan_frame(&self, viewport: Viewport) -> FramePlan {
        let Some(layout) = self.layout.as_ref() else {
            return FramePlan::empty(viewport, self.camera.effective_zoom());
        };
        layout.strategy.plan(&FrameInputs {
            dataset: &layout.dataset,
            camera: &self.camera,
            selection: &self.selection,
            focused: self.focused.as_deref(),
            heat_map: self.heat_map,
            tiers: &self.tiers,
            viewport,
            cull_buffer_px: self.cull_buffer_px,
        })
    }

    pub fn snapshot(&self, viewport: Viewport) -> Result<RgbaImage, SnapshotError> {
        render_snapshot(&self.plan_frame(viewport))
    }

    /// Applies one frame of input. Escape clears focus, or asks to quit when
    /// nothing is focused.
    pub fn apply_input(&mut self, input: &InputSnapshot) -> InputResponse {
        let mut response = InputResponse::default();

        if let Some(count) = input.adjacent_request() {
            self.select_adjacent(count);
        }
        if input.was_pressed(InputAction::ClearSelection) {
            self.clear_selection();
        }

        for (action, direction) in [
            (InputAction::FocusUp, FocusDirection::Up),
            (InputAction::FocusDown, FocusDirection::Down),
            (InputAction::FocusLeft, FocusDirection::Left),
            (InputAction::FocusRight, FocusDirection::Right),
        ] {
            if input.was_pressed(action) {
                self.move_focus(direction);
            }
        }
        if input.was_pressed(InputAction::Activate) {
            let outcome = self.activate_focus();
            if outcome != SeatAction::Miss {
                response.seat_actions.push(outcome);
            }
        }
        if input.was_pressed(InputAction::Cancel) {
            if self.focused.is_some() {
                self.clear_focus();
            } else {
                response.quit_requested = true;
            }
        }

        if input.was_pressed(InputAction::ToggleHeatMap) {
            self.toggle_heat_map();
        }
        if input.was_pressed(InputAction::ZoomIn) {
            self.zoom_in();
        }
        if input.was_pressed(InputAction::ZoomOut) {
            self.zoom_out();
        }
        if input.was_pressed(InputAction::ResetView) {
            self.reset_view();
        }

        if input.zoom_delta_steps() != 0 {
            let anchor = input.cursor_position_px().unwrap_or_else(|| {
                let (width, height) = input.window_size();
                Vec2 {
                    x: width as f32 * 0.5,
                    y: height as f32 * 0.5,
                }
            });
            self.zoom_steps_around(input.zoom_delta_steps(), anchor);
        }
        let drag = input.drag_delta_px();
        if drag != Vec2::default() {
            self.pan_by(drag.x, drag.y);
        }
        if let Some(pointer) = input.click_px() {
            let outcome = self.click_at(pointer);
            if outcome != SeatAction::Miss {
                response.seat_actions.push(outcome);
            }
        }

        response
    }

    fn toggle_seat(&mut self, index: usize) -> SeatAction {
        let Some(layout) = self.layout.as_ref() else {
            return SeatAction::Miss;
        };
        let Some(record) = layout.dataset.record(index) else {
            return SeatAction::Miss;
        };
        let seat_id = record.id.clone();

        if !is_actionable(record, &self.selection) {
            debug!(seat_id = %seat_id, status = record.status.as_str(), "seat_not_actionable");
            return SeatAction::NotActionable { seat_id };
        }
        if self.selection.deselect_seat(&seat_id) {
            return SeatAction::Deselected { seat_id };
        }

        let Some((section, row, seat)) = layout.dataset.resolve(&layout.venue, index) else {
            return SeatAction::Miss;
        };
        if self.selection.select_seat(seat, section, row) {
            SeatAction::Selected { seat_id }
        } else {
            SeatAction::Blocked { seat_id }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{
        generate_stadium_venue, CanvasExtent, OriginOffset, Row, Seat, SeatStatus, Section,
    };

    fn seat(id: &str, column: u32, x: f32, y: f32, status: SeatStatus) -> Seat {
        Seat {
            id: id.to_string(),
            column,
            x,
            y,
            tier: 2,
            status,
        }
    }

    fn small_venue(id: &str) -> Venue {
        Venue {
            id: id.to_string(),
            label: "Small".to_string(),
            canvas_extent: CanvasExtent {
                width: 400,
                height: 300,
            },
            sections: vec![Section {
                id: "A".to_string(),
                label: "Orchestra".to_string(),
                origin_offset: OriginOffset {
                    x: 100.0,
                    y: 100.0,
                    scale: 1.0,
                },
                rows: vec![
                    Row {
                        index: 1,
                        entities: vec![
                            seat("A1", 1, 0.0, 0.0, SeatStatus::Available),
                            seat("A2", 2, 20.0, 0.0, SeatStatus::Available),
                            seat("A3", 3, 40.0, 0.0, SeatStatus::Sold),
                        ],
                    },
                    Row {
                        index: 2,
                        entities: vec![
                            seat("B1", 1, 0.0, 20.0, SeatStatus::Available),
                            seat("B2", 2, 20.0, 20.0, SeatStatus::Available),
                            seat("B3", 3, 40.0, 20.0, SeatStatus::Available),
                        ],
                    },
                ],
            }],
        }
    }

    fn session() -> SeatMapSession {
        let mut session =
            SeatMapSession::new(SessionConfig::default(), Arc::new(TierTable::default()));
        session.load_venue(small_venue("hall")).expect("load");
        session
    }

    const VIEW: Viewport = Viewport {
        width: 400,
        height: 300,
    };

    #[test]
    fn click_toggles_selection_and_ignores_sold_seats() {
        let mut session = session();
        assert_eq!(
            session.click_at(Vec2 { x: 100.0, y: 100.0 }),
            SeatAction::Selected {
                seat_id: "A1".to_string()
            }
        );
        assert_eq!(session.selection().total_price(), 100.0);
        assert_eq!(
            session.click_at(Vec2 { x: 102.0, y: 98.0 }),
            SeatAction::Deselected {
                seat_id: "A1".to_string()
            }
        );
        assert_eq!(
            session.click_at(Vec2 { x: 140.0, y: 100.0 }),
            SeatAction::NotActionable {
                seat_id: "A3".to_string()
            }
        );
        assert_eq!(session.click_at(Vec2 { x: 5.0, y: 5.0 }), SeatAction::Miss);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn click_respects_camera_transform() {
        let mut session = session();
        session.set_zoom(2.0);
        session.pan_by(-100.0, -50.0);
        // A2 world (120, 100) -> surface (140, 150)
        assert_eq!(
            session.click_at(Vec2 { x: 140.0, y: 150.0 }),
            SeatAction::Selected {
                seat_id: "A2".to_string()
            }
        );
    }

    #[test]
    fn click_past_capacity_is_blocked() {
        let mut session = SeatMapSession::new(
            SessionConfig {
                max_selectable: 1,
                ..SessionConfig::default()
            },
            Arc::new(TierTable::default()),
        );
        session.load_venue(small_venue("hall")).expect("load");
        session.click_at(Vec2 { x: 100.0, y: 100.0 });
        assert_eq!(
            session.click_at(Vec2 { x: 120.0, y: 100.0 }),
            SeatAction::Blocked {
                seat_id: "A2".to_string()
            }
        );
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn keyboard_focus_moves_and_activates() {
        let mut session = session();
        assert!(session.move_focus(FocusDirection::Right));
        assert_eq!(session.focused(), Some("A1"));
        assert!(session.move_focus(FocusDirection::Down));
        assert_eq!(session.focused(), Some("B1"));
        assert!(!session.move_focus(FocusDirection::Left));
        assert_eq!(session.focused(), Some("B1"));

        assert_eq!(
            session.activate_focus(),
            SeatAction::Selected {
                seat_id: "B1".to_string()
            }
        );
        assert_eq!(
            session.activate_focus(),
            SeatAction::Deselected {
                seat_id: "B1".to_string()
            }
        );
        session.clear_focus();
        assert_eq!(session.activate_focus(), SeatAction::Miss);
    }

    #[test]
    fn select_adjacent_replaces_selection_with_run() {
        let mut session = session();
        session.click_at(Vec2 { x: 100.0, y: 100.0 });

        assert_eq!(session.select_adjacent(3), 3);
        let ids = session
            .selection()
            .entries()
            .iter()
            .map(|entry| entry.seat.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["B1", "B2", "B3"]);

        assert_eq!(session.select_adjacent(4), 0);
        assert_eq!(session.selection().len(), 3);
    }

    #[test]
    fn select_adjacent_over_capacity_keeps_existing_selection() {
        let mut session = SeatMapSession::new(
            SessionConfig {
                max_selectable: 2,
                ..SessionConfig::default()
            },
            Arc::new(TierTable::default()),
        );
        session.load_venue(small_venue("hall")).expect("load");
        session.click_at(Vec2 { x: 100.0, y: 100.0 });

        assert_eq!(session.select_adjacent(3), 0);
        let ids = session
            .selection()
            .entries()
            .iter()
            .map(|entry| entry.seat.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["A1"]);

        assert_eq!(session.select_adjacent(2), 2);
        assert_eq!(session.selection().len(), 2);
    }

    #[test]
    fn loading_a_different_venue_clears_selection_and_focus() {
        let mut session = session();
        session.click_at(Vec2 { x: 100.0, y: 100.0 });
        session.move_focus(FocusDirection::Right);

        let report = session.load_venue(small_venue("other")).expect("load");
        assert!(report.venue_changed);
        assert_eq!(report.dropped, 1);
        assert!(session.selection().is_empty());
        assert_eq!(session.focused(), None);
    }

    #[test]
    fn reloading_same_venue_prunes_missing_seats_and_keeps_prices() {
        let mut session = session();
        session.click_at(Vec2 { x: 100.0, y: 100.0 });
        session.click_at(Vec2 { x: 100.0, y: 120.0 });
        session.set_tiers(Arc::new(TierTable::from_tiers([])));

        let mut updated = small_venue("hall");
        updated.sections[0].rows[1].entities.remove(0);
        let report = session.load_venue(updated).expect("load");

        assert!(!report.venue_changed);
        assert_eq!(report.kept, 1);
        assert_eq!(report.dropped, 1);
        let kept = &session.selection().entries()[0];
        assert_eq!(kept.seat.id, "A1");
        assert_eq!(kept.price, 100.0);
    }

    #[test]
    fn invalid_venue_leaves_previous_layout_in_place() {
        let mut session = session();
        session.click_at(Vec2 { x: 100.0, y: 100.0 });

        let mut broken = small_venue("broken");
        broken.sections[0].rows[1].entities[0].id = "A1".to_string();
        assert!(matches!(
            session.load_venue(broken),
            Err(LayoutError::DuplicateSeatId { .. })
        ));
        assert_eq!(session.venue().map(|venue| venue.id.as_str()), Some("hall"));
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn plan_frame_reflects_heat_map_and_strategy() {
        let mut session = session();
        assert_eq!(session.strategy_name(), Some("direct"));
        let plain = session.plan_frame(VIEW);
        assert!(session.toggle_heat_map());
        let heat = session.plan_frame(VIEW);
        assert_ne!(plain.batches[0].color, heat.batches[0].color);

        session.load_venue(generate_stadium_venue(5)).expect("stadium");
        assert_eq!(session.strategy_name(), Some("culled_batched"));
        let plan = session.plan_frame(VIEW);
        assert!(plan.stats.visible_seats < plan.stats.total_seats);
    }

    #[test]
    fn empty_session_plans_background_only() {
        let session = SeatMapSession::new(SessionConfig::default(), Arc::new(TierTable::default()));
        let plan = session.plan_frame(VIEW);
        assert!(plan.batches.is_empty());
        assert!(plan.focus_outline.is_none());
    }

    #[test]
    fn summary_handle_sees_session_mutations() {
        let mut session = session();
        let summary = session.summary_handle();
        session.click_at(Vec2 { x: 120.0, y: 100.0 });
        assert_eq!(summary.summary().seat_ids, vec!["A2".to_string()]);
        session.clear_selection();
        assert_eq!(summary.summary().count, 0);
    }

    #[test]
    fn input_frame_drives_focus_selection_and_quit() {
        use crate::app::input::InputCollector;
        use winit::keyboard::{KeyCode, PhysicalKey};

        let mut session = session();
        let mut input = InputCollector::new(400, 300);
        input.handle_physical_key(PhysicalKey::Code(KeyCode::ArrowRight), true, false);
        input.handle_physical_key(PhysicalKey::Code(KeyCode::Enter), true, false);
        let response = session.apply_input(&input.snapshot_for_frame());

        assert!(!response.quit_requested);
        assert_eq!(
            response.seat_actions,
            vec![SeatAction::Selected {
                seat_id: "A1".to_string()
            }]
        );

        input.handle_physical_key(PhysicalKey::Code(KeyCode::Escape), true, false);
        let response = session.apply_input(&input.snapshot_for_frame());
        assert!(!response.quit_requested);
        assert_eq!(session.focused(), None);

        input.handle_physical_key(PhysicalKey::Code(KeyCode::Escape), false, false);
        input.handle_physical_key(PhysicalKey::Code(KeyCode::Escape), true, false);
        assert!(session.apply_input(&input.snapshot_for_frame()).quit_requested);
    }

    #[test]
    fn input_frame_pans_zooms_and_clicks() {
        use crate::app::input::InputCollector;
        use winit::event::{ElementState, MouseButton, MouseScrollDelta};

        let mut session = session();
        let mut input = InputCollector::new(400, 300);
        input.set_cursor_position_px(10.0, 10.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.set_cursor_position_px(30.0, 10.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Released);
        session.apply_input(&input.snapshot_for_frame());
        assert_eq!(session.camera().pan, Vec2 { x: 20.0, y: 0.0 });
        assert!(session.selection().is_empty());

        input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 2.0));
        session.apply_input(&input.snapshot_for_frame());
        assert!((session.camera().zoom - 1.2).abs() < 0.0001);

        // A1 world (100, 100) under the new transform
        let target = session.camera().world_to_surface(Vec2 { x: 100.0, y: 100.0 });
        input.set_cursor_position_px(target.x, target.y);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.handle_mouse_input(MouseButton::Left, ElementState::Released);
        let response = session.apply_input(&input.snapshot_for_frame());
        assert_eq!(
            response.seat_actions,
            vec![SeatAction::Selected {
                seat_id: "A1".to_string()
            }]
        );
    }

    #[test]
    fn snapshot_renders_current_view() {
        let session = session();
        let image = session.snapshot(VIEW).expect("snapshot");
        assert_eq!(image.dimensions(), (400, 300));
    }
}
