use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::Vec2;

/// Pointer travel, in surface pixels, past which a press becomes a drag
/// instead of a click.
pub const DRAG_THRESHOLD_PX: f32 = 4.0;
pub const MAX_ADJACENT_SHORTCUT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    FocusUp,
    FocusDown,
    FocusLeft,
    FocusRight,
    Activate,
    Cancel,
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleHeatMap,
    ClearSelection,
}

const ACTION_COUNT: usize = 11;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::FocusUp,
        InputAction::FocusDown,
        InputAction::FocusLeft,
        InputAction::FocusRight,
        InputAction::Activate,
        InputAction::Cancel,
        InputAction::ZoomIn,
        InputAction::ZoomOut,
        InputAction::ResetView,
        InputAction::ToggleHeatMap,
        InputAction::ClearSelection,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::FocusUp => 0,
            InputAction::FocusDown => 1,
            InputAction::FocusLeft => 2,
            InputAction::FocusRight => 3,
            InputAction::Activate => 4,
            InputAction::Cancel => 5,
            InputAction::ZoomIn => 6,
            InputAction::ZoomOut => 7,
            InputAction::ResetView => 8,
            InputAction::ToggleHeatMap => 9,
            InputAction::ClearSelection => 10,
        }
    }

    fn from_key(key: PhysicalKey) -> Option<Self> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        let action = match code {
            KeyCode::ArrowUp => InputAction::FocusUp,
            KeyCode::ArrowDown => InputAction::FocusDown,
            KeyCode::ArrowLeft => InputAction::FocusLeft,
            KeyCode::ArrowRight => InputAction::FocusRight,
            KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => InputAction::Activate,
            KeyCode::Escape => InputAction::Cancel,
            KeyCode::Equal | KeyCode::NumpadAdd => InputAction::ZoomIn,
            KeyCode::Minus | KeyCode::NumpadSubtract => InputAction::ZoomOut,
            KeyCode::Digit0 | KeyCode::Numpad0 => InputAction::ResetView,
            KeyCode::KeyH => InputAction::ToggleHeatMap,
            KeyCode::Delete | KeyCode::Backspace => InputAction::ClearSelection,
            _ => return None,
        };
        Some(action)
    }
}

/// Held state plus a press edge per action. Holding a key yields one edge.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed_edge: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let index = action.index();
        if is_down && !self.down[index] {
            self.pressed_edge[index] = true;
        }
        self.down[index] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed_edge[action.index()]
    }

    fn clear_edges(&mut self) {
        self.pressed_edge = [false; ACTION_COUNT];
    }
}

/// Everything the session needs from one frame of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    click_px: Option<Vec2>,
    drag_delta_px: Vec2,
    zoom_delta_steps: i32,
    adjacent_request: Option<usize>,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    /// Release position of a press that never turned into a drag.
    pub fn click_px(&self) -> Option<Vec2> {
        self.click_px
    }

    pub fn drag_delta_px(&self) -> Vec2 {
        self.drag_delta_px
    }

    pub fn zoom_delta_steps(&self) -> i32 {
        self.zoom_delta_steps
    }

    /// Seat count requested through the digit shortcuts.
    pub fn adjacent_request(&self) -> Option<usize> {
        self.adjacent_request
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn is_idle(&self) -> bool {
        self.click_px.is_none()
            && self.drag_delta_px == Vec2::default()
            && self.zoom_delta_steps == 0
            && self.adjacent_request.is_none()
            && InputAction::ALL
                .iter()
                .all(|action| !self.actions.was_pressed(*action))
    }
}

#[derive(Debug, Clone, Copy)]
struct PointerPress {
    origin_px: Vec2,
    last_px: Vec2,
    dragging: bool,
}

/// Folds winit events into [`InputSnapshot`]s, one per frame.
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    press: Option<PointerPress>,
    click_px: Option<Vec2>,
    drag_delta_px: Vec2,
    pending_zoom_steps: i32,
    adjacent_request: Option<usize>,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    pub(crate) fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    pub(crate) fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.handle_physical_key(key_event.physical_key, is_pressed, key_event.repeat);
    }

    pub(crate) fn handle_physical_key(&mut self, key: PhysicalKey, is_pressed: bool, repeat: bool) {
        if let Some(action) = InputAction::from_key(key) {
            self.actions.set(action, is_pressed);
            return;
        }
        if is_pressed && !repeat {
            if let Some(count) = adjacent_count_for_key(key) {
                self.adjacent_request = Some(count);
            }
        }
    }

    pub(crate) fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    pub(crate) fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        let position = Vec2 { x, y };
        self.cursor_position_px = Some(position);

        let Some(press) = self.press.as_mut() else {
            return;
        };
        if !press.dragging {
            let dx = position.x - press.origin_px.x;
            let dy = position.y - press.origin_px.y;
            press.dragging = dx * dx + dy * dy > DRAG_THRESHOLD_PX * DRAG_THRESHOLD_PX;
        }
        if press.dragging {
            self.drag_delta_px.x += position.x - press.last_px.x;
            self.drag_delta_px.y += position.y - press.last_px.y;
            press.last_px = position;
        }
    }

    pub(crate) fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
        self.press = None;
    }

    pub(crate) fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let steps = zoom_steps_from_scroll_delta(delta);
        self.pending_zoom_steps = self.pending_zoom_steps.saturating_add(steps);
    }

    pub(crate) fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                if self.press.is_none() {
                    if let Some(position) = self.cursor_position_px {
                        self.press = Some(PointerPress {
                            origin_px: position,
                            last_px: position,
                            dragging: false,
                        });
                    }
                }
            }
            ElementState::Released => {
                if let Some(press) = self.press.take() {
                    if !press.dragging {
                        self.click_px = self.cursor_position_px.or(Some(press.origin_px));
                    }
                }
            }
        }
    }

    pub(crate) fn snapshot_for_frame(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            actions: self.actions,
            cursor_position_px: self.cursor_position_px,
            click_px: self.click_px,
            drag_delta_px: self.drag_delta_px,
            zoom_delta_steps: self.pending_zoom_steps,
            adjacent_request: self.adjacent_request,
            window_width: self.window_width,
            window_height: self.window_height,
        };
        self.actions.clear_edges();
        self.click_px = None;
        self.drag_delta_px = Vec2::default();
        self.pending_zoom_steps = 0;
        self.adjacent_request = None;
        snapshot
    }
}

fn adjacent_count_for_key(key: PhysicalKey) -> Option<usize> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let count = match code {
        KeyCode::Digit1 | KeyCode::Numpad1 => 1,
        KeyCode::Digit2 | KeyCode::Numpad2 => 2,
        KeyCode::Digit3 | KeyCode::Numpad3 => 3,
        KeyCode::Digit4 | KeyCode::Numpad4 => 4,
        KeyCode::Digit5 | KeyCode::Numpad5 => 5,
        KeyCode::Digit6 | KeyCode::Numpad6 => 6,
        KeyCode::Digit7 | KeyCode::Numpad7 => 7,
        KeyCode::Digit8 | KeyCode::Numpad8 => 8,
        _ => return None,
    };
    Some(count.min(MAX_ADJACENT_SHORTCUT))
}

pub(crate) fn zoom_steps_from_scroll_delta(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
        MouseScrollDelta::PixelDelta(position) => {
            if position.y > 0.0 {
                1
            } else if position.y < 0.0 {
                -1
            } else {
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn key_press_is_edge_triggered_for_single_frame() {
        let mut input = InputCollector::new(800, 600);
        input.handle_physical_key(key(KeyCode::ArrowRight), true, false);

        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert!(first.was_pressed(InputAction::FocusRight));
        assert!(!second.was_pressed(InputAction::FocusRight));
        assert!(second.is_down(InputAction::FocusRight));
    }

    #[test]
    fn held_key_does_not_spam_press_edges() {
        let mut input = InputCollector::default();

        input.handle_physical_key(key(KeyCode::KeyH), true, false);
        let first = input.snapshot_for_frame();
        input.handle_physical_key(key(KeyCode::KeyH), true, true);
        let second = input.snapshot_for_frame();
        input.handle_physical_key(key(KeyCode::KeyH), false, false);
        input.handle_physical_key(key(KeyCode::KeyH), true, false);
        let third = input.snapshot_for_frame();

        assert!(first.was_pressed(InputAction::ToggleHeatMap));
        assert!(!second.was_pressed(InputAction::ToggleHeatMap));
        assert!(third.was_pressed(InputAction::ToggleHeatMap));
    }

    #[test]
    fn keys_map_to_seat_map_actions() {
        let mut input = InputCollector::default();
        for code in [
            KeyCode::Enter,
            KeyCode::Escape,
            KeyCode::Equal,
            KeyCode::Minus,
            KeyCode::Digit0,
            KeyCode::Delete,
        ] {
            input.handle_physical_key(key(code), true, false);
        }
        let snapshot = input.snapshot_for_frame();
        assert!(snapshot.was_pressed(InputAction::Activate));
        assert!(snapshot.was_pressed(InputAction::Cancel));
        assert!(snapshot.was_pressed(InputAction::ZoomIn));
        assert!(snapshot.was_pressed(InputAction::ZoomOut));
        assert!(snapshot.was_pressed(InputAction::ResetView));
        assert!(snapshot.was_pressed(InputAction::ClearSelection));
        assert!(!snapshot.was_pressed(InputAction::FocusUp));
    }

    #[test]
    fn digit_keys_request_adjacent_runs_once() {
        let mut input = InputCollector::default();
        input.handle_physical_key(key(KeyCode::Digit4), true, false);
        input.handle_physical_key(key(KeyCode::Digit4), true, true);
        assert_eq!(input.snapshot_for_frame().adjacent_request(), Some(4));
        assert_eq!(input.snapshot_for_frame().adjacent_request(), None);

        input.handle_physical_key(key(KeyCode::Digit9), true, false);
        assert_eq!(input.snapshot_for_frame().adjacent_request(), None);
    }

    #[test]
    fn short_press_and_release_is_a_click() {
        let mut input = InputCollector::new(800, 600);
        input.set_cursor_position_px(100.0, 200.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.set_cursor_position_px(102.0, 201.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Released);

        let first = input.snapshot_for_frame();
        assert_eq!(first.click_px(), Some(Vec2 { x: 102.0, y: 201.0 }));
        assert_eq!(first.drag_delta_px(), Vec2::default());
        assert_eq!(input.snapshot_for_frame().click_px(), None);
    }

    #[test]
    fn drag_past_threshold_pans_instead_of_clicking() {
        let mut input = InputCollector::new(800, 600);
        input.set_cursor_position_px(100.0, 100.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.set_cursor_position_px(110.0, 100.0);
        input.set_cursor_position_px(130.0, 90.0);

        let moving = input.snapshot_for_frame();
        assert_eq!(moving.drag_delta_px(), Vec2 { x: 30.0, y: -10.0 });

        input.set_cursor_position_px(135.0, 90.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Released);
        let released = input.snapshot_for_frame();
        assert_eq!(released.click_px(), None);
        assert_eq!(released.drag_delta_px(), Vec2 { x: 5.0, y: 0.0 });
    }

    #[test]
    fn press_without_known_cursor_is_ignored() {
        let mut input = InputCollector::new(800, 600);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.handle_mouse_input(MouseButton::Left, ElementState::Released);
        assert_eq!(input.snapshot_for_frame().click_px(), None);
    }

    #[test]
    fn mouse_wheel_adds_zoom_steps_and_snapshot_resets_pending() {
        let mut input = InputCollector::new(1280, 720);
        input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, -2.0));

        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert_eq!(first.zoom_delta_steps(), -1);
        assert_eq!(second.zoom_delta_steps(), 0);
        assert!(second.is_idle());
    }

    #[test]
    fn pixel_wheel_delta_maps_to_single_discrete_step_direction() {
        let positive = zoom_steps_from_scroll_delta(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(0.0, 3.0),
        ));
        let negative = zoom_steps_from_scroll_delta(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(0.0, -5.0),
        ));
        let none = zoom_steps_from_scroll_delta(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(0.0, 0.0),
        ));

        assert_eq!(positive, 1);
        assert_eq!(negative, -1);
        assert_eq!(none, 0);
    }

    #[test]
    fn snapshot_carries_cursor_and_window_size() {
        let mut input = InputCollector::new(1280, 720);
        input.set_cursor_position_px(100.0, 200.0);
        let snapshot = input.snapshot_for_frame();

        assert_eq!(snapshot.window_size(), (1280, 720));
        let cursor = snapshot.cursor_position_px().expect("cursor");
        assert!((cursor.x - 100.0).abs() < 0.0001);
        assert!((cursor.y - 200.0).abs() < 0.0001);
    }
}
