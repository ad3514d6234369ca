pub const DEFAULT_TOUCH_DEAD_ZONE_PX: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

const ACTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
        }
    }
}

/// Tracks a single-finger drag relative to where the finger first landed.
///
/// The drag is collapsed to a per-axis direction in `{-1, 0, 1}`; offsets whose
/// magnitude does not exceed the dead zone read as zero. A touch that lifts
/// without ever leaving the dead zone is reported as a tap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TouchDrag {
    dead_zone_px: f32,
    finger: Option<u64>,
    start_px: Vec2Px,
    direction: (i8, i8),
    left_dead_zone: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Vec2Px {
    x: f32,
    y: f32,
}

impl Default for TouchDrag {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCH_DEAD_ZONE_PX)
    }
}

impl TouchDrag {
    pub(crate) fn new(dead_zone_px: f32) -> Self {
        Self {
            dead_zone_px: dead_zone_px.max(0.0),
            finger: None,
            start_px: Vec2Px::default(),
            direction: (0, 0),
            left_dead_zone: false,
        }
    }

    pub(crate) fn begin(&mut self, finger: u64, x: f32, y: f32) {
        if self.finger.is_some() {
            return;
        }
        self.finger = Some(finger);
        self.start_px = Vec2Px { x, y };
        self.direction = (0, 0);
        self.left_dead_zone = false;
    }

    pub(crate) fn update(&mut self, finger: u64, x: f32, y: f32) {
        if self.finger != Some(finger) {
            return;
        }
        let dx = x - self.start_px.x;
        let dy = y - self.start_px.y;
        self.direction = (
            axis_direction(dx, self.dead_zone_px),
            axis_direction(dy, self.dead_zone_px),
        );
        if self.direction != (0, 0) {
            self.left_dead_zone = true;
        }
    }

    /// Returns `true` when the finished touch was a tap.
    pub(crate) fn end(&mut self, finger: u64) -> bool {
        if self.finger != Some(finger) {
            return false;
        }
        let was_tap = !self.left_dead_zone;
        self.finger = None;
        self.direction = (0, 0);
        self.left_dead_zone = false;
        was_tap
    }

    pub(crate) fn cancel(&mut self, finger: u64) {
        if self.finger == Some(finger) {
            self.finger = None;
            self.direction = (0, 0);
            self.left_dead_zone = false;
        }
    }

    pub(crate) fn direction(&self) -> (i8, i8) {
        self.direction
    }
}

fn axis_direction(offset: f32, dead_zone: f32) -> i8 {
    if offset.abs() > dead_zone {
        if offset > 0.0 {
            1
        } else {
            -1
        }
    } else {
        0
    }
}

/// Input state as seen by one simulation tick.
///
/// Held keys are level-triggered; `advance_pressed` is an edge that is true for
/// exactly one tick per press.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    advance_pressed: bool,
    action_states: ActionStates,
    touch_direction: (i8, i8),
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        advance_pressed: bool,
        action_states: ActionStates,
        touch_direction: (i8, i8),
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            advance_pressed,
            action_states,
            touch_direction,
            window_width,
            window_height,
        }
    }

    pub fn advance_pressed(&self) -> bool {
        self.advance_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.action_states.is_down(action)
    }

    /// Drag direction per axis, each in `{-1, 0, 1}`. Positive y points down.
    pub fn touch_direction(&self) -> (i8, i8) {
        self.touch_direction
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.action_states.set(action, is_down);
        self
    }

    pub fn with_advance_pressed(mut self, advance_pressed: bool) -> Self {
        self.advance_pressed = advance_pressed;
        self
    }

    pub fn with_touch_direction(mut self, touch_direction: (i8, i8)) -> Self {
        self.touch_direction = (
            touch_direction.0.clamp(-1, 1),
            touch_direction.1.clamp(-1, 1),
        );
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }
}
