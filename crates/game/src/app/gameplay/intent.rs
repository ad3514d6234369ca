use engine::{InputAction, InputSnapshot};

/// Movement intent for one tick, each axis in `{-1, 0, 1}`.
///
/// Screen coordinates: negative `axis_y` is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InputIntent {
    pub(crate) axis_x: i8,
    pub(crate) axis_y: i8,
}

impl InputIntent {
    pub(crate) fn new(axis_x: i8, axis_y: i8) -> Self {
        Self {
            axis_x: axis_x.clamp(-1, 1),
            axis_y: axis_y.clamp(-1, 1),
        }
    }

    /// Keys and touch drag feed the same axes; either source activates a
    /// direction, and opposite directions on one axis cancel.
    pub(crate) fn from_snapshot(input: &InputSnapshot) -> Self {
        let (touch_x, touch_y) = input.touch_direction();
        let up = input.is_down(InputAction::MoveUp) || touch_y == -1;
        let down = input.is_down(InputAction::MoveDown) || touch_y == 1;
        let left = input.is_down(InputAction::MoveLeft) || touch_x == -1;
        let right = input.is_down(InputAction::MoveRight) || touch_x == 1;

        Self::new(
            i8::from(right) - i8::from(left),
            i8::from(down) - i8::from(up),
        )
    }

    pub(crate) fn is_diagonal(self) -> bool {
        self.axis_x != 0 && self.axis_y != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_from_actions(actions: &[InputAction]) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty();
        for action in actions {
            snapshot = snapshot.with_action_down(*action, true);
        }
        snapshot
    }

    #[test]
    fn no_input_is_no_intent() {
        assert_eq!(
            InputIntent::from_snapshot(&InputSnapshot::empty()),
            InputIntent::default()
        );
    }

    #[test]
    fn keys_map_to_screen_axes() {
        let snapshot = snapshot_from_actions(&[InputAction::MoveUp, InputAction::MoveRight]);
        let intent = InputIntent::from_snapshot(&snapshot);
        assert_eq!(intent, InputIntent::new(1, -1));
        assert!(intent.is_diagonal());
    }

    #[test]
    fn touch_direction_drives_axes_like_keys() {
        let snapshot = InputSnapshot::empty().with_touch_direction((-1, 1));
        assert_eq!(InputIntent::from_snapshot(&snapshot), InputIntent::new(-1, 1));
    }

    #[test]
    fn key_and_touch_on_same_direction_do_not_stack() {
        let snapshot =
            snapshot_from_actions(&[InputAction::MoveLeft]).with_touch_direction((-1, 0));
        assert_eq!(InputIntent::from_snapshot(&snapshot), InputIntent::new(-1, 0));
    }

    #[test]
    fn opposite_directions_cancel() {
        let snapshot = snapshot_from_actions(&[InputAction::MoveLeft, InputAction::MoveRight]);
        assert_eq!(InputIntent::from_snapshot(&snapshot).axis_x, 0);

        let snapshot =
            snapshot_from_actions(&[InputAction::MoveDown]).with_touch_direction((0, -1));
        assert_eq!(InputIntent::from_snapshot(&snapshot).axis_y, 0);
    }
}
