use cgmath::{Vector3, Zero};

use crate::side::{Side, ThumbstickPressState};

/// Pending teleport destination. The zero vector means "unset".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportTarget(Vector3<f32>);

impl Default for TeleportTarget {
    fn default() -> Self {
        TeleportTarget(Vector3::zero())
    }
}

impl TeleportTarget {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn set(&mut self, point: Vector3<f32>) {
        self.0 = point;
    }

    pub fn clear(&mut self) {
        self.0 = Vector3::zero();
    }

    pub fn is_set(&self) -> bool {
        !self.0.is_zero()
    }

    pub fn get(&self) -> Option<Vector3<f32>> {
        self.is_set().then_some(self.0)
    }
}

/// What the locomotion controller does on a given tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocomotionAction {
    /// Clear the target and hide every visual
    Idle,
    /// Preview a teleport arc from this hand
    Trace(Side),
    /// Start the fade teleport to the pending target
    Commit,
}

/// Pick the tick's locomotion action from the thumbstick state.
///
/// This is the only gate for `Commit`: it requires every side pressed and a set
/// target. Both sides pressed without a target falls back to `Idle`.
pub fn decide_locomotion_action(
    press_state: &ThumbstickPressState,
    target: &TeleportTarget,
) -> LocomotionAction {
    if press_state.all_pressed() {
        if target.is_set() {
            LocomotionAction::Commit
        } else {
            LocomotionAction::Idle
        }
    } else {
        match press_state.pressed_side() {
            Some(side) => LocomotionAction::Trace(side),
            None => LocomotionAction::Idle,
        }
    }
}

/// Teleport lifecycle as seen from outside the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TeleportPhase {
    #[default]
    Idle,
    /// A single thumbstick is held and the arc is previewed
    Tracing,
    /// Screen fading to black, relocation pending. Input is suppressed.
    FadingOut,
    /// Body relocated, screen fading back in
    FadingIn,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::side::PressState;
    use cgmath::vec3;

    fn press(left: PressState, right: PressState) -> ThumbstickPressState {
        let mut state = ThumbstickPressState::new();
        state.set(Side::Left, left);
        state.set(Side::Right, right);
        state
    }

    fn target_at(point: Vector3<f32>) -> TeleportTarget {
        let mut target = TeleportTarget::unset();
        target.set(point);
        target
    }

    #[test]
    fn test_decision_table() {
        use PressState::*;
        let some = target_at(vec3(1.0, 0.0, 2.0));
        let none = TeleportTarget::unset();

        let cases = [
            (Released, Released, none, LocomotionAction::Idle),
            (Released, Released, some, LocomotionAction::Idle),
            (Pressed, Released, none, LocomotionAction::Trace(Side::Left)),
            (Pressed, Released, some, LocomotionAction::Trace(Side::Left)),
            (Released, Pressed, none, LocomotionAction::Trace(Side::Right)),
            (Released, Pressed, some, LocomotionAction::Trace(Side::Right)),
            (Pressed, Pressed, none, LocomotionAction::Idle),
            (Pressed, Pressed, some, LocomotionAction::Commit),
        ];

        for (left, right, target, expected) in cases {
            assert_eq!(
                decide_locomotion_action(&press(left, right), &target),
                expected,
                "left={:?} right={:?} target={:?}",
                left,
                right,
                target
            );
        }
    }

    #[test]
    fn test_zero_point_counts_as_unset() {
        let target = target_at(vec3(0.0, 0.0, 0.0));
        assert!(!target.is_set());
        assert_eq!(target.get(), None);

        let state = press(PressState::Pressed, PressState::Pressed);
        assert_eq!(decide_locomotion_action(&state, &target), LocomotionAction::Idle);
    }

    #[test]
    fn test_clear() {
        let mut target = target_at(vec3(3.0, 1.0, 0.0));
        assert_eq!(target.get(), Some(vec3(3.0, 1.0, 0.0)));
        target.clear();
        assert_eq!(target, TeleportTarget::unset());
    }
}
