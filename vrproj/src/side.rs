use serde::{Deserialize, Serialize};

/// Which hand a device or input belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first. Lookups that return "the first pressed side" use this order.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PressState {
    Pressed,
    #[default]
    Released,
}

/// Thumbstick click state for both hands.
///
/// Storage is a fixed slot per side, so there is always exactly one entry for each.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThumbstickPressState {
    states: [PressState; 2],
}

impl ThumbstickPressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> PressState {
        self.states[side.index()]
    }

    pub fn set(&mut self, side: Side, state: PressState) {
        self.states[side.index()] = state;
    }

    pub fn release_all(&mut self) {
        self.states = [PressState::Released; 2];
    }

    /// First side (left before right) currently pressed
    pub fn pressed_side(&self) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.get(*side) == PressState::Pressed)
    }

    /// True when no side reports Released.
    ///
    /// With a two-state `PressState` this is the same as "every side pressed".
    /// A third neutral state would make the two diverge.
    pub fn all_pressed(&self) -> bool {
        !self.states.contains(&PressState::Released)
    }
}
