use std::collections::HashMap;

use crate::{
    config::BindingConfig,
    error::{VrError, VrResult},
    side::{PressState, Side},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

impl From<ButtonEvent> for PressState {
    fn from(event: ButtonEvent) -> Self {
        match event {
            ButtonEvent::Pressed => PressState::Pressed,
            ButtonEvent::Released => PressState::Released,
        }
    }
}

/// Discrete, per-hand input actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Thumbstick(Side),
    Grip(Side),
}

/// Continuous throttle axes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisAction {
    MoveForward,
    TurnRight,
    StrafeRight,
}

/// Runtime table from host action/axis names to what they drive.
///
/// One entry per (name) carries the side, so a single handler serves both hands.
#[derive(Clone, Debug, Default)]
pub struct InputBindings {
    actions: HashMap<String, InputAction>,
    axes: HashMap<String, AxisAction>,
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &BindingConfig) -> VrResult<Self> {
        let mut bindings = Self::new();
        bindings.bind_action(&config.left_thumbstick, InputAction::Thumbstick(Side::Left))?;
        bindings.bind_action(&config.right_thumbstick, InputAction::Thumbstick(Side::Right))?;
        bindings.bind_action(&config.left_grip, InputAction::Grip(Side::Left))?;
        bindings.bind_action(&config.right_grip, InputAction::Grip(Side::Right))?;
        bindings.bind_axis(&config.move_forward, AxisAction::MoveForward)?;
        bindings.bind_axis(&config.turn_right, AxisAction::TurnRight)?;
        bindings.bind_axis(&config.strafe_right, AxisAction::StrafeRight)?;
        Ok(bindings)
    }

    pub fn bind_action(&mut self, name: &str, action: InputAction) -> VrResult<()> {
        self.check_name(name)?;
        self.actions.insert(name.to_string(), action);
        Ok(())
    }

    pub fn bind_axis(&mut self, name: &str, axis: AxisAction) -> VrResult<()> {
        self.check_name(name)?;
        self.axes.insert(name.to_string(), axis);
        Ok(())
    }

    fn check_name(&self, name: &str) -> VrResult<()> {
        if name.trim().is_empty() {
            return Err(VrError::Binding {
                name: name.to_string(),
                reason: "name must not be empty".to_string(),
            });
        }
        if self.actions.contains_key(name) || self.axes.contains_key(name) {
            return Err(VrError::Binding {
                name: name.to_string(),
                reason: "name is already bound".to_string(),
            });
        }
        Ok(())
    }

    pub fn action(&self, name: &str) -> Option<InputAction> {
        self.actions.get(name).copied()
    }

    pub fn axis(&self, name: &str) -> Option<AxisAction> {
        self.axes.get(name).copied()
    }
}
