use std::{rc::Rc, time::Duration};

use engine::input_log;

use crate::{
    climbing::HandController,
    config::Config,
    error::VrResult,
    host::{HapticPlayer, LocomotionServices, OverlapEvent, Rig},
    input::{AxisAction, ButtonEvent, InputAction, InputBindings},
    side::Side,
    teleport::{LocomotionAction, LocomotionController},
};

/// The VR player: tracked rig, teleport locomotion and both climbing hands.
///
/// The host forwards its frame tick, named input events and per-hand overlap
/// notifications here; everything else is reached through the injected
/// capabilities.
pub struct VrCharacter {
    rig: Rig,
    locomotion: LocomotionController,
    left_hand: HandController,
    right_hand: HandController,
    bindings: InputBindings,
}

impl VrCharacter {
    pub fn new(
        config: &Config,
        rig: Rig,
        services: LocomotionServices,
        haptics: Option<Rc<dyn HapticPlayer>>,
    ) -> VrResult<Self> {
        config.validate()?;
        let bindings = InputBindings::from_config(&config.bindings)?;
        let locomotion = LocomotionController::new(config.locomotion.clone(), services)?;

        Ok(VrCharacter {
            rig,
            locomotion,
            left_hand: HandController::new(Side::Left, &config.climbing, haptics.clone()),
            right_hand: HandController::new(Side::Right, &config.climbing, haptics),
            bindings,
        })
    }

    /// Returns the locomotion action taken, or `None` while a teleport is fading out
    pub fn tick(&mut self, dt: Duration) -> Option<LocomotionAction> {
        let action = self.locomotion.tick(dt, &mut self.rig);

        for side in Side::ALL {
            let (hand, body) = self.rig.hand_and_body(side);
            match side {
                Side::Left => self.left_hand.tick(hand, body),
                Side::Right => self.right_hand.tick(hand, body),
            }
        }

        action
    }

    /// Dispatch a named button event. Returns false for unbound names.
    pub fn handle_action(&mut self, name: &str, event: ButtonEvent) -> bool {
        let Some(action) = self.bindings.action(name) else {
            input_log!(debug, name, ?event, "unbound action");
            return false;
        };

        match (action, event) {
            (InputAction::Thumbstick(side), event) => {
                if !self.locomotion.on_thumbstick(side, event.into()) {
                    input_log!(trace, ?side, ?event, "thumbstick ignored while teleporting");
                }
            }
            (InputAction::Grip(side), ButtonEvent::Pressed) => self.grip(side),
            (InputAction::Grip(side), ButtonEvent::Released) => self.release(side),
        }
        true
    }

    /// Dispatch a named throttle axis. Returns false for unbound names.
    pub fn handle_axis(&mut self, name: &str, value: f32) -> bool {
        let Some(axis) = self.bindings.axis(name) else {
            input_log!(debug, name, "unbound axis");
            return false;
        };

        match axis {
            AxisAction::MoveForward => self.locomotion.move_forward(value, &mut self.rig),
            AxisAction::TurnRight => self.locomotion.turn_right(value, &mut self.rig),
            AxisAction::StrafeRight => self.locomotion.strafe_right(value, &mut self.rig),
        }
        true
    }

    pub fn grip(&mut self, side: Side) {
        let hand = self.rig.hand(side);
        match side {
            Side::Left => self.left_hand.grip(hand),
            Side::Right => self.right_hand.grip(hand),
        }
    }

    pub fn release(&mut self, side: Side) {
        self.hand_mut(side).release();
    }

    /// Overlap begin/end reported by the host for one hand
    pub fn handle_overlap(&mut self, side: Side, event: &OverlapEvent) {
        let hand = self.rig.hand(side);
        match side {
            Side::Left => self.left_hand.handle_overlap(hand, event),
            Side::Right => self.right_hand.handle_overlap(hand, event),
        }
    }

    pub fn hand(&self, side: Side) -> &HandController {
        match side {
            Side::Left => &self.left_hand,
            Side::Right => &self.right_hand,
        }
    }

    fn hand_mut(&mut self, side: Side) -> &mut HandController {
        match side {
            Side::Left => &mut self.left_hand,
            Side::Right => &mut self.right_hand,
        }
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }
}
