use std::rc::Rc;

use cgmath::{Vector3, Zero};
use engine::climb_log;

use crate::{
    config::ClimbingConfig,
    host::{HapticEffect, HapticPlayer, MovableBody, OverlapEvent, TrackedHand},
    side::Side,
};

/// Climbing state for one motion controller.
///
/// While climbing, the body is pushed opposite to how far the hand has moved
/// from the grip point, so the hand stays pinned where it grabbed.
pub struct HandController {
    side: Side,
    climbable_tag: String,
    haptic_intensity: f32,
    can_climb_effect: Option<HapticEffect>,
    haptics: Option<Rc<dyn HapticPlayer>>,
    can_climb: bool,
    is_climbing: bool,
    climbing_anchor: Vector3<f32>,
}

impl HandController {
    /// `haptics` is the controlling player's haptic device. `None` means there is
    /// no controlling player and the climb feedback pulse is skipped.
    pub fn new(side: Side, config: &ClimbingConfig, haptics: Option<Rc<dyn HapticPlayer>>) -> Self {
        HandController {
            side,
            climbable_tag: config.climbable_tag.clone(),
            haptic_intensity: config.haptic_intensity,
            can_climb_effect: config.haptic_effect.as_deref().map(HapticEffect::new),
            haptics,
            can_climb: false,
            is_climbing: false,
            climbing_anchor: Vector3::zero(),
        }
    }

    pub fn tick(&mut self, hand: &dyn TrackedHand, body: &mut dyn MovableBody) {
        if !self.is_climbing {
            return;
        }
        let delta = hand.position() - self.climbing_anchor;
        body.add_world_offset(-delta);
    }

    /// Begin and end overlap both rescan everything the hand touches.
    ///
    /// The flag is rebuilt from scratch each time, so a missed or stale event is
    /// corrected by the next one.
    pub fn handle_overlap(&mut self, hand: &dyn TrackedHand, event: &OverlapEvent) {
        let could_climb = self.can_climb;
        let can_climb = self.rescan(hand);

        climb_log!(
            trace,
            side = ?self.side,
            kind = ?event.kind,
            other = event.other.id.0,
            can_climb,
            "overlap changed"
        );

        if !could_climb && can_climb {
            self.play_can_climb_effect();
        }
    }

    fn rescan(&mut self, hand: &dyn TrackedHand) -> bool {
        self.can_climb = hand
            .overlapping_actors()
            .iter()
            .any(|actor| actor.has_tag(&self.climbable_tag));
        self.can_climb
    }

    fn play_can_climb_effect(&self) {
        let Some(effect) = &self.can_climb_effect else {
            return;
        };
        let Some(haptics) = &self.haptics else {
            climb_log!(debug, side = ?self.side, "no controlling player, skipping haptic");
            return;
        };
        haptics.play(effect, self.side, self.haptic_intensity);
    }

    /// Start climbing if the hand touches something climbable. Gripping again
    /// while already climbing keeps the original anchor.
    pub fn grip(&mut self, hand: &dyn TrackedHand) {
        if !self.can_climb {
            return;
        }
        if !self.is_climbing {
            self.climbing_anchor = hand.position();
            climb_log!(debug, side = ?self.side, anchor = ?self.climbing_anchor, "grip");
        }
        self.is_climbing = true;
    }

    pub fn release(&mut self) {
        if self.is_climbing {
            climb_log!(debug, side = ?self.side, "release");
        }
        self.is_climbing = false;
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn can_climb(&self) -> bool {
        self.can_climb
    }

    pub fn is_climbing(&self) -> bool {
        self.is_climbing
    }

    pub fn climbing_anchor(&self) -> Vector3<f32> {
        self.climbing_anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        host::{OverlapActor, OverlapKind},
        sim::{RecordingHaptics, TrackingSpace},
    };
    use cgmath::{InnerSpace, vec3};

    const WALL: u64 = 7;
    const CRATE: u64 = 8;

    fn wall() -> OverlapActor {
        OverlapActor::new(WALL, &["Climbable"])
    }

    fn crate_box() -> OverlapActor {
        OverlapActor::new(CRATE, &["Prop"])
    }

    fn event(kind: OverlapKind, other: OverlapActor) -> OverlapEvent {
        OverlapEvent { kind, other }
    }

    fn setup() -> (TrackingSpace, HandController, RecordingHaptics) {
        let space = TrackingSpace::new(vec3(0.0, 0.9, 0.0), 0.9);
        let haptics = RecordingHaptics::new();
        let player: Rc<dyn HapticPlayer> = Rc::new(haptics.clone());
        let controller = HandController::new(Side::Right, &ClimbingConfig::default(), Some(player));
        (space, controller, haptics)
    }

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_rescan_tracks_climbable_overlaps() {
        let (space, mut controller, _) = setup();
        let rig = space.rig();

        space.set_overlaps(Side::Right, vec![crate_box()]);
        controller.handle_overlap(rig.right_hand.as_ref(), &event(OverlapKind::Begin, crate_box()));
        assert!(!controller.can_climb());

        space.set_overlaps(Side::Right, vec![crate_box(), wall()]);
        controller.handle_overlap(rig.right_hand.as_ref(), &event(OverlapKind::Begin, wall()));
        assert!(controller.can_climb());

        // an unrelated end event still rescans and keeps the wall
        space.set_overlaps(Side::Right, vec![wall()]);
        controller.handle_overlap(rig.right_hand.as_ref(), &event(OverlapKind::End, crate_box()));
        assert!(controller.can_climb());

        space.set_overlaps(Side::Right, vec![]);
        controller.handle_overlap(rig.right_hand.as_ref(), &event(OverlapKind::End, wall()));
        assert!(!controller.can_climb());
    }

    #[test]
    fn test_haptic_only_on_rising_edge() {
        let (space, mut controller, haptics) = setup();
        let rig = space.rig();
        let hand = rig.right_hand.as_ref();

        space.set_overlaps(Side::Right, vec![wall()]);
        controller.handle_overlap(hand, &event(OverlapKind::Begin, wall()));
        assert_eq!(haptics.pulses().len(), 1);
        assert_eq!(haptics.pulses()[0].side, Side::Right);
        assert_eq!(haptics.pulses()[0].intensity, 1.0);

        // sustained true
        space.set_overlaps(Side::Right, vec![wall(), crate_box()]);
        controller.handle_overlap(hand, &event(OverlapKind::Begin, crate_box()));
        assert_eq!(haptics.pulses().len(), 1);

        // falling edge
        space.set_overlaps(Side::Right, vec![]);
        controller.handle_overlap(hand, &event(OverlapKind::End, wall()));
        assert_eq!(haptics.pulses().len(), 1);

        // a new rising edge pulses again
        space.set_overlaps(Side::Right, vec![wall()]);
        controller.handle_overlap(hand, &event(OverlapKind::Begin, wall()));
        assert_eq!(haptics.pulses().len(), 2);
    }

    #[test]
    fn test_missing_player_or_effect_skips_haptic() {
        let space = TrackingSpace::new(vec3(0.0, 0.9, 0.0), 0.9);
        let rig = space.rig();
        space.set_overlaps(Side::Left, vec![wall()]);

        let mut no_player = HandController::new(Side::Left, &ClimbingConfig::default(), None);
        no_player.handle_overlap(rig.left_hand.as_ref(), &event(OverlapKind::Begin, wall()));
        assert!(no_player.can_climb());

        let haptics = RecordingHaptics::new();
        let config = ClimbingConfig {
            haptic_effect: None,
            ..ClimbingConfig::default()
        };
        let mut no_effect = HandController::new(Side::Left, &config, Some(Rc::new(haptics.clone())));
        no_effect.handle_overlap(rig.left_hand.as_ref(), &event(OverlapKind::Begin, wall()));
        assert!(no_effect.can_climb());
        assert!(haptics.pulses().is_empty());
    }

    #[test]
    fn test_grip_requires_climbable() {
        let (space, mut controller, _) = setup();
        let rig = space.rig();
        controller.grip(rig.right_hand.as_ref());
        assert!(!controller.is_climbing());
    }

    #[test]
    fn test_regrip_keeps_anchor() {
        let (space, mut controller, _) = setup();
        let rig = space.rig();
        space.set_overlaps(Side::Right, vec![wall()]);
        controller.handle_overlap(rig.right_hand.as_ref(), &event(OverlapKind::Begin, wall()));

        controller.grip(rig.right_hand.as_ref());
        let anchor = controller.climbing_anchor();
        space.move_hand_local(Side::Right, vec3(0.0, 0.2, 0.0));
        controller.grip(rig.right_hand.as_ref());
        assert_eq!(controller.climbing_anchor(), anchor);

        controller.release();
        assert!(!controller.is_climbing());
        controller.release();
        assert!(!controller.is_climbing());
    }

    #[test]
    fn test_body_moves_opposite_to_hand() {
        let (space, mut controller, _) = setup();
        let mut rig = space.rig();
        space.set_overlaps(Side::Right, vec![wall()]);
        controller.handle_overlap(rig.right_hand.as_ref(), &event(OverlapKind::Begin, wall()));

        let body_at_grip = space.body_position();
        let anchor = space.hand_world(Side::Right);
        controller.grip(rig.right_hand.as_ref());

        // wander around before settling at anchor + delta (hand local motion)
        let delta = vec3(0.1, -0.4, 0.05);
        for step in [vec3(0.3, 0.1, 0.0), vec3(-0.5, -0.2, 0.1), vec3(0.3, -0.3, -0.05)] {
            space.move_hand_local(Side::Right, step);
            controller.tick(rig.right_hand.as_ref(), rig.body.as_mut());
        }
        controller.tick(rig.right_hand.as_ref(), rig.body.as_mut());

        assert_close(space.body_position(), body_at_grip - delta);
        // the hand stays pinned to the grip point
        assert_close(space.hand_world(Side::Right), anchor);

        controller.release();
        space.move_hand_local(Side::Right, vec3(0.0, 1.0, 0.0));
        controller.tick(rig.right_hand.as_ref(), rig.body.as_mut());
        assert_close(space.body_position(), body_at_grip - delta);
    }
}
