use std::time::Duration;

use cgmath::{Quaternion, Vector3};
use engine::locomotion_log;

use crate::{
    config::LocomotionConfig,
    error::VrResult,
    host::{CollisionChannel, LocomotionServices, MovableBody, PathParams, Rig, TimerEvent},
    side::{PressState, Side, ThumbstickPressState},
};

use super::{
    ArcSegmentPool, LocomotionAction, TeleportMarker, TeleportPhase, TeleportSpline,
    TeleportTarget, decide_locomotion_action,
};

/// Teleport locomotion: arc preview on a single thumbstick press, fade teleport
/// on a double press, plus smooth movement and head/body reconciliation.
pub struct LocomotionController {
    config: LocomotionConfig,
    fade: Duration,
    services: LocomotionServices,
    press_state: ThumbstickPressState,
    target: TeleportTarget,
    spline: TeleportSpline,
    arc_segments: ArcSegmentPool,
    marker: TeleportMarker,
    is_teleporting: bool,
    phase: TeleportPhase,
}

impl LocomotionController {
    /// Fails when `config` does not validate
    pub fn new(config: LocomotionConfig, services: LocomotionServices) -> VrResult<Self> {
        config.validate()?;
        let fade = config.fade()?;

        Ok(LocomotionController {
            config,
            fade,
            services,
            press_state: ThumbstickPressState::new(),
            target: TeleportTarget::unset(),
            spline: TeleportSpline::new(),
            arc_segments: ArcSegmentPool::new(),
            marker: TeleportMarker::default(),
            is_teleporting: false,
            phase: TeleportPhase::Idle,
        })
    }

    /// Per-frame update. Due timers fire first, then the body is reconciled with
    /// the head, then (unless teleporting) the thumbstick state is acted on.
    pub fn tick(&mut self, dt: Duration, rig: &mut Rig) -> Option<LocomotionAction> {
        for event in self.services.scheduler.advance(dt) {
            self.on_timer(event, rig.body.as_mut());
        }

        self.sync_camera(rig);

        if self.is_teleporting {
            return None;
        }
        Some(self.teleport_or_trace(rig))
    }

    /// Move the body under the head horizontally and shift tracking space back
    /// by the same amount, so nothing visibly jumps.
    pub fn sync_camera(&mut self, rig: &mut Rig) {
        let mut offset = rig.head.position() - rig.body.position();
        offset.y = 0.0;
        if offset.x == 0.0 && offset.z == 0.0 {
            return;
        }
        rig.body.add_world_offset(offset);
        rig.head.add_tracking_offset(-offset);
    }

    pub fn teleport_or_trace(&mut self, rig: &mut Rig) -> LocomotionAction {
        let action = decide_locomotion_action(&self.press_state, &self.target);
        match action {
            LocomotionAction::Commit => self.teleport(rig.body.as_mut()),
            LocomotionAction::Trace(side) => {
                self.phase = TeleportPhase::Tracing;
                self.teleport_trace(side, rig);
            }
            LocomotionAction::Idle => {
                if self.phase == TeleportPhase::Tracing {
                    self.phase = TeleportPhase::Idle;
                }
                self.reset_teleport_marker();
            }
        }
        action
    }

    /// Two-phase fade teleport, re-entered by the relocate timer.
    ///
    /// First call: fade out, schedule the relocation and release both
    /// thumbsticks so the held double press does not trigger again.
    /// Second call: move the body onto the target and fade back in.
    pub fn teleport(&mut self, body: &mut dyn MovableBody) {
        let fade = self.fade;

        if !self.is_teleporting {
            self.is_teleporting = true;
            self.phase = TeleportPhase::FadingOut;
            self.services.fader.start_fade(0.0, 1.0, fade);
            self.services
                .scheduler
                .schedule(fade, TimerEvent::TeleportRelocate);
            self.release_teleport_buttons();
            locomotion_log!(info, target = ?self.target.get(), "teleport started");
            return;
        }

        match self.target.get() {
            Some(target) => {
                let destination = target + body.up_vector() * body.half_height();
                body.set_position(destination);
                locomotion_log!(info, destination = ?destination, "teleport relocated body");
            }
            None => {
                locomotion_log!(error, "teleport relocation without a target, body left in place");
            }
        }

        self.services.fader.start_fade(1.0, 0.0, fade);
        self.services
            .scheduler
            .schedule(fade, TimerEvent::TeleportFadeInComplete);
        self.is_teleporting = false;
        self.phase = TeleportPhase::FadingIn;
        self.reset_teleport_marker();
    }

    pub fn on_timer(&mut self, event: TimerEvent, body: &mut dyn MovableBody) {
        match event {
            TimerEvent::TeleportRelocate => {
                if self.is_teleporting {
                    self.teleport(body);
                }
            }
            TimerEvent::TeleportFadeInComplete => {
                if self.phase == TeleportPhase::FadingIn {
                    self.phase = TeleportPhase::Idle;
                }
            }
        }
    }

    /// Predict the arc from `side`'s hand and, if it lands on navigable ground,
    /// show it and remember the landing point as the teleport target.
    pub fn teleport_trace(&mut self, side: Side, rig: &Rig) {
        let hand = rig.hand(side);
        let params = PathParams {
            start: hand.position(),
            launch_velocity: hand.forward() * self.config.launch_speed,
            radius: self.config.trace_radius,
            max_sim_time: self.config.max_sim_time,
            channel: CollisionChannel::Visibility,
            ignore_self: true,
        };

        let Some(path) = self.services.world.predict_path(&params) else {
            locomotion_log!(trace, ?side, "teleport trace missed");
            return self.reset_teleport_marker();
        };

        let Some(location) = self
            .services
            .world
            .project_to_navigation(path.impact_point, self.config.extents())
        else {
            locomotion_log!(trace, ?side, impact = ?path.impact_point, "no navigable ground near impact");
            return self.reset_teleport_marker();
        };

        self.update_teleport_spline(&path.points, hand.position(), hand.rotation());
        self.marker.show_at(location);
        self.target.set(location);
    }

    fn update_teleport_spline(
        &mut self,
        points: &[Vector3<f32>],
        hand_position: Vector3<f32>,
        hand_rotation: Quaternion<f32>,
    ) {
        self.spline.attach_to(hand_position, hand_rotation);
        self.spline.clear_points();
        for point in points {
            self.spline.add_world_point(*point);
        }
        self.spline.update();
        self.arc_segments.update_from_spline(&self.spline);
    }

    pub fn hide_teleport_splines(&mut self) {
        self.arc_segments.hide_all();
    }

    pub fn reset_teleport_marker(&mut self) {
        self.hide_teleport_splines();
        self.marker.hide();
        self.target.clear();
    }

    pub fn release_teleport_buttons(&mut self) {
        self.press_state.release_all();
    }

    /// Returns false when the event was ignored because a teleport is running
    pub fn on_thumbstick(&mut self, side: Side, state: PressState) -> bool {
        if self.is_teleporting {
            return false;
        }
        self.press_state.set(side, state);
        true
    }

    pub fn move_forward(&mut self, throttle: f32, rig: &mut Rig) {
        if self.is_teleporting || throttle == 0.0 {
            return;
        }
        let forward = rig.head.forward();
        rig.body
            .add_movement_input(forward, throttle * self.config.move_speed);
    }

    pub fn strafe_right(&mut self, throttle: f32, rig: &mut Rig) {
        if self.is_teleporting || throttle == 0.0 {
            return;
        }
        let right = rig.head.right();
        rig.body
            .add_movement_input(right, throttle * self.config.move_speed);
    }

    pub fn turn_right(&mut self, throttle: f32, rig: &mut Rig) {
        if self.is_teleporting || throttle == 0.0 {
            return;
        }
        rig.body.add_yaw_input(throttle * self.config.turn_rate);
    }

    pub fn is_teleporting(&self) -> bool {
        self.is_teleporting
    }

    pub fn phase(&self) -> TeleportPhase {
        self.phase
    }

    pub fn press_state(&self) -> &ThumbstickPressState {
        &self.press_state
    }

    pub fn target(&self) -> &TeleportTarget {
        &self.target
    }

    pub fn marker(&self) -> &TeleportMarker {
        &self.marker
    }

    pub fn arc_segments(&self) -> &ArcSegmentPool {
        &self.arc_segments
    }

    pub fn spline(&self) -> &TeleportSpline {
        &self.spline
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FlatWorld, RecordingFader, TimerQueue, TrackingSpace};
    use cgmath::{Deg, InnerSpace, Rotation3, vec3};

    const DT: Duration = Duration::from_millis(500);

    struct Harness {
        space: TrackingSpace,
        rig: Rig,
        controller: LocomotionController,
        fader: RecordingFader,
    }

    impl Harness {
        fn new(world: FlatWorld) -> Self {
            let space = TrackingSpace::new(vec3(0.0, 0.9, 0.0), 0.9);
            let fader = RecordingFader::new();
            let services = LocomotionServices {
                world: Box::new(world),
                fader: Box::new(fader.clone()),
                scheduler: Box::new(TimerQueue::new()),
            };
            Harness {
                rig: space.rig(),
                space,
                controller: LocomotionController::new(LocomotionConfig::default(), services).unwrap(),
                fader,
            }
        }

        fn open_floor() -> Self {
            Self::new(FlatWorld::new(0.0).with_navigable_ground((-20.0, -20.0), (20.0, 20.0)))
        }

        fn tick(&mut self) -> Option<LocomotionAction> {
            self.controller.tick(DT, &mut self.rig)
        }

        fn press(&mut self, side: Side) {
            self.controller.on_thumbstick(side, PressState::Pressed);
        }

        fn release(&mut self, side: Side) {
            self.controller.on_thumbstick(side, PressState::Released);
        }
    }

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_trace_sets_target_and_visuals() {
        let mut h = Harness::open_floor();
        h.press(Side::Left);

        assert_eq!(h.tick(), Some(LocomotionAction::Trace(Side::Left)));
        assert_eq!(h.controller.phase(), TeleportPhase::Tracing);

        let target = h.controller.target().get().expect("target set");
        assert_eq!(target.y, 0.0);
        assert!(target.z < -3.0);
        assert!(h.controller.marker().visible);
        assert_eq!(h.controller.marker().position, target);

        let samples = h.controller.spline().len();
        assert!(samples > 2);
        assert_eq!(h.controller.arc_segments().len(), samples - 1);
        assert_eq!(h.controller.arc_segments().visible_count(), samples - 1);

        // spline is stored relative to the tracing hand
        let (first, _) = h.controller.spline().local_location_and_tangent(0).unwrap();
        assert_close(first, vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_shorter_arc_reuses_segments() {
        let mut h = Harness::open_floor();
        h.press(Side::Right);
        h.tick();
        let allocated = h.controller.arc_segments().len();

        h.space
            .set_hand_rotation(Side::Right, Quaternion::from_angle_x(Deg(-60.0)));
        h.tick();

        let visible = h.controller.arc_segments().visible_count();
        assert!(visible < allocated, "{} !< {}", visible, allocated);
        assert_eq!(h.controller.arc_segments().len(), allocated);
        assert_eq!(visible, h.controller.spline().len() - 1);
    }

    #[test]
    fn test_missed_trace_clears_target() {
        let mut h = Harness::open_floor();
        h.press(Side::Left);
        h.tick();
        assert!(h.controller.target().is_set());

        // straight up never comes down within the time horizon
        h.space
            .set_hand_rotation(Side::Left, Quaternion::from_angle_x(Deg(90.0)));
        assert_eq!(h.tick(), Some(LocomotionAction::Trace(Side::Left)));
        assert!(!h.controller.target().is_set());
        assert!(!h.controller.marker().visible);
        assert_eq!(h.controller.arc_segments().visible_count(), 0);
    }

    #[test]
    fn test_failed_projection_clears_target() {
        let mut h = Harness::new(FlatWorld::new(0.0).with_navigable_ground((50.0, 50.0), (60.0, 60.0)));
        h.press(Side::Left);
        h.tick();
        assert!(!h.controller.target().is_set());
        assert!(!h.controller.marker().visible);
        assert!(h.controller.arc_segments().is_empty());
    }

    #[test]
    fn test_idle_reset_is_idempotent() {
        let mut h = Harness::open_floor();
        h.press(Side::Left);
        h.tick();
        h.release(Side::Left);

        assert_eq!(h.tick(), Some(LocomotionAction::Idle));
        let segments = h.controller.arc_segments().segments().to_vec();
        let marker = *h.controller.marker();
        let target = *h.controller.target();

        assert_eq!(h.tick(), Some(LocomotionAction::Idle));
        assert_eq!(h.controller.arc_segments().segments(), segments.as_slice());
        assert_eq!(*h.controller.marker(), marker);
        assert_eq!(*h.controller.target(), target);
        assert!(!target.is_set());
        assert!(!marker.visible);
        assert_eq!(h.controller.arc_segments().visible_count(), 0);
        assert_eq!(h.controller.phase(), TeleportPhase::Idle);
    }

    #[test]
    fn test_double_press_without_target_is_idle() {
        let mut h = Harness::new(FlatWorld::new(0.0));
        h.press(Side::Left);
        h.press(Side::Right);
        assert_eq!(h.tick(), Some(LocomotionAction::Idle));
        assert!(!h.controller.is_teleporting());
        assert!(h.fader.fades().is_empty());
    }

    #[test]
    fn test_teleport_round_trip() {
        let mut h = Harness::open_floor();
        h.press(Side::Left);
        h.tick();
        let target = h.controller.target().get().unwrap();

        h.press(Side::Right);
        assert_eq!(h.tick(), Some(LocomotionAction::Commit));
        assert!(h.controller.is_teleporting());
        assert_eq!(h.controller.phase(), TeleportPhase::FadingOut);
        assert_eq!(h.controller.press_state().pressed_side(), None);
        assert_eq!(h.fader.fades().len(), 1);

        // body stays put until the fade-out completes
        let start = h.space.body_position();
        let mut ticks = 0;
        while h.controller.is_teleporting() {
            assert_close(h.space.body_position(), start);
            h.tick();
            ticks += 1;
            assert!(ticks < 20, "teleport never completed");
        }
        assert_eq!(ticks, 5);

        assert_close(h.space.body_position(), target + vec3(0.0, 0.9, 0.0));
        assert!(!h.controller.target().is_set());
        assert!(!h.controller.marker().visible);

        let fades = h.fader.fades();
        assert_eq!(fades.len(), 2);
        assert_eq!((fades[0].from_alpha, fades[0].to_alpha), (0.0, 1.0));
        assert_eq!((fades[1].from_alpha, fades[1].to_alpha), (1.0, 0.0));
        assert_eq!(fades[0].duration, fades[1].duration);
        assert_eq!(fades[0].duration, Duration::from_millis(2500));

        assert_eq!(h.controller.phase(), TeleportPhase::FadingIn);
        for _ in 0..5 {
            h.tick();
        }
        assert_eq!(h.controller.phase(), TeleportPhase::Idle);
    }

    #[test]
    fn test_input_suppressed_while_teleporting() {
        let mut h = Harness::open_floor();
        h.press(Side::Left);
        h.tick();
        h.press(Side::Right);
        h.tick();
        assert!(h.controller.is_teleporting());

        assert!(!h.controller.on_thumbstick(Side::Left, PressState::Pressed));
        assert_eq!(h.controller.press_state().pressed_side(), None);

        h.controller.move_forward(1.0, &mut h.rig);
        h.controller.strafe_right(1.0, &mut h.rig);
        h.controller.turn_right(1.0, &mut h.rig);
        let before = h.space.body_position();
        h.space.step(DT);
        assert_close(h.space.body_position(), before);
        assert_eq!(h.space.body_yaw(), 0.0);

        assert_eq!(h.tick(), None);
        // only the fade-out was started
        assert_eq!(h.fader.fades().len(), 1);
    }

    #[test]
    fn test_movement_follows_head() {
        let mut h = Harness::open_floor();
        h.controller.move_forward(1.0, &mut h.rig);
        h.space.step(Duration::from_secs(1));
        let moved = h.space.body_position() - vec3(0.0, 0.9, 0.0);
        assert!(moved.z < 0.0 && moved.x.abs() < 1e-5);

        h.controller.strafe_right(-1.0, &mut h.rig);
        h.space.step(Duration::from_secs(1));
        assert!(h.space.body_position().x < 0.0);
    }

    #[test]
    fn test_sync_camera_tracks_head_horizontally() {
        let mut h = Harness::open_floor();
        h.space.move_head_local(vec3(0.4, 0.2, -0.3));
        let head_before = h.space.head_world();

        h.tick();

        let body = h.space.body_position();
        assert_close(body, vec3(0.4, 0.9, -0.3));
        assert_close(h.space.head_world(), head_before);

        // a second tick without head motion changes nothing
        h.tick();
        assert_close(h.space.body_position(), body);
    }

    #[test]
    fn test_sync_camera_runs_while_teleporting() {
        let mut h = Harness::open_floor();
        h.press(Side::Left);
        h.tick();
        h.press(Side::Right);
        h.tick();
        assert!(h.controller.is_teleporting());

        h.space.move_head_local(vec3(0.2, 0.0, 0.0));
        h.tick();
        assert_close(h.space.body_position(), vec3(0.2, 0.9, 0.0));
    }

    #[test]
    fn test_new_rejects_unvalidated_config() {
        let services = || LocomotionServices {
            world: Box::new(FlatWorld::new(0.0)),
            fader: Box::new(RecordingFader::new()),
            scheduler: Box::new(TimerQueue::new()),
        };

        let mut config = LocomotionConfig::default();
        config.fade_duration = 1e20;
        assert!(LocomotionController::new(config, services()).is_err());

        let mut config = LocomotionConfig::default();
        config.max_sim_time = 1e9;
        assert!(LocomotionController::new(config, services()).is_err());

        let mut config = LocomotionConfig::default();
        config.turn_rate = f32::INFINITY;
        assert!(LocomotionController::new(config, services()).is_err());
    }
}
