// Capabilities the host runtime provides to the controllers.
//
// Everything engine-specific sits behind these traits so the controllers only
// see plain positions, rotations and query results. Implementations are
// injected once, at construction, through `Rig` and `LocomotionServices`.

use std::time::Duration;

use cgmath::{Quaternion, Rotation, Vector3, vec3};

use crate::side::Side;

/// Local forward axis of tracked devices (Y up, -Z forward)
pub const FORWARD_AXIS: Vector3<f32> = vec3(0.0, 0.0, -1.0);
pub const RIGHT_AXIS: Vector3<f32> = vec3(1.0, 0.0, 0.0);
pub const UP_AXIS: Vector3<f32> = vec3(0.0, 1.0, 0.0);

/// The player's collision capsule
pub trait MovableBody {
    /// Center of the capsule in world space
    fn position(&self) -> Vector3<f32>;
    fn set_position(&mut self, position: Vector3<f32>);
    fn add_world_offset(&mut self, offset: Vector3<f32>);
    fn half_height(&self) -> f32;
    fn up_vector(&self) -> Vector3<f32> {
        UP_AXIS
    }
    /// Queue a movement impulse, consumed by the host's movement integration
    fn add_movement_input(&mut self, direction: Vector3<f32>, scale: f32);
    fn add_yaw_input(&mut self, throttle: f32);
}

/// The head mounted display
pub trait TrackedHead {
    fn position(&self) -> Vector3<f32>;
    fn rotation(&self) -> Quaternion<f32>;
    fn forward(&self) -> Vector3<f32> {
        self.rotation().rotate_vector(FORWARD_AXIS)
    }
    fn right(&self) -> Vector3<f32> {
        self.rotation().rotate_vector(RIGHT_AXIS)
    }
    /// Offset the tracking-space frame that parents the head and both hands
    fn add_tracking_offset(&mut self, offset: Vector3<f32>);
}

/// Identity of another actor in the world
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

/// An actor currently overlapping a hand, with its tag set
#[derive(Clone, Debug, PartialEq)]
pub struct OverlapActor {
    pub id: ActorId,
    pub tags: Vec<String>,
}

impl OverlapActor {
    pub fn new(id: u64, tags: &[&str]) -> Self {
        Self {
            id: ActorId(id),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapKind {
    Begin,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlapEvent {
    pub kind: OverlapKind,
    pub other: OverlapActor,
}

/// A motion controller
pub trait TrackedHand {
    fn position(&self) -> Vector3<f32>;
    fn rotation(&self) -> Quaternion<f32>;
    fn forward(&self) -> Vector3<f32> {
        self.rotation().rotate_vector(FORWARD_AXIS)
    }
    /// Every actor overlapping this hand right now
    fn overlapping_actors(&self) -> Vec<OverlapActor>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionChannel {
    Visibility,
}

/// Ballistic path prediction request
#[derive(Clone, Debug)]
pub struct PathParams {
    pub start: Vector3<f32>,
    pub launch_velocity: Vector3<f32>,
    pub radius: f32,
    pub max_sim_time: f32,
    pub channel: CollisionChannel,
    pub ignore_self: bool,
}

/// Result of a successful path prediction
#[derive(Clone, Debug, PartialEq)]
pub struct PredictedPath {
    /// Sampled path, ordered from the launch point to the hit
    pub points: Vec<Vector3<f32>>,
    pub impact_point: Vector3<f32>,
}

pub trait WorldQuery {
    /// Returns `None` when the path hits nothing within the time horizon
    fn predict_path(&self, params: &PathParams) -> Option<PredictedPath>;

    /// Project `point` onto the navigable surface, searching within `extents`
    fn project_to_navigation(
        &self,
        point: Vector3<f32>,
        extents: Vector3<f32>,
    ) -> Option<Vector3<f32>>;
}

/// Full screen fade, fire and forget
pub trait ScreenFader {
    fn start_fade(&mut self, from_alpha: f32, to_alpha: f32, duration: Duration);
}

/// Deferred events delivered back to the locomotion controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Fade-out finished, move the body
    TeleportRelocate,
    /// Fade-in finished
    TeleportFadeInComplete,
}

/// Fire-once deferred callbacks.
///
/// The controller schedules events and drains the ones that came due each tick,
/// so fired callbacks always run on the tick thread.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent);
    fn advance(&mut self, dt: Duration) -> Vec<TimerEvent>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HapticEffect {
    pub name: String,
}

impl HapticEffect {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Haptics of the controlling player
pub trait HapticPlayer {
    fn play(&self, effect: &HapticEffect, side: Side, intensity: f32);
}

/// The tracked player: body capsule, head and both hands
pub struct Rig {
    pub body: Box<dyn MovableBody>,
    pub head: Box<dyn TrackedHead>,
    pub left_hand: Box<dyn TrackedHand>,
    pub right_hand: Box<dyn TrackedHand>,
}

impl Rig {
    pub fn hand(&self, side: Side) -> &dyn TrackedHand {
        match side {
            Side::Left => self.left_hand.as_ref(),
            Side::Right => self.right_hand.as_ref(),
        }
    }

    /// One hand alongside the body, for updates that read the hand and move the body
    pub fn hand_and_body(&mut self, side: Side) -> (&dyn TrackedHand, &mut dyn MovableBody) {
        let hand = match side {
            Side::Left => self.left_hand.as_ref(),
            Side::Right => self.right_hand.as_ref(),
        };
        (hand, self.body.as_mut())
    }
}

/// World-facing services owned by the locomotion controller
pub struct LocomotionServices {
    pub world: Box<dyn WorldQuery>,
    pub fader: Box<dyn ScreenFader>,
    pub scheduler: Box<dyn Scheduler>,
}
