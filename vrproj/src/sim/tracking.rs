use std::{cell::RefCell, rc::Rc, time::Duration};

use cgmath::{InnerSpace, Quaternion, Rad, Rotation, Rotation3, Vector3, Zero};

use crate::{
    host::{MovableBody, OverlapActor, Rig, TrackedHand, TrackedHead},
    side::Side,
};

#[derive(Clone, Debug)]
struct DevicePose {
    local_position: Vector3<f32>,
    local_rotation: Quaternion<f32>,
}

impl DevicePose {
    fn at(local_position: Vector3<f32>) -> Self {
        DevicePose {
            local_position,
            local_rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Kinematic player hierarchy: body capsule -> tracking origin -> head and hands.
///
/// Tracked devices are stored relative to the tracking origin, which is itself
/// relative to the body and rotated by the body's yaw. Moving the body therefore
/// carries the devices along, as an attached scene hierarchy would.
#[derive(Clone, Debug)]
struct TrackingState {
    body_position: Vector3<f32>,
    body_yaw: f32,
    half_height: f32,
    origin_offset: Vector3<f32>,
    head: DevicePose,
    hands: [DevicePose; 2],
    overlaps: [Vec<OverlapActor>; 2],
    pending_movement: Vector3<f32>,
    pending_yaw: f32,
    walk_speed: f32,
    turn_speed: f32,
}

impl TrackingState {
    fn yaw(&self) -> Quaternion<f32> {
        Quaternion::from_angle_y(Rad(self.body_yaw))
    }

    fn world_position(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.body_position + self.yaw().rotate_vector(self.origin_offset + local)
    }

    fn world_rotation(&self, local: Quaternion<f32>) -> Quaternion<f32> {
        self.yaw() * local
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

/// Shared handle on a simulated player. Cloning shares the same state.
#[derive(Clone)]
pub struct TrackingSpace {
    state: Rc<RefCell<TrackingState>>,
}

impl TrackingSpace {
    /// Body capsule centered at `body_position`, head 0.7m above the capsule
    /// center and hands held forward at chest height.
    pub fn new(body_position: Vector3<f32>, half_height: f32) -> Self {
        let state = TrackingState {
            body_position,
            body_yaw: 0.0,
            half_height,
            origin_offset: Vector3::zero(),
            head: DevicePose::at(Vector3::new(0.0, 0.7, 0.0)),
            hands: [
                DevicePose::at(Vector3::new(-0.25, 0.3, -0.3)),
                DevicePose::at(Vector3::new(0.25, 0.3, -0.3)),
            ],
            overlaps: [Vec::new(), Vec::new()],
            pending_movement: Vector3::zero(),
            pending_yaw: 0.0,
            walk_speed: 1.5,
            turn_speed: 1.5,
        };
        TrackingSpace {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Build the capability objects handed to the character
    pub fn rig(&self) -> Rig {
        Rig {
            body: Box::new(SimBody(self.clone())),
            head: Box::new(SimHead(self.clone())),
            left_hand: Box::new(SimHand(self.clone(), Side::Left)),
            right_hand: Box::new(SimHand(self.clone(), Side::Right)),
        }
    }

    pub fn body_position(&self) -> Vector3<f32> {
        self.state.borrow().body_position
    }

    pub fn body_yaw(&self) -> f32 {
        self.state.borrow().body_yaw
    }

    pub fn head_world(&self) -> Vector3<f32> {
        let state = self.state.borrow();
        state.world_position(state.head.local_position)
    }

    pub fn hand_world(&self, side: Side) -> Vector3<f32> {
        let state = self.state.borrow();
        state.world_position(state.hands[side_index(side)].local_position)
    }

    /// Simulate the player physically moving their head inside tracking space
    pub fn move_head_local(&self, delta: Vector3<f32>) {
        self.state.borrow_mut().head.local_position += delta;
    }

    pub fn move_hand_local(&self, side: Side, delta: Vector3<f32>) {
        self.state.borrow_mut().hands[side_index(side)].local_position += delta;
    }

    pub fn set_hand_rotation(&self, side: Side, rotation: Quaternion<f32>) {
        self.state.borrow_mut().hands[side_index(side)].local_rotation = rotation;
    }

    pub(crate) fn overlaps(&self, side: Side) -> Vec<OverlapActor> {
        self.state.borrow().overlaps[side_index(side)].clone()
    }

    pub(crate) fn set_overlaps(&self, side: Side, actors: Vec<OverlapActor>) {
        self.state.borrow_mut().overlaps[side_index(side)] = actors;
    }

    /// Integrate queued movement and yaw input, the host movement component's job
    pub fn step(&self, dt: Duration) {
        let mut state = self.state.borrow_mut();
        let dt = dt.as_secs_f32();

        let mut movement = state.pending_movement;
        movement.y = 0.0;
        if movement.magnitude2() > 1.0 {
            movement = movement.normalize();
        }
        let walk = movement * state.walk_speed * dt;
        state.body_position += walk;

        let turn = state.pending_yaw.clamp(-1.0, 1.0) * state.turn_speed * dt;
        state.body_yaw -= turn;

        state.pending_movement = Vector3::zero();
        state.pending_yaw = 0.0;
    }
}

pub struct SimBody(TrackingSpace);

impl MovableBody for SimBody {
    fn position(&self) -> Vector3<f32> {
        self.0.state.borrow().body_position
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.0.state.borrow_mut().body_position = position;
    }

    fn add_world_offset(&mut self, offset: Vector3<f32>) {
        self.0.state.borrow_mut().body_position += offset;
    }

    fn half_height(&self) -> f32 {
        self.0.state.borrow().half_height
    }

    fn add_movement_input(&mut self, direction: Vector3<f32>, scale: f32) {
        self.0.state.borrow_mut().pending_movement += direction * scale;
    }

    fn add_yaw_input(&mut self, throttle: f32) {
        self.0.state.borrow_mut().pending_yaw += throttle;
    }
}

pub struct SimHead(TrackingSpace);

impl TrackedHead for SimHead {
    fn position(&self) -> Vector3<f32> {
        self.0.head_world()
    }

    fn rotation(&self) -> Quaternion<f32> {
        let state = self.0.state.borrow();
        state.world_rotation(state.head.local_rotation)
    }

    fn add_tracking_offset(&mut self, offset: Vector3<f32>) {
        let mut state = self.0.state.borrow_mut();
        let local = state.yaw().invert().rotate_vector(offset);
        state.origin_offset += local;
    }
}

pub struct SimHand(TrackingSpace, Side);

impl TrackedHand for SimHand {
    fn position(&self) -> Vector3<f32> {
        self.0.hand_world(self.1)
    }

    fn rotation(&self) -> Quaternion<f32> {
        let state = self.0.state.borrow();
        state.world_rotation(state.hands[side_index(self.1)].local_rotation)
    }

    fn overlapping_actors(&self) -> Vec<OverlapActor> {
        self.0.overlaps(self.1)
    }
}
