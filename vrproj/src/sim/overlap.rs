use crate::{
    host::{OverlapEvent, OverlapKind},
    side::Side,
};

use super::{FlatWorld, TrackingSpace};

/// Hand overlap detection against the world's volumes.
///
/// Each hand is a sphere at its tracked world position. `update` refreshes the
/// overlap sets the hands report and returns the begin/end transitions since
/// the previous call, which the host forwards to `VrCharacter::handle_overlap`.
pub struct OverlapSensor {
    world: FlatWorld,
    space: TrackingSpace,
    hand_radius: f32,
}

impl OverlapSensor {
    pub fn new(world: FlatWorld, space: TrackingSpace, hand_radius: f32) -> Self {
        OverlapSensor {
            world,
            space,
            hand_radius,
        }
    }

    /// Ends are reported before begins for each hand
    pub fn update(&self) -> Vec<(Side, OverlapEvent)> {
        let mut events = Vec::new();

        for side in Side::ALL {
            let current = self
                .world
                .overlapping_actors(self.space.hand_world(side), self.hand_radius);
            let previous = self.space.overlaps(side);

            for actor in previous.iter().filter(|a| !current.iter().any(|c| c.id == a.id)) {
                events.push((
                    side,
                    OverlapEvent {
                        kind: OverlapKind::End,
                        other: actor.clone(),
                    },
                ));
            }
            for actor in current.iter().filter(|c| !previous.iter().any(|a| a.id == c.id)) {
                events.push((
                    side,
                    OverlapEvent {
                        kind: OverlapKind::Begin,
                        other: actor.clone(),
                    },
                ));
            }

            self.space.set_overlaps(side, current);
        }

        events
    }
}
