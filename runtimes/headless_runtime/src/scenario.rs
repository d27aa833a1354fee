use std::time::Duration;

use cgmath::{Vector3, vec3};
use serde::Serialize;
use tracing::info;
use vrproj::{
    Side, VrCharacter,
    input::ButtonEvent,
    sim::{OverlapSensor, TrackingSpace},
};

/// One scripted input, applied on the first frame at or after `at`
#[derive(Clone, Debug)]
pub enum Step {
    Button(&'static str, ButtonEvent),
    Axis(&'static str, f32),
    /// Move a hand inside tracking space over the given duration
    MoveHand(Side, Vector3<f32>, Duration),
}

pub struct Scenario {
    steps: Vec<(Duration, Step)>,
}

fn secs(s: f32) -> Duration {
    Duration::from_secs_f32(s)
}

impl Scenario {
    /// Walk up to the ladder, climb it, then teleport with a double press.
    ///
    /// Expects the ladder volume between z = -2.4 and z = -2.1, which the right
    /// hand reaches after walking 1.5m forward and extending the arm.
    pub fn walk_climb_teleport() -> Self {
        let steps = vec![
            (secs(0.0), Step::Axis("MoveForward", 1.0)),
            (secs(1.0), Step::Axis("MoveForward", 0.0)),
            (secs(1.2), Step::MoveHand(Side::Right, vec3(0.0, 0.0, -0.5), secs(0.5))),
            (secs(2.0), Step::Button("RightGrip", ButtonEvent::Pressed)),
            (secs(2.0), Step::MoveHand(Side::Right, vec3(0.0, -0.6, 0.0), secs(1.0))),
            (secs(3.5), Step::Button("RightGrip", ButtonEvent::Released)),
            (secs(3.5), Step::MoveHand(Side::Right, vec3(0.0, 0.6, 0.5), secs(0.5))),
            (secs(4.5), Step::Button("LeftThumbstick", ButtonEvent::Pressed)),
            (secs(5.0), Step::Button("RightThumbstick", ButtonEvent::Pressed)),
            (secs(5.1), Step::Button("LeftThumbstick", ButtonEvent::Released)),
            (secs(5.1), Step::Button("RightThumbstick", ButtonEvent::Released)),
        ];
        Scenario { steps }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Sample {
    pub time: f32,
    pub body: [f32; 3],
    pub phase: String,
    pub climbing: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub frames: usize,
    pub samples: Vec<Sample>,
}

struct HandMotion {
    side: Side,
    per_second: Vector3<f32>,
    remaining: Duration,
}

/// Drive `character` frame by frame, applying scripted steps as they come due
pub fn run(
    scenario: &Scenario,
    character: &mut VrCharacter,
    space: &TrackingSpace,
    sensor: &OverlapSensor,
    frames: usize,
    dt: Duration,
    sample_every: usize,
) -> Report {
    let mut report = Report::default();
    let mut next_step = 0;
    let mut motions: Vec<HandMotion> = Vec::new();
    let mut held_axes: Vec<(&'static str, f32)> = Vec::new();

    for frame in 0..frames {
        let now = dt * frame as u32;

        while let Some((at, step)) = scenario.steps.get(next_step) {
            if *at > now {
                break;
            }
            info!(?now, ?step, "scenario step");
            match step {
                Step::Button(name, event) => {
                    character.handle_action(name, *event);
                }
                Step::Axis(name, value) => {
                    held_axes.retain(|(held, _)| held != name);
                    held_axes.push((*name, *value));
                }
                Step::MoveHand(side, offset, over) => motions.push(HandMotion {
                    side: *side,
                    per_second: *offset / over.as_secs_f32(),
                    remaining: *over,
                }),
            }
            next_step += 1;
        }

        for (name, value) in &held_axes {
            character.handle_axis(name, *value);
        }

        for motion in &mut motions {
            let step = dt.min(motion.remaining);
            space.move_hand_local(motion.side, motion.per_second * step.as_secs_f32());
            motion.remaining -= step;
        }
        motions.retain(|m| !m.remaining.is_zero());

        for (side, event) in sensor.update() {
            info!(?side, kind = ?event.kind, actor = ?event.other.id, "hand overlap");
            character.handle_overlap(side, &event);
        }
        character.tick(dt);
        space.step(dt);

        if frame % sample_every == 0 || frame + 1 == frames {
            let body = space.body_position();
            report.samples.push(Sample {
                time: now.as_secs_f32(),
                body: body.into(),
                phase: format!("{:?}", character.locomotion().phase()),
                climbing: Side::ALL.iter().any(|s| character.hand(*s).is_climbing()),
            });
        }
        report.frames += 1;
    }

    report
}
