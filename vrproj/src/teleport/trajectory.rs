use cgmath::{InnerSpace, Vector3};

/// Sampled ballistic path, as produced by a path prediction query
#[derive(Clone, Debug)]
pub struct ArcTrajectory {
    /// Points along the path, starting at the launch point
    pub points: Vec<Vector3<f32>>,
    /// Where the path first touched something, if it did
    pub landing_position: Option<Vector3<f32>>,
}

impl ArcTrajectory {
    /// Step a projectile from `start` with `velocity` under `gravity` (m/s², along -Y)
    /// until `max_time` or until `intersect` reports a hit on a sub-segment.
    ///
    /// `intersect(from, to)` returns the first contact point on the segment, if any.
    pub fn calculate<F>(
        start: Vector3<f32>,
        velocity: Vector3<f32>,
        gravity: f32,
        max_time: f32,
        time_step: f32,
        mut intersect: F,
    ) -> Self
    where
        F: FnMut(Vector3<f32>, Vector3<f32>) -> Option<Vector3<f32>>,
    {
        let steps = if time_step > 0.0 {
            (max_time / time_step).ceil().max(1.0) as usize
        } else {
            1
        };

        let mut points = Vec::with_capacity(steps + 1);
        let mut landing_position = None;
        points.push(start);

        let mut previous = start;
        for i in 1..=steps {
            let t = (i as f32 * time_step).min(max_time);
            let position = Self::calculate_position_at_time(start, velocity, gravity, t);

            if let Some(hit) = intersect(previous, position) {
                points.push(hit);
                landing_position = Some(hit);
                break;
            }

            points.push(position);
            previous = position;
        }

        ArcTrajectory {
            points,
            landing_position,
        }
    }

    /// Kinematic position after `time` seconds
    pub fn calculate_position_at_time(
        start_position: Vector3<f32>,
        initial_velocity: Vector3<f32>,
        gravity: f32,
        time: f32,
    ) -> Vector3<f32> {
        Vector3::new(
            start_position.x + initial_velocity.x * time,
            start_position.y + initial_velocity.y * time - 0.5 * gravity * time * time,
            start_position.z + initial_velocity.z * time,
        )
    }

    pub fn get_arc_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).magnitude())
            .sum()
    }
}

/// Crossing point of the segment `from -> to` with the horizontal plane `y = height`,
/// only when travelling downward through it.
pub fn intersect_horizontal_plane(
    from: Vector3<f32>,
    to: Vector3<f32>,
    height: f32,
) -> Option<Vector3<f32>> {
    if from.y < height || to.y > height || from.y == to.y {
        return None;
    }
    let t = (from.y - height) / (from.y - to.y);
    let mut hit = from + (to - from) * t;
    hit.y = height;
    Some(hit)
}
