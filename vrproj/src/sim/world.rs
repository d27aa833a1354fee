use cgmath::{InnerSpace, Vector3};

use crate::{
    host::{OverlapActor, PathParams, PredictedPath, WorldQuery},
    teleport::{ArcTrajectory, intersect_horizontal_plane},
};

/// Axis aligned horizontal rectangle at a fixed height
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub height: f32,
    pub navigable: bool,
}

impl Surface {
    pub fn new(min: (f32, f32), max: (f32, f32), height: f32, navigable: bool) -> Self {
        Surface {
            min_x: min.0,
            max_x: max.0,
            min_z: min.1,
            max_z: max.1,
            height,
            navigable,
        }
    }

    fn contains_xz(&self, point: Vector3<f32>, margin: f32) -> bool {
        (self.min_x - margin..=self.max_x + margin).contains(&point.x)
            && (self.min_z - margin..=self.max_z + margin).contains(&point.z)
    }

    fn clamp_xz(&self, point: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            point.x.clamp(self.min_x, self.max_x),
            self.height,
            point.z.clamp(self.min_z, self.max_z),
        )
    }
}

/// Axis aligned box standing in for an actor hands can overlap, e.g. a ladder
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    pub actor: OverlapActor,
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Volume {
    pub fn new(actor: OverlapActor, min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Volume { actor, min, max }
    }

    fn touches_sphere(&self, center: Vector3<f32>, radius: f32) -> bool {
        let closest = Vector3::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
            center.z.clamp(self.min.z, self.max.z),
        );
        (closest - center).magnitude2() <= radius * radius
    }
}

/// Test world: a solid ground plane, raised rectangular platforms and
/// overlap volumes. Only surfaces flagged `navigable` accept teleport
/// projections.
#[derive(Clone, Debug)]
pub struct FlatWorld {
    pub ground_height: f32,
    pub surfaces: Vec<Surface>,
    pub volumes: Vec<Volume>,
    pub gravity: f32,
    pub sample_step: f32,
}

impl FlatWorld {
    pub fn new(ground_height: f32) -> Self {
        FlatWorld {
            ground_height,
            surfaces: Vec::new(),
            volumes: Vec::new(),
            gravity: 9.8,
            sample_step: 0.05,
        }
    }

    /// Mark a rectangle of the ground as navigable
    pub fn with_navigable_ground(mut self, min: (f32, f32), max: (f32, f32)) -> Self {
        let height = self.ground_height;
        self.surfaces.push(Surface::new(min, max, height, true));
        self
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surfaces.push(surface);
        self
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volumes.push(volume);
        self
    }

    /// Actors whose volume intersects the sphere at `center`
    pub fn overlapping_actors(&self, center: Vector3<f32>, radius: f32) -> Vec<OverlapActor> {
        self.volumes
            .iter()
            .filter(|v| v.touches_sphere(center, radius))
            .map(|v| v.actor.clone())
            .collect()
    }

    /// Where a sphere of `radius` moving along `from -> to` first rests on a
    /// surface. Returns the sphere center.
    fn first_contact(&self, from: Vector3<f32>, to: Vector3<f32>, radius: f32) -> Option<Vector3<f32>> {
        let ground = intersect_horizontal_plane(from, to, self.ground_height + radius);
        let platforms = self
            .surfaces
            .iter()
            .filter(|s| s.height > self.ground_height)
            .filter_map(|s| {
                intersect_horizontal_plane(from, to, s.height + radius).filter(|p| s.contains_xz(*p, radius))
            });

        ground
            .into_iter()
            .chain(platforms)
            .min_by(|a, b| {
                let da = (*a - from).magnitude2();
                let db = (*b - from).magnitude2();
                da.total_cmp(&db)
            })
    }
}

impl WorldQuery for FlatWorld {
    /// Sphere sweep along the arc. The world only holds static geometry on the
    /// visibility channel and never contains the player, so `channel` and
    /// `ignore_self` need no filtering here.
    fn predict_path(&self, params: &PathParams) -> Option<PredictedPath> {
        let radius = params.radius.max(0.0);
        let trajectory = ArcTrajectory::calculate(
            params.start,
            params.launch_velocity,
            self.gravity,
            params.max_sim_time,
            self.sample_step,
            |from, to| self.first_contact(from, to, radius),
        );

        // surfaces are horizontal, so the contact sits straight below the center
        let center = trajectory.landing_position?;
        Some(PredictedPath {
            points: trajectory.points,
            impact_point: center - Vector3::unit_y() * radius,
        })
    }

    fn project_to_navigation(
        &self,
        point: Vector3<f32>,
        extents: Vector3<f32>,
    ) -> Option<Vector3<f32>> {
        self.surfaces
            .iter()
            .filter(|s| s.navigable)
            .map(|s| s.clamp_xz(point))
            .filter(|p| {
                (p.x - point.x).abs() <= extents.x
                    && (p.y - point.y).abs() <= extents.y
                    && (p.z - point.z).abs() <= extents.z
            })
            .min_by(|a, b| (*a - point).magnitude2().total_cmp(&(*b - point).magnitude2()))
    }
}
