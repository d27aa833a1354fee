use cgmath::{Quaternion, Rotation, Vector3, Zero};

/// Smooth curve through the predicted arc samples.
///
/// Control points live in the space of the hand the curve is attached to, so the
/// curve follows the controller between rebuilds. Tangents are derived on
/// `update` (Catmull-Rom: half the central difference, one-sided at the ends).
#[derive(Clone, Debug)]
pub struct TeleportSpline {
    origin: Vector3<f32>,
    orientation: Quaternion<f32>,
    points: Vec<Vector3<f32>>,
    tangents: Vec<Vector3<f32>>,
}

impl Default for TeleportSpline {
    fn default() -> Self {
        Self {
            origin: Vector3::zero(),
            orientation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            points: Vec::new(),
            tangents: Vec::new(),
        }
    }
}

impl TeleportSpline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-parent the curve to a hand transform
    pub fn attach_to(&mut self, position: Vector3<f32>, rotation: Quaternion<f32>) {
        self.origin = position;
        self.orientation = rotation;
    }

    pub fn clear_points(&mut self) {
        self.points.clear();
        self.tangents.clear();
    }

    /// Append a curve point given in world space. Call `update` once all points are in.
    pub fn add_world_point(&mut self, world: Vector3<f32>) {
        let local = self.orientation.conjugate().rotate_vector(world - self.origin);
        self.points.push(local);
    }

    pub fn update(&mut self) {
        let points = &self.points;
        let last = points.len().saturating_sub(1);
        self.tangents = (0..points.len())
            .map(|i| match (i, points.len()) {
                (_, 1) => Vector3::zero(),
                (0, _) => points[1] - points[0],
                (i, _) if i == last => points[i] - points[i - 1],
                (i, _) => (points[i + 1] - points[i - 1]) * 0.5,
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Local position and tangent of control point `index`
    pub fn local_location_and_tangent(
        &self,
        index: usize,
    ) -> Option<(Vector3<f32>, Vector3<f32>)> {
        let point = *self.points.get(index)?;
        let tangent = self.tangents.get(index).copied().unwrap_or_else(Vector3::zero);
        Some((point, tangent))
    }

    pub fn world_location(&self, index: usize) -> Option<Vector3<f32>> {
        self.points
            .get(index)
            .map(|local| self.origin + self.orientation.rotate_vector(*local))
    }
}
