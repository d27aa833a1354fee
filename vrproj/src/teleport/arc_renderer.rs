use cgmath::{Vector3, Zero};

use super::TeleportSpline;

/// One renderable piece of the teleport arc, spanning two spline points.
/// Positions and tangents are in the spline's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
    pub start: Vector3<f32>,
    pub start_tangent: Vector3<f32>,
    pub end: Vector3<f32>,
    pub end_tangent: Vector3<f32>,
    pub visible: bool,
}

impl ArcSegment {
    fn hidden() -> Self {
        ArcSegment {
            start: Vector3::zero(),
            start_tangent: Vector3::zero(),
            end: Vector3::zero(),
            end_tangent: Vector3::zero(),
            visible: false,
        }
    }
}

/// Segment handles reused across frames. The pool only ever grows; segments
/// past the current arc are hidden instead of dropped.
#[derive(Clone, Debug, Default)]
pub struct ArcSegmentPool {
    segments: Vec<ArcSegment>,
}

impl ArcSegmentPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide_all(&mut self) {
        for segment in &mut self.segments {
            segment.visible = false;
        }
    }

    /// Show one segment per consecutive pair of spline points, growing the pool
    /// when the spline has more pairs than allocated segments.
    pub fn update_from_spline(&mut self, spline: &TeleportSpline) {
        self.hide_all();

        for i in 0..spline.len().saturating_sub(1) {
            if i >= self.segments.len() {
                self.segments.push(ArcSegment::hidden());
            }

            let (Some((start, start_tangent)), Some((end, end_tangent))) = (
                spline.local_location_and_tangent(i),
                spline.local_location_and_tangent(i + 1),
            ) else {
                break;
            };

            self.segments[i] = ArcSegment {
                start,
                start_tangent,
                end,
                end_tangent,
                visible: true,
            };
        }
    }

    /// Number of allocated segments, visible or not
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.segments.iter().filter(|s| s.visible).count()
    }

    pub fn segments(&self) -> &[ArcSegment] {
        &self.segments
    }
}

/// Ground marker shown at the pending teleport destination
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportMarker {
    pub position: Vector3<f32>,
    pub visible: bool,
}

impl Default for TeleportMarker {
    fn default() -> Self {
        TeleportMarker {
            position: Vector3::zero(),
            visible: false,
        }
    }
}

impl TeleportMarker {
    pub fn show_at(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
