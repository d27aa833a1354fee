// VR teleport locomotion
//
// A single held thumbstick previews a ballistic arc from that hand; pressing the
// other thumbstick while a valid landing spot is shown fades the screen out,
// moves the body, and fades back in.

pub mod arc_renderer;
pub mod locomotion;
pub mod spline;
pub mod target;
pub mod trajectory;

pub use arc_renderer::{ArcSegment, ArcSegmentPool, TeleportMarker};
pub use locomotion::LocomotionController;
pub use spline::TeleportSpline;
pub use target::{LocomotionAction, TeleportPhase, TeleportTarget, decide_locomotion_action};
pub use trajectory::{ArcTrajectory, intersect_horizontal_plane};
