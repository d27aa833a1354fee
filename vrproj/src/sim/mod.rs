// In-process host used by the headless runtime and the tests.
//
// Implements every capability in `host` with plain data: a kinematic tracking
// hierarchy, a flat world with platforms and overlap volumes, a tick-driven
// timer queue and recorders for fades and haptics.

pub mod overlap;
pub mod services;
pub mod tracking;
pub mod world;

pub use overlap::OverlapSensor;
pub use services::{FadeRecord, HapticRecord, RecordingFader, RecordingHaptics, TimerQueue};
pub use tracking::{SimBody, SimHand, SimHead, TrackingSpace};
pub use world::{FlatWorld, Surface, Volume};
