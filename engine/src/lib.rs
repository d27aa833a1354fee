// Shared infrastructure for the VR locomotion workspace.
//
// Host-agnostic pieces that every crate in the workspace leans on. Right now
// that is the scoped logging layer; gameplay logic lives in `vrproj`.

pub mod logging;
