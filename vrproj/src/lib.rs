// VR locomotion and hand interaction for a player hosted in a real-time engine.
//
// Two cooperating state machines sit on top of injected host capabilities:
// teleport locomotion (`teleport`) and climbing (`climbing`). `VrCharacter`
// composes them; `sim` provides an in-process host for tools and tests.

pub mod character;
pub mod climbing;
pub mod config;
pub mod error;
pub mod host;
pub mod input;
pub mod side;
pub mod sim;
pub mod teleport;

pub use character::VrCharacter;
pub use config::Config;
pub use error::{VrError, VrResult};
pub use side::{PressState, Side, ThumbstickPressState};
