// Hand interaction: grabbing climbable surfaces and pulling the body along them.

pub mod hand_controller;

pub use hand_controller::HandController;
