use std::path::Path;
use std::time::Duration;

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{VrError, VrResult};

/// Top level configuration, usually loaded from `vrproj.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locomotion: LocomotionConfig,
    pub climbing: ClimbingConfig,
    pub bindings: BindingConfig,
}

/// Teleport and smooth locomotion tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Seconds for each half of the fade teleport
    pub fade_duration: f32,
    pub trace_radius: f32,
    /// Launch speed of the predicted arc, in m/s
    pub launch_speed: f32,
    /// Time horizon of the predicted arc, in seconds
    pub max_sim_time: f32,
    /// Half extents of the box searched when projecting onto the nav surface
    pub navigation_extents: [f32; 3],
    pub move_speed: f32,
    pub turn_rate: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        LocomotionConfig {
            fade_duration: 2.5,
            trace_radius: 0.1,
            launch_speed: 10.0,
            max_sim_time: 2.0,
            navigation_extents: [1.0, 1.0, 1.0],
            move_speed: 1.0,
            turn_rate: 1.0,
        }
    }
}

/// Longest arc prediction horizon accepted, in seconds
pub const MAX_SIM_TIME: f32 = 30.0;

impl LocomotionConfig {
    /// Length of each half of the fade, rejecting values a `Duration` cannot hold
    pub fn fade(&self) -> VrResult<Duration> {
        match Duration::try_from_secs_f32(self.fade_duration) {
            Ok(fade) if !fade.is_zero() => Ok(fade),
            _ => Err(VrError::validation(
                "locomotion.fade_duration",
                format!("must be a positive duration, got {}", self.fade_duration),
            )),
        }
    }

    pub fn extents(&self) -> Vector3<f32> {
        Vector3::from(self.navigation_extents)
    }

    pub fn validate(&self) -> VrResult<()> {
        self.fade()?;

        if !(self.launch_speed.is_finite() && self.launch_speed > 0.0) {
            return Err(VrError::validation(
                "locomotion.launch_speed",
                format!("must be > 0, got {}", self.launch_speed),
            ));
        }

        if !(self.max_sim_time > 0.0 && self.max_sim_time <= MAX_SIM_TIME) {
            return Err(VrError::validation(
                "locomotion.max_sim_time",
                format!("must be within (0, {}], got {}", MAX_SIM_TIME, self.max_sim_time),
            ));
        }

        let non_negative = [
            ("locomotion.trace_radius", self.trace_radius),
            ("locomotion.move_speed", self.move_speed),
            ("locomotion.turn_rate", self.turn_rate),
        ];
        for (item, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(VrError::validation(
                    item,
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }

        if self
            .navigation_extents
            .iter()
            .any(|e| !e.is_finite() || *e < 0.0)
        {
            return Err(VrError::validation(
                "locomotion.navigation_extents",
                "extents must be non-negative",
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbingConfig {
    pub climbable_tag: String,
    pub haptic_intensity: f32,
    /// Haptic played when a hand starts touching something climbable
    pub haptic_effect: Option<String>,
}

impl Default for ClimbingConfig {
    fn default() -> Self {
        ClimbingConfig {
            climbable_tag: "Climbable".to_string(),
            haptic_intensity: 1.0,
            haptic_effect: Some("CanClimb".to_string()),
        }
    }
}

/// Names of the host input actions and axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    pub left_thumbstick: String,
    pub right_thumbstick: String,
    pub left_grip: String,
    pub right_grip: String,
    pub move_forward: String,
    pub turn_right: String,
    pub strafe_right: String,
}

impl Default for BindingConfig {
    fn default() -> Self {
        BindingConfig {
            left_thumbstick: "LeftThumbstick".to_string(),
            right_thumbstick: "RightThumbstick".to_string(),
            left_grip: "LeftGrip".to_string(),
            right_grip: "RightGrip".to_string(),
            move_forward: "MoveForward".to_string(),
            turn_right: "TurnRight".to_string(),
            strafe_right: "StrafeRight".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or use defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> VrResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> VrResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| VrError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| VrError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> VrResult<Self> {
        let config: Config = toml::from_str(content).map_err(|source| VrError::Config {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> VrResult<()> {
        self.locomotion.validate()?;

        if self.climbing.climbable_tag.trim().is_empty() {
            return Err(VrError::validation("climbing.climbable_tag", "must not be empty"));
        }

        if !(0.0..=1.0).contains(&self.climbing.haptic_intensity) {
            return Err(VrError::validation(
                "climbing.haptic_intensity",
                "must be within 0.0..=1.0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.locomotion.fade().unwrap(), Duration::from_millis(2500));
        assert_eq!(config.climbing.climbable_tag, "Climbable");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [locomotion]
            fade_duration = 0.5

            [climbing]
            climbable_tag = "Ladder"
            "#,
        )
        .unwrap();

        assert_eq!(config.locomotion.fade_duration, 0.5);
        assert_eq!(config.locomotion.launch_speed, 10.0);
        assert_eq!(config.climbing.climbable_tag, "Ladder");
        assert_eq!(config.bindings.left_grip, "LeftGrip");
    }

    #[test]
    fn test_rejects_zero_fade() {
        let err = Config::from_toml_str("[locomotion]\nfade_duration = 0.0\n").unwrap_err();
        assert!(matches!(err, VrError::Validation { ref item, .. } if item == "locomotion.fade_duration"));
    }

    #[test]
    fn test_rejects_fade_too_long_for_duration() {
        let mut config = Config::default();
        config.locomotion.fade_duration = 1e20;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, VrError::Validation { ref item, .. } if item == "locomotion.fade_duration"));

        config.locomotion.fade_duration = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unbounded_horizon() {
        let mut config = Config::default();
        config.locomotion.max_sim_time = 1e9;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, VrError::Validation { ref item, .. } if item == "locomotion.max_sim_time"));

        config.locomotion.max_sim_time = MAX_SIM_TIME;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_speeds() {
        let mut config = Config::default();
        config.locomotion.move_speed = f32::NAN;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, VrError::Validation { ref item, .. } if item == "locomotion.move_speed"));

        let mut config = Config::default();
        config.locomotion.turn_rate = f32::INFINITY;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, VrError::Validation { ref item, .. } if item == "locomotion.turn_rate"));
    }

    #[test]
    fn test_rejects_negative_extents() {
        let mut config = Config::default();
        config.locomotion.navigation_extents = [1.0, -1.0, 1.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_tag() {
        let mut config = Config::default();
        config.climbing.climbable_tag = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let err = Config::from_toml_str("[locomotion\n").unwrap_err();
        assert!(matches!(err, VrError::Config { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, VrError::Io { .. }));
    }
}
