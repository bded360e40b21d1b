//! Controller tuning, one section per module

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// All controller tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub ground: GroundConfig,
    pub gravity: GravityConfig,
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub wall_run: WallRunConfig,
    pub wall_jump: WallJumpConfig,
    pub slide: SlideConfig,
    pub mantle: MantleConfig,
    pub wall_climb: WallClimbConfig,
    pub respawn: RespawnConfig,
}

impl ControllerConfig {
    /// Check every tuning value, reporting the first invalid one
    pub fn validate(&self) -> Result<(), ConfigError> {
        out_of_range("ground.slope_limit", self.ground.slope_limit, 0.0, 90.0)?;
        not_positive("ground.slope_limit", self.ground.slope_limit)?;

        negative("gravity.default_scale", self.gravity.default_scale)?;

        negative("movement.acceleration", self.movement.acceleration)?;
        not_positive("movement.top_speed", self.movement.top_speed)?;
        negative("movement.deceleration", self.movement.deceleration)?;
        negative("movement.air_control", self.movement.air_control)?;
        negative("movement.air_break", self.movement.air_break)?;
        negative("movement.stop_speed", self.movement.stop_speed)?;

        negative("jump.jump_height", self.jump.jump_height)?;
        negative("jump.coyote_time", self.jump.coyote_time)?;
        negative("jump.jump_buffer_time", self.jump.jump_buffer_time)?;

        out_of_range("wall_run.detection_threshold", self.wall_run.detection_threshold, 0.0, 1.0)?;
        out_of_range("wall_run.forward_input_threshold", self.wall_run.forward_input_threshold, 0.0, 1.0)?;
        out_of_range(
            "wall_run.forward_velocity_threshold",
            self.wall_run.forward_velocity_threshold,
            0.0,
            1.0,
        )?;
        negative("wall_run.stick_force", self.wall_run.stick_force)?;
        negative("wall_run.minimum_speed", self.wall_run.minimum_speed)?;
        negative("wall_run.ascending_gravity", self.wall_run.ascending_gravity)?;
        negative("wall_run.descending_gravity", self.wall_run.descending_gravity)?;

        negative("wall_jump.jump_height", self.wall_jump.jump_height)?;
        negative("wall_jump.same_wall_cooldown", self.wall_jump.same_wall_cooldown)?;

        negative("slide.gravity_scale", self.slide.gravity_scale)?;
        negative("slide.acceleration", self.slide.acceleration)?;
        negative("slide.top_speed", self.slide.top_speed)?;
        negative("slide.deceleration", self.slide.deceleration)?;
        not_positive("slide.collider_height", self.slide.collider_height)?;
        negative("slide.camera_lerp_speed", self.slide.camera_lerp_speed)?;

        out_of_range("mantle.detection_threshold", self.mantle.detection_threshold, 0.0, 1.0)?;
        not_positive("mantle.duration", self.mantle.duration)?;
        if let Some(speed) = self.mantle.exit_speed {
            negative("mantle.exit_speed", speed)?;
        }

        out_of_range("wall_climb.detection_threshold", self.wall_climb.detection_threshold, 0.0, 1.0)?;
        out_of_range(
            "wall_climb.forward_input_threshold",
            self.wall_climb.forward_input_threshold,
            0.0,
            1.0,
        )?;
        negative("wall_climb.max_height", self.wall_climb.max_height)?;

        Ok(())
    }
}

fn not_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn out_of_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Ground contact classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Steepest walkable surface, in degrees from world up
    pub slope_limit: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self { slope_limit: 45.0 }
    }
}

/// Custom gravity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// Multiplier on world gravity while airborne in no special mode
    pub default_scale: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self { default_scale: 1.5 }
    }
}

/// Horizontal movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Force per unit of velocity error while there is input
    pub acceleration: f32,
    /// Horizontal speed the force model settles at under full input
    pub top_speed: f32,
    /// Force per unit of velocity error without input
    pub deceleration: f32,
    /// Force multiplier while airborne with input
    pub air_control: f32,
    /// Force multiplier while airborne without input
    pub air_break: f32,
    /// Below this horizontal speed, with no input, horizontal velocity is zeroed
    pub stop_speed: f32,
    /// Clamp the move axis to unit length so diagonals are not faster
    pub clamp_diagonal_input: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            acceleration: 60.0,
            top_speed: 8.0,
            deceleration: 120.0,
            air_control: 0.5,
            air_break: 0.0,
            stop_speed: 0.05,
            clamp_diagonal_input: true,
        }
    }
}

/// Ground jump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Apex height of a ground jump, in meters
    pub jump_height: f32,
    /// Coyote time - grace period after leaving ground where you can still jump
    pub coyote_time: f32,
    /// Jump buffer - how long a jump input is remembered before it can execute
    pub jump_buffer_time: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_height: 2.0,
            coyote_time: 0.15,
            jump_buffer_time: 0.15,
        }
    }
}

/// Wall detection and wall-run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallRunConfig {
    /// Minimum dot product between the contact normal and the side axis
    pub detection_threshold: f32,
    /// Acceleration pulling the character into the wall
    pub stick_force: f32,
    /// Speed the character is held at while wall-running
    pub minimum_speed: f32,
    /// Gravity scale while wall-running upwards
    pub ascending_gravity: f32,
    /// Gravity scale while wall-running downwards
    pub descending_gravity: f32,
    /// Normalized forward input required to keep wall-running
    pub forward_input_threshold: f32,
    /// Alignment of horizontal velocity with forward required to keep wall-running
    pub forward_velocity_threshold: f32,
    /// Lowest qualifying contact, relative to the capsule center
    pub band_min_offset: f32,
    /// Highest qualifying contact, relative to the capsule center (unbounded if unset)
    pub band_max_offset: Option<f32>,
}

impl Default for WallRunConfig {
    fn default() -> Self {
        Self {
            detection_threshold: 0.9,
            stick_force: 10.0,
            minimum_speed: 10.0,
            ascending_gravity: 1.25,
            descending_gravity: 0.75,
            forward_input_threshold: 0.7,
            forward_velocity_threshold: 0.7,
            band_min_offset: 0.1,
            band_max_offset: None,
        }
    }
}

/// Wall jump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallJumpConfig {
    /// Apex height gained by the vertical part of a wall jump
    pub jump_height: f32,
    /// Velocity pushing away from the wall
    pub side_force: f32,
    /// Velocity added along the facing direction
    pub forward_force: f32,
    /// Seconds before the same wall can be jumped off again
    pub same_wall_cooldown: f32,
}

impl Default for WallJumpConfig {
    fn default() -> Self {
        Self {
            jump_height: 1.5,
            side_force: 4.0,
            forward_force: 5.0,
            same_wall_cooldown: 2.5,
        }
    }
}

/// Slide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    /// Gravity scale while sliding
    pub gravity_scale: f32,
    pub acceleration: f32,
    /// Speed the slide force model settles at (0 means the slide only decays)
    pub top_speed: f32,
    pub deceleration: f32,
    /// Below this speed on flat ground, the slide comes to a hard stop
    pub stop_speed: f32,
    /// Collider height while sliding
    pub collider_height: f32,
    /// Collider center while sliding
    pub collider_center: Vec3,
    /// Camera anchor local offset while standing
    pub standing_camera_anchor: Vec3,
    /// Camera anchor local offset while sliding
    pub sliding_camera_anchor: Vec3,
    /// Exponential lerp speed of the camera anchor
    pub camera_lerp_speed: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            gravity_scale: 2.0,
            acceleration: 3.0,
            top_speed: 0.0,
            deceleration: 1.0,
            stop_speed: 0.2,
            collider_height: 1.0,
            collider_center: Vec3::new(0.0, 0.5, 0.0),
            standing_camera_anchor: Vec3::new(0.0, 1.6, 0.0),
            sliding_camera_anchor: Vec3::new(0.0, 0.25, 0.0),
            camera_lerp_speed: 10.0,
        }
    }
}

/// Mantle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MantleConfig {
    /// Minimum dot product between the contact normal and the backward axis
    pub detection_threshold: f32,
    /// Ledge reference height, relative to the capsule center
    pub reference_offset: f32,
    /// Horizontal distance travelled over the ledge
    pub forward_offset: f32,
    /// Vertical distance climbed onto the ledge
    pub vertical_offset: f32,
    /// Seconds the traversal takes
    pub duration: f32,
    /// Forward speed on completion (defaults to the movement top speed)
    pub exit_speed: Option<f32>,
}

impl Default for MantleConfig {
    fn default() -> Self {
        Self {
            detection_threshold: 0.9,
            reference_offset: 0.1,
            forward_offset: 1.0,
            vertical_offset: 1.0,
            duration: 0.25,
            exit_speed: None,
        }
    }
}

/// Wall climb configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallClimbConfig {
    pub detection_threshold: f32,
    /// Height above the takeoff point a climb can reach
    pub max_height: f32,
    /// Normalized forward input required to start a climb
    pub forward_input_threshold: f32,
    /// Lowest qualifying contact, relative to the capsule center
    pub band_min_offset: f32,
}

impl Default for WallClimbConfig {
    fn default() -> Self {
        Self {
            detection_threshold: 0.9,
            max_height: 4.0,
            forward_input_threshold: 0.9,
            band_min_offset: 0.1,
        }
    }
}

/// Fall-out respawn
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnConfig {
    pub enabled: bool,
    /// Falling below this height triggers a respawn
    pub kill_height: f32,
    /// Where the body is placed on respawn
    pub checkpoint: Vec3,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kill_height: -10.0,
            checkpoint: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_top_speed_rejected() {
        let mut config = ControllerConfig::default();
        config.movement.top_speed = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "movement.top_speed",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = ControllerConfig::default();
        config.wall_run.detection_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "wall_run.detection_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_timer_rejected() {
        let mut config = ControllerConfig::default();
        config.jump.coyote_time = -0.1;
        assert!(matches!(config.validate(), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ControllerConfig = toml::from_str(
            r#"
            [jump]
            jump_height = 3.0

            [wall_jump]
            same_wall_cooldown = 1.0
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.jump.jump_height, 3.0);
        assert_eq!(config.jump.coyote_time, 0.15);
        assert_eq!(config.wall_jump.same_wall_cooldown, 1.0);
        assert_eq!(config.movement.top_speed, 8.0);
        assert!(config.wall_run.band_max_offset.is_none());
    }
}
