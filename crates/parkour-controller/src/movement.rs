//! Horizontal acceleration model

use glam::{Vec2, Vec3};
use parkour_core::{CharacterBody, Heading};

use crate::config::MovementConfig;

/// Acceleration profile for a force-based horizontal model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveProfile {
    pub acceleration: f32,
    pub top_speed: f32,
    pub deceleration: f32,
}

/// World-space direction the move axis asks for
pub fn input_direction(heading: Heading, move_axis: Vec2) -> Vec3 {
    heading.right() * move_axis.x + heading.forward() * move_axis.y
}

/// Horizontal part of a velocity
pub fn horizontal(velocity: Vec3) -> Vec3 {
    Vec3::new(velocity.x, 0.0, velocity.z)
}

/// Velocity-error force before any rate is applied.
///
/// The horizontal velocity is scaled down to the `[0, 1]` fraction of top
/// speed it represents, so under full input the force vanishes at top speed.
pub fn velocity_error(direction: Vec3, velocity: Vec3, top_speed: f32) -> Vec3 {
    let horizontal = horizontal(velocity);
    let ratio = (horizontal.length() / top_speed).clamp(0.0, 1.0);
    direction - horizontal.normalize_or_zero() * ratio
}

/// Drives the ordinary running and air-control forces
#[derive(Debug, Clone)]
pub struct MovementModule {
    config: MovementConfig,
}

impl MovementModule {
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    fn profile(&self) -> MoveProfile {
        MoveProfile {
            acceleration: self.config.acceleration,
            top_speed: self.config.top_speed,
            deceleration: self.config.deceleration,
        }
    }

    /// Normalize diagonal input when configured to
    pub fn shape_input(&self, move_axis: Vec2) -> Vec2 {
        if self.config.clamp_diagonal_input {
            move_axis.clamp_length_max(1.0)
        } else {
            move_axis
        }
    }

    /// Force to apply this tick, or `None` if it is not finite
    pub fn force(
        &self,
        heading: Heading,
        move_axis: Vec2,
        velocity: Vec3,
        ground_normal: Option<Vec3>,
    ) -> Option<Vec3> {
        let profile = self.profile();
        let direction = input_direction(heading, self.shape_input(move_axis));
        let has_input = direction != Vec3::ZERO;

        let rate = if has_input {
            profile.acceleration
        } else {
            profile.deceleration
        };
        let mut force = velocity_error(direction, velocity, profile.top_speed) * rate;

        match ground_normal {
            Some(normal) => force = force.reject_from_normalized(normal),
            None => {
                force *= if has_input {
                    self.config.air_control
                } else {
                    self.config.air_break
                };
            }
        }

        force.is_finite().then_some(force)
    }

    /// Apply one tick of horizontal movement.
    ///
    /// Without input and below the stop speed, horizontal velocity snaps to
    /// zero instead of decaying forever.
    pub fn apply(
        &self,
        body: &mut impl CharacterBody,
        heading: Heading,
        move_axis: Vec2,
        ground_normal: Option<Vec3>,
    ) {
        let velocity = body.velocity();

        if move_axis == Vec2::ZERO && horizontal(velocity).length() < self.config.stop_speed {
            body.set_velocity(Vec3::new(0.0, velocity.y, 0.0));
            return;
        }

        if let Some(force) = self.force(heading, move_axis, velocity, ground_normal) {
            body.add_acceleration(force);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkour_core::PointMassBody;

    fn module() -> MovementModule {
        MovementModule::new(MovementConfig::default())
    }

    #[test]
    fn test_force_vanishes_at_top_speed() {
        let movement = module();
        let heading = Heading::default();
        let velocity = heading.forward() * 8.0;

        let force = movement
            .force(heading, Vec2::Y, velocity, Some(Vec3::Y))
            .expect("finite");
        assert!(force.length() < 1e-4);
    }

    #[test]
    fn test_air_control_scales_force() {
        let movement = module();
        let heading = Heading::default();

        let ground = movement
            .force(heading, Vec2::Y, Vec3::ZERO, Some(Vec3::Y))
            .expect("finite");
        let air = movement
            .force(heading, Vec2::Y, Vec3::ZERO, None)
            .expect("finite");
        assert!((air.length() - ground.length() * 0.5).abs() < 1e-4);

        // Zero air break: no deceleration while airborne
        let coast = movement
            .force(heading, Vec2::ZERO, Vec3::X * 5.0, None)
            .expect("finite");
        assert_eq!(coast, Vec3::ZERO);
    }

    #[test]
    fn test_slope_projection_removes_normal_component() {
        let movement = module();
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let force = movement
            .force(Heading::default(), Vec2::Y, Vec3::ZERO, Some(normal))
            .expect("finite");
        assert!(force.dot(normal).abs() < 1e-5);
    }

    #[test]
    fn test_diagonal_input_is_clamped() {
        let movement = module();
        assert!((movement.shape_input(Vec2::ONE).length() - 1.0).abs() < 1e-6);

        let raw = MovementModule::new(MovementConfig {
            clamp_diagonal_input: false,
            ..MovementConfig::default()
        });
        assert_eq!(raw.shape_input(Vec2::ONE), Vec2::ONE);
    }

    #[test]
    fn test_non_finite_force_is_skipped() {
        let movement = MovementModule::new(MovementConfig {
            acceleration: f32::INFINITY,
            ..MovementConfig::default()
        });
        let mut body = PointMassBody::new(Vec3::ZERO, Vec3::ZERO);
        body.velocity = Vec3::NEG_Z * 8.0;

        // Velocity error is exactly zero here, so the rate turns it into NaN
        movement.apply(&mut body, Heading::default(), Vec2::Y, Some(Vec3::Y));
        assert_eq!(body.pending_acceleration(), Vec3::ZERO);
    }

    #[test]
    fn test_stop_speed_snap_keeps_vertical() {
        let movement = module();
        let mut body = PointMassBody::new(Vec3::ZERO, Vec3::ZERO);
        body.velocity = Vec3::new(0.01, -3.0, 0.0);

        movement.apply(&mut body, Heading::default(), Vec2::ZERO, None);
        assert_eq!(body.velocity, Vec3::new(0.0, -3.0, 0.0));
    }
}
