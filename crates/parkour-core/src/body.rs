//! The physics body seam the character controller drives.
//!
//! The controller never owns a physics engine. Each fixed tick it receives a
//! mutable view of exactly one body through [`CharacterBody`] and is the only
//! writer of that body's velocity and position.

use glam::Vec3;

use crate::types::{CapsuleShape, Heading};

/// A single dynamic body with an upright capsule collider.
///
/// Implementations must not apply engine gravity to the body; the controller
/// applies its own mode-dependent gravity through [`add_acceleration`].
///
/// [`add_acceleration`]: CharacterBody::add_acceleration
pub trait CharacterBody {
    /// Body pivot position (feet)
    fn position(&self) -> Vec3;

    /// Teleport the body
    fn set_position(&mut self, position: Vec3);

    fn velocity(&self) -> Vec3;

    /// Overwrite the velocity, leaving queued accelerations in place
    fn set_velocity(&mut self, velocity: Vec3);

    /// Queue a mass-independent acceleration for the coming step.
    ///
    /// Accelerations accumulate until the body is next integrated, so
    /// [`velocity`](CharacterBody::velocity) does not reflect them within the
    /// same tick. Use [`add_velocity_change`](CharacterBody::add_velocity_change)
    /// for an immediate change.
    fn add_acceleration(&mut self, acceleration: Vec3);

    /// Instantaneously change the velocity
    fn add_velocity_change(&mut self, delta: Vec3) {
        let velocity = self.velocity();
        self.set_velocity(velocity + delta);
    }

    /// Drop any accelerations accumulated for the coming step
    fn clear_forces(&mut self);

    /// Snap the body's yaw
    fn set_heading(&mut self, heading: Heading);

    /// Current collider dimensions
    fn collider(&self) -> CapsuleShape;

    /// Replace the collider dimensions
    fn set_collider(&mut self, shape: CapsuleShape);

    /// Enable or disable collision for the body
    fn set_collider_enabled(&mut self, enabled: bool);

    /// World gravity acting on the scene
    fn gravity(&self) -> Vec3;
}

/// A point mass with exact constant-acceleration integration.
///
/// Used for headless simulation and tests: it carries a capsule description but
/// never collides with anything, so contacts must be supplied by the caller.
#[derive(Debug, Clone)]
pub struct PointMassBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub heading: Heading,
    pub collider: CapsuleShape,
    pub collider_enabled: bool,
    pub gravity: Vec3,
    pending_acceleration: Vec3,
}

impl PointMassBody {
    pub fn new(position: Vec3, gravity: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            heading: Heading::default(),
            collider: CapsuleShape::default(),
            collider_enabled: true,
            gravity,
            pending_acceleration: Vec3::ZERO,
        }
    }

    /// Use `collider` instead of the default capsule
    pub fn with_collider(mut self, collider: CapsuleShape) -> Self {
        self.collider = collider;
        self
    }

    /// Acceleration accumulated for the coming step
    pub fn pending_acceleration(&self) -> Vec3 {
        self.pending_acceleration
    }

    /// Advance the body by `dt` seconds and clear accumulated accelerations
    pub fn integrate(&mut self, dt: f32) {
        let acceleration = self.pending_acceleration;
        self.position += self.velocity * dt + 0.5 * acceleration * dt * dt;
        self.velocity += acceleration * dt;
        self.pending_acceleration = Vec3::ZERO;
    }
}

impl CharacterBody for PointMassBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn add_acceleration(&mut self, acceleration: Vec3) {
        self.pending_acceleration += acceleration;
    }

    fn clear_forces(&mut self) {
        self.pending_acceleration = Vec3::ZERO;
    }

    fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    fn collider(&self) -> CapsuleShape {
        self.collider
    }

    fn set_collider(&mut self, shape: CapsuleShape) {
        self.collider = shape;
    }

    fn set_collider_enabled(&mut self, enabled: bool) {
        self.collider_enabled = enabled;
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_constant_acceleration_is_exact() {
        let mut body = PointMassBody::new(Vec3::ZERO, Vec3::new(0.0, -9.81, 0.0));
        body.velocity = Vec3::new(0.0, 10.0, 0.0);

        let dt = 0.1;
        for _ in 0..10 {
            body.add_acceleration(Vec3::new(0.0, -9.81, 0.0));
            body.integrate(dt);
        }

        // y(t) = v0 t + a t^2 / 2 at t = 1
        let expected = 10.0 - 0.5 * 9.81;
        assert!((body.position.y - expected).abs() < 1e-4);
        assert!((body.velocity.y - (10.0 - 9.81)).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_change_and_clear() {
        let mut body = PointMassBody::new(Vec3::ZERO, Vec3::ZERO);
        body.add_velocity_change(Vec3::X * 2.0);
        assert_eq!(body.velocity, Vec3::X * 2.0);

        body.add_acceleration(Vec3::Y);
        body.clear_forces();
        assert_eq!(body.pending_acceleration(), Vec3::ZERO);
    }

    #[test]
    fn test_acceleration_is_queued_until_integrate() {
        let mut body = PointMassBody::new(Vec3::ZERO, Vec3::ZERO);
        body.add_acceleration(Vec3::Y * 6.0);
        body.add_acceleration(Vec3::Y * 4.0);
        assert_eq!(body.velocity(), Vec3::ZERO);

        body.integrate(0.5);
        assert_eq!(body.velocity(), Vec3::Y * 5.0);
        assert_eq!(body.pending_acceleration(), Vec3::ZERO);
    }
}
