//! Core types used throughout the parkour workspace

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Opaque identity of a collidable surface (a wall, a floor, a pad).
///
/// Only compared for equality; the physics backend decides how to mint them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// One contact point from the physics engine's manifold for the current step.
///
/// `normal` points away from the touched surface, towards the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    pub point: Vec3,
    pub normal: Vec3,
    pub surface: SurfaceId,
}

impl ContactSample {
    pub fn new(point: Vec3, normal: Vec3, surface: SurfaceId) -> Self {
        Self {
            point,
            normal,
            surface,
        }
    }

    /// Angle between the contact normal and world up, in degrees
    pub fn slope_angle(&self) -> f32 {
        self.normal.angle_between(Vec3::Y).to_degrees()
    }
}

/// Yaw-only orientation of the character, driven by the camera.
///
/// Yaw 0 faces -Z; positive yaw turns toward +X.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Heading {
    yaw_degrees: f32,
}

impl Heading {
    /// Heading from a camera yaw in degrees, 0 facing -Z
    pub fn from_yaw_degrees(yaw_degrees: f32) -> Self {
        Self { yaw_degrees }
    }

    /// Yaw in degrees
    pub fn yaw_degrees(&self) -> f32 {
        self.yaw_degrees
    }

    /// The rotation about world up this heading represents
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw_degrees.to_radians())
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation() * -Vec3::Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Get the up direction (always world up, pitch and roll are ignored)
    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }
}

/// Upright capsule collider, positioned relative to the body pivot at the feet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleShape {
    /// Total height including both hemispheres
    pub height: f32,
    /// Hemisphere radius
    pub radius: f32,
    /// Local offset of the capsule center from the body pivot
    pub center: Vec3,
}

impl Default for CapsuleShape {
    fn default() -> Self {
        Self {
            height: 2.0,
            radius: 0.5,
            center: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl CapsuleShape {
    /// Half the length of the cylindrical section, as physics engines expect
    pub fn half_segment(&self) -> f32 {
        ((self.height - 2.0 * self.radius) / 2.0).max(0.01)
    }

    /// World-space center of the capsule for a body at `position`
    pub fn world_center(&self, position: Vec3) -> Vec3 {
        position + self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_basis() {
        let heading = Heading::from_yaw_degrees(0.0);
        assert!((heading.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((heading.right() - Vec3::X).length() < 1e-6);

        let heading = Heading::from_yaw_degrees(90.0);
        assert!((heading.forward() - Vec3::X).length() < 1e-5);
        assert!((heading.right() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_heading_right_handed() {
        let heading = Heading::from_yaw_degrees(37.0);
        let cross = heading.forward().cross(heading.up());
        assert!((cross - heading.right()).length() < 1e-5);
    }

    #[test]
    fn test_slope_angle() {
        let flat = ContactSample::new(Vec3::ZERO, Vec3::Y, SurfaceId(1));
        assert!(flat.slope_angle().abs() < 1e-3);

        let wall = ContactSample::new(Vec3::ZERO, Vec3::X, SurfaceId(1));
        assert!((wall.slope_angle() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_capsule_half_segment() {
        let capsule = CapsuleShape::default();
        assert!((capsule.half_segment() - 0.5).abs() < 1e-6);
        assert_eq!(capsule.world_center(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(1.0, 1.0, 0.0));
    }
}
