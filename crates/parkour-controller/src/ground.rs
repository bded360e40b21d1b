//! Slope-filtered ground contact tracking

use glam::Vec3;
use parkour_core::ContactSample;
use tracing::debug;

use crate::config::GroundConfig;

/// Grounded transition observed during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundTransition {
    /// Ground contact regained this tick
    Landed,
    /// Last qualifying contact lost this tick
    LeftGround,
}

/// Tracks whether the character stands on walkable ground
#[derive(Debug, Clone)]
pub struct GroundTracker {
    config: GroundConfig,
    grounded: bool,
    ground_normal: Vec3,
}

impl GroundTracker {
    pub fn new(config: GroundConfig) -> Self {
        Self {
            config,
            grounded: false,
            ground_normal: Vec3::Y,
        }
    }

    /// Re-evaluate grounded from this tick's contacts
    pub fn update(&mut self, contacts: &[ContactSample]) -> Option<GroundTransition> {
        let was_grounded = self.grounded;

        // First walkable contact wins
        let ground = contacts
            .iter()
            .find(|contact| contact.slope_angle() <= self.config.slope_limit);

        self.grounded = ground.is_some();
        if let Some(contact) = ground {
            self.ground_normal = contact.normal;
        }

        match (was_grounded, self.grounded) {
            (false, true) => {
                debug!("Landed on slope of {:.1} deg", self.slope_angle());
                Some(GroundTransition::Landed)
            }
            (true, false) => {
                debug!("Left ground");
                Some(GroundTransition::LeftGround)
            }
            _ => None,
        }
    }

    /// Grounded as of the last update
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Normal of the last walkable contact
    pub fn ground_normal(&self) -> Vec3 {
        self.ground_normal
    }

    /// Whether the current ground is level
    pub fn is_flat(&self) -> bool {
        self.ground_normal.dot(Vec3::Y) > 0.9999
    }

    fn slope_angle(&self) -> f32 {
        self.ground_normal.angle_between(Vec3::Y).to_degrees()
    }

    /// Forget all ground state
    pub fn reset(&mut self) {
        self.grounded = false;
        self.ground_normal = Vec3::Y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkour_core::SurfaceId;

    fn contact(normal: Vec3) -> ContactSample {
        ContactSample::new(Vec3::ZERO, normal.normalize(), SurfaceId(1))
    }

    #[test]
    fn test_landed_fires_once() {
        let mut tracker = GroundTracker::new(GroundConfig::default());
        let floor = [contact(Vec3::Y), contact(Vec3::Y)];

        assert_eq!(tracker.update(&floor), Some(GroundTransition::Landed));
        assert!(tracker.is_grounded());
        assert_eq!(tracker.update(&floor), None);
        assert_eq!(tracker.update(&[]), Some(GroundTransition::LeftGround));
        assert!(!tracker.is_grounded());
    }

    #[test]
    fn test_steep_contacts_are_not_ground() {
        let mut tracker = GroundTracker::new(GroundConfig::default());
        let steep = [contact(Vec3::new(1.0, 0.5, 0.0)), contact(Vec3::X)];

        assert_eq!(tracker.update(&steep), None);
        assert!(!tracker.is_grounded());
    }

    #[test]
    fn test_slope_at_limit_is_ground() {
        let mut tracker = GroundTracker::new(GroundConfig::default());
        // 44 degrees off vertical
        let angle = 44.0_f32.to_radians();
        let slope = contact(Vec3::new(angle.sin(), angle.cos(), 0.0));

        tracker.update(&[slope]);
        assert!(tracker.is_grounded());
        assert!(!tracker.is_flat());
        assert!((tracker.ground_normal() - slope.normal).length() < 1e-6);
    }

    #[test]
    fn test_first_qualifying_contact_sets_normal() {
        let mut tracker = GroundTracker::new(GroundConfig::default());
        let angle = 20.0_f32.to_radians();
        let tilted = contact(Vec3::new(0.0, angle.cos(), angle.sin()));

        tracker.update(&[contact(Vec3::X), tilted, contact(Vec3::Y)]);
        assert!((tracker.ground_normal() - tilted.normal).length() < 1e-6);
    }
}
