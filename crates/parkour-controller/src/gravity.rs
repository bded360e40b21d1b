//! Mode-dependent custom gravity
//!
//! The body never receives engine gravity. Each tick the controller picks a
//! scale for the active mode and applies `world_gravity * scale` as an
//! acceleration.

use glam::Vec3;
use parkour_core::CharacterBody;

use crate::config::ControllerConfig;

/// Mode flags gravity depends on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GravityContext {
    pub grounded: bool,
    pub sliding: bool,
    pub wall_running: bool,
    pub vertical_velocity: f32,
}

#[derive(Debug, Clone)]
pub struct GravityModule {
    default_scale: f32,
    slide_scale: f32,
    wall_run_ascending: f32,
    wall_run_descending: f32,
}

impl GravityModule {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            default_scale: config.gravity.default_scale,
            slide_scale: config.slide.gravity_scale,
            wall_run_ascending: config.wall_run.ascending_gravity,
            wall_run_descending: config.wall_run.descending_gravity,
        }
    }

    /// Scale for the current mode, or `None` when no gravity applies
    pub fn scale(&self, context: GravityContext) -> Option<f32> {
        if context.sliding {
            Some(self.slide_scale)
        } else if context.wall_running {
            if context.vertical_velocity >= 0.0 {
                Some(self.wall_run_ascending)
            } else {
                Some(self.wall_run_descending)
            }
        } else if context.grounded {
            None
        } else {
            Some(self.default_scale)
        }
    }

    /// Apply this tick's gravity to the body
    pub fn apply(&self, body: &mut impl CharacterBody, context: GravityContext) {
        if let Some(scale) = self.scale(context) {
            let gravity = body.gravity();
            body.add_acceleration(gravity * scale);
        }
    }

    /// Scale used to resolve jump heights into launch speeds
    pub fn default_scale(&self) -> f32 {
        self.default_scale
    }
}

/// Launch speed that reaches `height` under `|gravity| * scale`
pub fn launch_speed(gravity: Vec3, scale: f32, height: f32) -> f32 {
    (2.0 * gravity.length() * scale * height).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkour_core::PointMassBody;

    const EARTH: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    #[test]
    fn test_launch_speed_matches_reference() {
        let speed = launch_speed(EARTH, 1.5, 2.0);
        assert!((speed - 7.672).abs() < 1e-3);
        assert_eq!(launch_speed(EARTH, 1.5, 0.0), 0.0);
    }

    #[test]
    fn test_mode_scales() {
        let gravity = GravityModule::new(&ControllerConfig::default());

        assert_eq!(
            gravity.scale(GravityContext {
                grounded: true,
                ..Default::default()
            }),
            None
        );
        assert_eq!(gravity.scale(GravityContext::default()), Some(1.5));
        assert_eq!(
            gravity.scale(GravityContext {
                sliding: true,
                grounded: true,
                ..Default::default()
            }),
            Some(2.0)
        );
        assert_eq!(
            gravity.scale(GravityContext {
                wall_running: true,
                vertical_velocity: 1.0,
                ..Default::default()
            }),
            Some(1.25)
        );
        assert_eq!(
            gravity.scale(GravityContext {
                wall_running: true,
                vertical_velocity: -1.0,
                ..Default::default()
            }),
            Some(0.75)
        );
    }

    #[test]
    fn test_apply_adds_scaled_gravity() {
        let gravity = GravityModule::new(&ControllerConfig::default());
        let mut body = PointMassBody::new(Vec3::ZERO, EARTH);

        gravity.apply(&mut body, GravityContext::default());
        assert!((body.pending_acceleration().y + 9.81 * 1.5).abs() < 1e-5);
    }
}
