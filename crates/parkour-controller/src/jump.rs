//! Ground jump with input buffering and coyote time
//!
//! A request opens the buffer window. The jump executes on the first tick
//! where the buffer is open and the character is either grounded or still
//! inside the coyote window after leaving the ground. Both windows close on
//! execution, so one press can never produce two jumps.

use glam::Vec3;
use parkour_core::{CharacterBody, Countdown};
use tracing::debug;

use crate::config::JumpConfig;
use crate::gravity::launch_speed;

#[derive(Debug, Clone)]
pub struct JumpModule {
    config: JumpConfig,
    buffer: Countdown,
    coyote: Countdown,
}

impl JumpModule {
    pub fn new(config: JumpConfig) -> Self {
        Self {
            config,
            buffer: Countdown::new(),
            coyote: Countdown::new(),
        }
    }

    /// Open the buffer window for a fresh request
    pub fn buffer_request(&mut self) {
        self.buffer.reset(self.config.jump_buffer_time);
    }

    /// Hold the coyote window open while standing on the ground
    pub fn refresh(&mut self, grounded: bool) {
        if grounded {
            self.coyote.reset(self.config.coyote_time);
        }
    }

    /// Whether a buffered request would execute this tick
    pub fn can_jump(&self, grounded: bool) -> bool {
        self.buffer.is_active() && (grounded || self.coyote.is_active())
    }

    /// Execute a buffered jump if the character may jump.
    ///
    /// Returns true when the jump executed.
    pub fn try_execute(
        &mut self,
        body: &mut impl CharacterBody,
        grounded: bool,
        gravity_scale: f32,
    ) -> bool {
        if !self.can_jump(grounded) {
            return false;
        }

        let speed = launch_speed(body.gravity(), gravity_scale, self.config.jump_height);
        let velocity = body.velocity();
        body.set_velocity(Vec3::new(velocity.x, speed, velocity.z));

        self.buffer.cancel();
        self.coyote.cancel();

        debug!("Jumped with launch speed {:.2}", speed);
        true
    }

    /// Close the coyote window after a launch from another source (wall
    /// jump, launch pad) so the leftover grace cannot add a ground jump
    pub fn cancel_coyote(&mut self) {
        self.coyote.cancel();
    }

    /// Advance the windows by one tick
    pub fn tick(&mut self, dt: f32, grounded: bool) {
        self.buffer.tick(dt);
        if !grounded {
            self.coyote.tick(dt);
        }
    }

    /// Whether a request is waiting in the buffer window
    pub fn is_buffered(&self) -> bool {
        self.buffer.is_active()
    }

    /// Seconds left in the coyote window
    pub fn coyote_remaining(&self) -> f32 {
        self.coyote.remaining()
    }

    /// Apex height of a ground jump
    pub fn jump_height(&self) -> f32 {
        self.config.jump_height
    }

    /// Drop any buffered press and close the coyote window
    pub fn reset(&mut self) {
        self.buffer.cancel();
        self.coyote.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkour_core::PointMassBody;

    const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    /// Integrate free fall under scaled gravity and return the peak height
    fn apex_after_jump(jump_height: f32, scale: f32) -> f32 {
        let mut jump = JumpModule::new(JumpConfig {
            jump_height,
            ..JumpConfig::default()
        });
        let mut body = PointMassBody::new(Vec3::ZERO, GRAVITY);
        body.velocity = Vec3::new(0.0, -2.0, 0.0);

        jump.refresh(true);
        jump.buffer_request();
        assert!(jump.try_execute(&mut body, true, scale));

        let dt = 1.0 / 60.0;
        let mut apex = 0.0_f32;
        while body.velocity.y > 0.0 {
            body.add_acceleration(GRAVITY * scale);
            body.integrate(dt);
            apex = apex.max(body.position.y);
        }
        apex
    }

    #[test]
    fn test_apex_matches_jump_height() {
        for &(height, scale) in &[(2.0, 1.5), (0.5, 1.0), (3.0, 2.5), (1.2, 0.4)] {
            let apex = apex_after_jump(height, scale);
            // Sampling at 60 Hz misses the true peak by at most g*dt^2/8
            assert!((apex - height).abs() < 0.02, "h={height} s={scale} apex={apex}");
        }
    }

    #[test]
    fn test_vertical_velocity_replaced() {
        let mut jump = JumpModule::new(JumpConfig::default());
        let mut body = PointMassBody::new(Vec3::ZERO, GRAVITY);
        body.velocity = Vec3::new(3.0, -12.0, 1.0);

        jump.refresh(true);
        jump.buffer_request();
        assert!(jump.try_execute(&mut body, true, 1.5));
        assert_eq!(body.velocity.x, 3.0);
        assert_eq!(body.velocity.z, 1.0);
        assert!((body.velocity.y - 7.672).abs() < 1e-3);
    }

    #[test]
    fn test_single_press_single_jump() {
        let mut jump = JumpModule::new(JumpConfig::default());
        let mut body = PointMassBody::new(Vec3::ZERO, GRAVITY);

        jump.refresh(true);
        jump.buffer_request();
        assert!(jump.try_execute(&mut body, true, 1.5));

        // Still touching the ground on the way up
        for _ in 0..5 {
            jump.refresh(true);
            assert!(!jump.try_execute(&mut body, true, 1.5));
            jump.tick(1.0 / 60.0, true);
        }
    }

    #[test]
    fn test_grounded_jump_ignores_vertical_speed() {
        let mut jump = JumpModule::new(JumpConfig::default());
        let mut body = PointMassBody::new(Vec3::ZERO, GRAVITY);

        jump.refresh(true);
        jump.buffer_request();
        assert!(jump.try_execute(&mut body, true, 1.5));

        // Landing again while running up a ramp keeps rising speed
        jump.refresh(false);
        jump.tick(0.5, false);
        body.velocity = Vec3::new(0.0, 4.0, -6.9);
        jump.refresh(true);
        jump.buffer_request();
        assert!(jump.try_execute(&mut body, true, 1.5));
    }

    #[test]
    fn test_cancel_coyote_closes_window() {
        let mut jump = JumpModule::new(JumpConfig::default());
        jump.refresh(true);
        jump.tick(1.0 / 60.0, false);
        jump.cancel_coyote();

        jump.buffer_request();
        assert!(!jump.can_jump(false));
        assert!(jump.can_jump(true));
    }

    #[test]
    fn test_request_expires() {
        let mut jump = JumpModule::new(JumpConfig::default());
        jump.buffer_request();
        for _ in 0..12 {
            jump.tick(1.0 / 60.0, false);
        }
        assert!(!jump.is_buffered());
    }

    #[test]
    fn test_coyote_counts_down_only_airborne() {
        let mut jump = JumpModule::new(JumpConfig::default());
        jump.refresh(true);
        jump.tick(0.1, true);
        assert!((jump.coyote_remaining() - 0.15).abs() < 1e-6);

        jump.refresh(false);
        jump.tick(0.1, false);
        assert!((jump.coyote_remaining() - 0.05).abs() < 1e-6);
        jump.tick(0.1, false);
        assert_eq!(jump.coyote_remaining(), 0.0);
    }
}
