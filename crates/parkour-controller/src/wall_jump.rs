//! Wall jumps with a same-wall cooldown

use glam::Vec3;
use parkour_core::{CharacterBody, Countdown, Heading, SurfaceId};
use tracing::debug;

use crate::config::WallJumpConfig;
use crate::gravity::launch_speed;
use crate::wall_detection::{WallContact, WallSide};

#[derive(Debug, Clone)]
pub struct WallJumpModule {
    config: WallJumpConfig,
    last_wall: Option<SurfaceId>,
    cooldown: Countdown,
}

impl WallJumpModule {
    pub fn new(config: WallJumpConfig) -> Self {
        Self {
            config,
            last_wall: None,
            cooldown: Countdown::new(),
        }
    }

    /// A different wall is always allowed; the same one only after the cooldown
    pub fn can_jump_off(&self, surface: SurfaceId) -> bool {
        self.last_wall != Some(surface) || !self.cooldown.is_active()
    }

    /// Push off `wall` if allowed, returning the side jumped from
    pub fn try_execute(
        &mut self,
        body: &mut impl CharacterBody,
        wall: WallContact,
        heading: Heading,
        gravity_scale: f32,
    ) -> Option<WallSide> {
        if !self.can_jump_off(wall.surface) {
            debug!("Wall jump blocked by same-wall cooldown");
            return None;
        }

        self.last_wall = Some(wall.surface);
        self.cooldown.reset(self.config.same_wall_cooldown);

        let push = wall.normal * self.config.side_force
            + Vec3::Y * launch_speed(body.gravity(), gravity_scale, self.config.jump_height)
            + heading.forward() * self.config.forward_force;

        let velocity = body.velocity();
        body.set_velocity(Vec3::new(velocity.x, 0.0, velocity.z));
        body.add_velocity_change(push);

        debug!("Wall jump off the {:?} wall", wall.side);
        Some(wall.side)
    }

    /// Grounding forgets the last wall entirely
    pub fn on_grounded(&mut self) {
        self.last_wall = None;
        self.cooldown.cancel();
    }

    /// Count down the same-wall cooldown
    pub fn tick(&mut self, dt: f32) {
        self.cooldown.tick(dt);
    }

    /// Surface of the most recent wall jump, until grounded
    pub fn last_wall(&self) -> Option<SurfaceId> {
        self.last_wall
    }

    /// Seconds before `last_wall` may be jumped off again
    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }

    /// Forget the last wall and its cooldown
    pub fn reset(&mut self) {
        self.on_grounded();
    }
}
