//! Wall climbing: a one-off vertical boost when running up a wall head-on

use glam::{Vec2, Vec3};
use parkour_core::CharacterBody;
use tracing::debug;

use crate::config::WallClimbConfig;
use crate::wall_detection::FrontWall;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallClimbTransition {
    Started,
    Stopped,
}

/// Per-tick conditions for a wall climb
#[derive(Debug, Clone, Copy)]
pub struct WallClimbContext {
    pub grounded: bool,
    /// Sliding or otherwise unable to start a climb
    pub suspended: bool,
    pub move_axis: Vec2,
    /// World height of the capsule center
    pub center_height: f32,
    /// Gravity scale the climb boost is resolved against
    pub gravity_scale: f32,
    /// Apex height of a ground jump
    pub jump_height: f32,
}

#[derive(Debug, Clone)]
pub struct WallClimbModule {
    config: WallClimbConfig,
    climbing: bool,
    /// Only one climb per ascent
    climbed_since_descent: bool,
}

impl WallClimbModule {
    pub fn new(config: WallClimbConfig) -> Self {
        Self {
            config,
            climbing: false,
            climbed_since_descent: false,
        }
    }

    /// Height above the feet a front contact must reach to count as a climbable wall
    pub fn detection_threshold(&self) -> f32 {
        self.config.detection_threshold
    }

    /// Upward velocity change that lifts the reachable apex to the max climb height
    pub fn boost(&self, vertical_velocity: f32, gravity: f32, jump_height: f32) -> f32 {
        let current_air_height =
            (jump_height - vertical_velocity * vertical_velocity / (2.0 * gravity)).max(0.0);
        let difference = self.config.max_height - current_air_height;
        if difference <= 0.0 {
            return 0.0;
        }

        ((2.0 * gravity * difference).sqrt() - vertical_velocity).max(0.0)
    }

    pub fn update(
        &mut self,
        body: &mut impl CharacterBody,
        front: &FrontWall,
        context: WallClimbContext,
    ) -> Option<WallClimbTransition> {
        let vertical_velocity = body.velocity().y;
        if vertical_velocity < 0.0 {
            self.climbed_since_descent = false;
        }

        let min_height = context.center_height + self.config.band_min_offset;
        let touching = front.contacts().iter().any(|c| c.point.y >= min_height);

        if self.climbing {
            if vertical_velocity < 0.0 || !touching {
                self.climbing = false;
                debug!("Stopped wall climb");
                return Some(WallClimbTransition::Stopped);
            }
            return None;
        }

        let can_start = touching
            && !context.grounded
            && !context.suspended
            && !self.climbed_since_descent
            && context.move_axis.normalize_or_zero().y > self.config.forward_input_threshold
            && vertical_velocity > 0.0;
        if !can_start {
            return None;
        }

        let gravity = body.gravity().length() * context.gravity_scale;
        let boost = self.boost(vertical_velocity, gravity, context.jump_height);
        if boost <= 0.0 {
            return None;
        }

        body.add_velocity_change(Vec3::Y * boost);
        self.climbing = true;
        self.climbed_since_descent = true;
        debug!("Started wall climb with boost {:.2}", boost);
        Some(WallClimbTransition::Started)
    }

    /// End a climb early, reporting whether one was running
    pub fn stop(&mut self) -> bool {
        std::mem::take(&mut self.climbing)
    }

    /// Whether a climb started by the boost is still running
    pub fn is_climbing(&self) -> bool {
        self.climbing
    }

    /// Re-arm the boost
    pub fn reset(&mut self) {
        self.climbing = false;
        self.climbed_since_descent = false;
    }
}
