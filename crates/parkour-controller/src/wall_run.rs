//! Wall-run activation and forces

use glam::{Vec2, Vec3};
use parkour_core::{CharacterBody, Heading};
use tracing::debug;

use crate::config::WallRunConfig;
use crate::movement::horizontal;
use crate::wall_detection::{WallContact, WallSide};

/// Per-tick conditions wall-running depends on
#[derive(Debug, Clone, Copy)]
pub struct WallRunContext {
    pub grounded: bool,
    pub sliding: bool,
    pub move_axis: Vec2,
    pub velocity: Vec3,
    pub heading: Heading,
}

#[derive(Debug, Clone)]
pub struct WallRunModule {
    config: WallRunConfig,
    /// Wall currently run along, refreshed from contacts every tick
    active: Option<WallContact>,
}

impl WallRunModule {
    pub fn new(config: WallRunConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Strong forward input relative to the input magnitude
    fn is_moving_forward(&self, move_axis: Vec2) -> bool {
        move_axis.normalize_or_zero().y > self.config.forward_input_threshold
    }

    /// Horizontal velocity pointing along the facing direction
    fn is_velocity_forward(&self, velocity: Vec3, heading: Heading) -> bool {
        horizontal(velocity).normalize_or_zero().dot(heading.forward())
            > self.config.forward_velocity_threshold
    }

    /// Re-evaluate wall-running for this tick.
    ///
    /// Returns the side when a wall-run starts (or switches sides).
    pub fn evaluate(&mut self, wall: Option<WallContact>, context: WallRunContext) -> Option<WallSide> {
        let previous = self.active.map(|wall| wall.side);

        let qualifies = !context.grounded
            && !context.sliding
            && self.is_moving_forward(context.move_axis)
            && self.is_velocity_forward(context.velocity, context.heading);

        self.active = wall.filter(|_| qualifies);

        match (previous, self.side()) {
            (previous, Some(side)) if previous != Some(side) => {
                debug!("Started wall-run on the {:?}", side);
                Some(side)
            }
            (Some(side), None) => {
                debug!("Stopped wall-run on the {:?}", side);
                None
            }
            _ => None,
        }
    }

    /// Stick to the wall and hold the minimum run speed
    pub fn apply_forces(&self, body: &mut impl CharacterBody, heading: Heading) {
        let Some(wall) = self.active else {
            return;
        };

        body.add_acceleration(-wall.normal * self.config.stick_force);

        let velocity = body.velocity();
        if velocity.length() < self.config.minimum_speed {
            let along_wall = heading.forward().reject_from(wall.normal).normalize_or_zero();
            body.set_velocity(along_wall * self.config.minimum_speed + Vec3::Y * velocity.y);
        }
    }

    /// Whether a wall was accepted this tick
    pub fn is_wall_running(&self) -> bool {
        self.active.is_some()
    }

    /// Side of the wall being run along, if any
    pub fn side(&self) -> Option<WallSide> {
        self.active.map(|wall| wall.side)
    }

    /// The wall being run along, as detected this tick.
    ///
    /// The wall jump reads its normal and surface from here.
    pub fn active_wall(&self) -> Option<WallContact> {
        self.active
    }

    /// Drop the current wall without waiting for contact loss
    pub fn clear(&mut self) {
        self.active = None;
    }
}
