//! Ledge detection and scripted mantle traversal
//!
//! A mantle is not simulated. Once a ledge is detected the collider is
//! switched off and the body is moved along a straight line from its start
//! to a point over the ledge, one fixed step at a time.

use glam::{Vec2, Vec3};
use parkour_core::{CharacterBody, Heading};
use tracing::debug;

use crate::config::MantleConfig;
use crate::wall_detection::FrontWall;

/// An in-progress mantle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traversal {
    pub start: Vec3,
    pub end: Vec3,
    pub elapsed: f32,
    pub duration: f32,
    /// Velocity handed back to the body on completion
    pub exit_velocity: Vec3,
}

impl Traversal {
    /// Completed fraction in `[0, 1]`
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Whether the full duration has elapsed
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Interpolated position at the current progress
    pub fn position(&self) -> Vec3 {
        self.start.lerp(self.end, self.progress())
    }
}

/// Conditions under which a ledge may be grabbed
#[derive(Debug, Clone, Copy)]
pub struct MantleContext {
    pub grounded: bool,
    pub sliding: bool,
    pub move_axis: Vec2,
    /// World height of the capsule center
    pub center_height: f32,
}

#[derive(Debug, Clone)]
pub struct MantleModule {
    config: MantleConfig,
    exit_speed: f32,
    traversal: Option<Traversal>,
}

impl MantleModule {
    /// `default_exit_speed` applies when the config leaves the exit speed unset
    pub fn new(config: MantleConfig, default_exit_speed: f32) -> Self {
        let exit_speed = config.exit_speed.unwrap_or(default_exit_speed);
        Self {
            config,
            exit_speed,
            traversal: None,
        }
    }

    /// Height above the feet separating the wall and ledge contacts
    pub fn detection_threshold(&self) -> f32 {
        self.config.detection_threshold
    }

    /// Whether the front-wall contacts form a grabbable ledge
    pub fn detect(&self, front: &FrontWall, context: MantleContext) -> bool {
        let reference = context.center_height + self.config.reference_offset;
        !context.grounded && !context.sliding && context.move_axis.y > 0.0 && front.is_ledge(reference)
    }

    /// Start a mantle from the body's current position.
    ///
    /// Returns false, leaving the running traversal untouched, when already
    /// mantling.
    pub fn begin(&mut self, body: &mut impl CharacterBody, heading: Heading) -> bool {
        if self.traversal.is_some() {
            return false;
        }

        let start = body.position();
        let end = start
            + heading.forward() * self.config.forward_offset
            + Vec3::Y * self.config.vertical_offset;

        self.traversal = Some(Traversal {
            start,
            end,
            elapsed: 0.0,
            duration: self.config.duration,
            exit_velocity: heading.forward() * self.exit_speed,
        });

        body.set_collider_enabled(false);
        body.set_velocity(Vec3::ZERO);

        debug!("Mantle from {:?} to {:?}", start, end);
        true
    }

    /// Advance the traversal by one tick.
    ///
    /// Returns true on the tick the mantle completes.
    pub fn advance(&mut self, body: &mut impl CharacterBody, dt: f32) -> bool {
        let Some(traversal) = self.traversal.as_mut() else {
            return false;
        };

        traversal.elapsed += dt;

        if traversal.is_complete() {
            body.set_position(traversal.end);
            body.set_velocity(traversal.exit_velocity);
            body.set_collider_enabled(true);
            self.traversal = None;
            debug!("Mantle finished");
            return true;
        }

        body.set_position(traversal.position());
        body.set_velocity(Vec3::ZERO);
        false
    }

    /// Abort a traversal without reaching the ledge
    pub fn cancel(&mut self, body: &mut impl CharacterBody) {
        if self.traversal.take().is_some() {
            body.set_collider_enabled(true);
        }
    }

    /// Whether a traversal is in progress
    pub fn is_mantling(&self) -> bool {
        self.traversal.is_some()
    }

    /// The traversal in progress
    pub fn traversal(&self) -> Option<&Traversal> {
        self.traversal.as_ref()
    }

    /// Progress of the current mantle, 0 when not mantling
    pub fn progress(&self) -> f32 {
        self.traversal.map_or(0.0, |traversal| traversal.progress())
    }
}
