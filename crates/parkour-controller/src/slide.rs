//! Crouch-slide state, collider morph and slide movement
//!
//! Entering a slide swaps the collider for a shorter capsule and lowers the
//! camera anchor target. The anchor itself follows its target with an
//! exponential lerp every tick, so the view eases down instead of snapping.

use glam::{Vec2, Vec3};
use parkour_core::{CapsuleShape, CharacterBody, Heading};
use tracing::debug;

use crate::config::SlideConfig;
use crate::movement::{input_direction, velocity_error};

/// Speed below which a slide with input does not accelerate
const SLIDE_START_SPEED: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideTransition {
    Started,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct SlideModule {
    config: SlideConfig,
    sliding: bool,
    /// Collider to restore when the slide ends
    standing_collider: Option<CapsuleShape>,
    camera_anchor: Vec3,
}

impl SlideModule {
    pub fn new(config: SlideConfig) -> Self {
        let camera_anchor = config.standing_camera_anchor;
        Self {
            config,
            sliding: false,
            standing_collider: None,
            camera_anchor,
        }
    }

    /// Follow the slide button and ease the camera anchor
    pub fn update(
        &mut self,
        body: &mut impl CharacterBody,
        slide_held: bool,
        dt: f32,
    ) -> Option<SlideTransition> {
        let transition = match (self.sliding, slide_held) {
            (false, true) => {
                self.start(body);
                Some(SlideTransition::Started)
            }
            (true, false) => {
                self.stop(body);
                Some(SlideTransition::Stopped)
            }
            _ => None,
        };

        self.ease_camera(dt);
        transition
    }

    fn start(&mut self, body: &mut impl CharacterBody) {
        let standing = body.collider();
        self.standing_collider = Some(standing);

        body.set_collider(CapsuleShape {
            height: self.config.collider_height,
            radius: standing.radius.min(self.config.collider_height / 2.0),
            center: self.config.collider_center,
        });
        self.sliding = true;
        debug!("Started sliding");
    }

    fn stop(&mut self, body: &mut impl CharacterBody) {
        if let Some(standing) = self.standing_collider.take() {
            body.set_collider(standing);
        }
        self.sliding = false;
        debug!("Stopped sliding");
    }

    /// End the slide immediately, restoring the standing collider
    pub fn cancel(&mut self, body: &mut impl CharacterBody) {
        if self.sliding {
            self.stop(body);
        }
        self.camera_anchor = self.config.standing_camera_anchor;
    }

    /// Move the camera anchor towards its target
    pub fn ease_camera(&mut self, dt: f32) {
        let t = (dt * self.config.camera_lerp_speed).min(1.0);
        self.camera_anchor = self.camera_anchor.lerp(self.camera_target(), t);
    }

    fn camera_target(&self) -> Vec3 {
        if self.sliding {
            self.config.sliding_camera_anchor
        } else {
            self.config.standing_camera_anchor
        }
    }

    /// Slide movement, only on flat ground.
    ///
    /// Above the stop speed the slide force model applies; below it the
    /// body comes to a hard stop so it never creeps.
    pub fn apply_movement(
        &self,
        body: &mut impl CharacterBody,
        heading: Heading,
        move_axis: Vec2,
        grounded: bool,
        flat_ground: bool,
    ) {
        if !grounded || !flat_ground {
            return;
        }

        let velocity = body.velocity();
        let speed = velocity.length();
        let direction = input_direction(heading, move_axis);

        let mut force = velocity_error(direction, velocity, self.config.top_speed);
        if direction == Vec3::ZERO {
            force *= self.config.deceleration;
        } else if speed > SLIDE_START_SPEED {
            force *= self.config.acceleration;
        }

        if speed > self.config.stop_speed {
            if force.is_finite() {
                body.add_acceleration(force);
            }
        } else {
            body.set_velocity(Vec3::ZERO);
        }
    }

    /// Whether the slide is engaged
    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    /// Current camera anchor local offset
    pub fn camera_anchor(&self) -> Vec3 {
        self.camera_anchor
    }
}
