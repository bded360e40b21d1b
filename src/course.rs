//! The obstacle course and the bodies that can run it

use anyhow::{Context, Result};
use glam::Vec3;
use parkour_controller::{CharacterController, ControllerEvent};
use parkour_core::{CharacterBody, ContactSample, PointMassBody, SurfaceId};
use parkour_physics::{surface_id, CharacterHandle, PhysicsWorld};
use tracing::{debug, info};

use crate::settings::RunnerSettings;

/// Where the character starts, feet on the ground
pub const SPAWN: Vec3 = Vec3::ZERO;

/// Launch pad throw: 6 m/s along -Z, 4 m apex
const PAD_LAUNCH: Vec3 = Vec3::new(0.0, 4.0, -6.0);

/// A body plus the world it moves in, advanced one fixed step at a time
pub trait Course {
    /// Short name for log lines
    fn name(&self) -> &'static str;

    /// Run the controller on its accumulated input for one step, then
    /// advance the world
    fn step(&mut self, controller: &mut CharacterController, dt: f32)
        -> Result<Vec<ControllerEvent>>;

    /// Current feet position of the character
    fn position(&self) -> Vec3;
}

/// Full rapier course: ground, two wall-run walls, a launch pad and a ledge
pub struct RapierCourse {
    physics: PhysicsWorld,
    character: CharacterHandle,
    contacts: Vec<ContactSample>,
}

impl RapierCourse {
    /// Build the course and register its pad and spawn point
    pub fn build(settings: &RunnerSettings, controller: &mut CharacterController) -> Self {
        let mut physics = PhysicsWorld::with_config(settings.physics.clone());

        physics.create_ground(0.0);
        // Left wall along the first straight, right wall after it
        physics.create_wall(-1.6, -8.0, -26.0, 6.0);
        physics.create_wall(3.0, -30.0, -44.0, 6.0);

        let pad = physics.create_static_box(Vec3::new(1.5, 0.05, 1.5), Vec3::new(0.0, 0.05, -60.0));
        controller.register_launch_pad(surface_id(pad), PAD_LAUNCH);

        // Chest-high block to mantle onto
        physics.create_static_box(Vec3::new(3.0, 0.9, 2.0), Vec3::new(0.0, 0.9, -80.0));

        let character = CharacterHandle::spawn(&mut physics, &settings.body, SPAWN);
        controller.set_checkpoint(SPAWN + Vec3::Y);
        info!("Built rapier course with {} colliders", physics.collider_count());

        Self {
            physics,
            character,
            contacts: Vec::new(),
        }
    }
}

impl Course for RapierCourse {
    fn name(&self) -> &'static str {
        "rapier"
    }

    fn step(&mut self, controller: &mut CharacterController, dt: f32) -> Result<Vec<ControllerEvent>> {
        let events = {
            let mut body = self
                .character
                .view(&mut self.physics)
                .context("Character body missing from the physics world")?;
            controller.tick(&mut body, &self.contacts, 0.0, dt)
        };

        self.character
            .step(&mut self.physics)
            .context("Character body missing from the physics world")?;
        self.contacts = self.character.contacts(&self.physics);
        Ok(events)
    }

    fn position(&self) -> Vec3 {
        self.character.position(&self.physics).unwrap_or(SPAWN)
    }
}

/// A point mass over an endless flat floor at y = 0
pub struct PointMassCourse {
    body: PointMassBody,
}

impl PointMassCourse {
    const FLOOR: SurfaceId = SurfaceId(0);

    pub fn build(settings: &RunnerSettings, controller: &mut CharacterController) -> Self {
        let body = PointMassBody::new(SPAWN, settings.physics.gravity).with_collider(settings.body.capsule);
        controller.set_checkpoint(SPAWN);
        debug!("Built flat point-mass course");
        Self { body }
    }

    fn contacts(&self) -> Vec<ContactSample> {
        if self.body.position.y <= 0.0 {
            vec![ContactSample::new(self.body.position, Vec3::Y, Self::FLOOR)]
        } else {
            Vec::new()
        }
    }
}

impl Course for PointMassCourse {
    fn name(&self) -> &'static str {
        "point-mass"
    }

    fn step(&mut self, controller: &mut CharacterController, dt: f32) -> Result<Vec<ControllerEvent>> {
        let contacts = self.contacts();
        let events = controller.tick(&mut self.body, &contacts, 0.0, dt);

        self.body.integrate(dt);
        // The floor is solid
        if self.body.position.y < 0.0 {
            self.body.position.y = 0.0;
            self.body.velocity.y = self.body.velocity.y.max(0.0);
        }
        Ok(events)
    }

    fn position(&self) -> Vec3 {
        self.body.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkour_controller::ControllerConfig;

    #[test]
    fn test_point_mass_course_stands_still() {
        let settings = RunnerSettings::default();
        let mut controller = CharacterController::new(ControllerConfig::default()).expect("valid");
        let mut course = PointMassCourse::build(&settings, &mut controller);

        let events = course
            .step(&mut controller, 1.0 / 60.0)
            .expect("step");
        assert_eq!(events, vec![ControllerEvent::Landed]);

        for _ in 0..30 {
            course
                .step(&mut controller, 1.0 / 60.0)
                .expect("step");
        }
        assert_eq!(course.position(), SPAWN);
        assert!(controller.is_grounded());
    }

    #[test]
    fn test_rapier_course_holds_the_character_up() {
        let settings = RunnerSettings::default();
        let mut controller = CharacterController::new(ControllerConfig::default()).expect("valid");
        let mut course = RapierCourse::build(&settings, &mut controller);

        for _ in 0..60 {
            course
                .step(&mut controller, 1.0 / 60.0)
                .expect("step");
        }
        let position = course.position();
        assert!(position.y > -0.5 && position.y < 0.5);
        assert!(position.x.abs() < 0.1 && position.z.abs() < 0.1);
    }
}
