//! Rapier-backed dynamic character body

use glam::Vec3;
use nalgebra::{UnitQuaternion, Vector3};
use parkour_core::{CapsuleShape, CharacterBody, ContactSample, Heading};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PhysicsError, PhysicsWorld};

/// Character body configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterBodyConfig {
    /// Standing capsule dimensions
    pub capsule: CapsuleShape,
    /// Body mass in kilograms
    pub mass: f32,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            capsule: CapsuleShape::default(),
            mass: 70.0,
        }
    }
}

/// Handles to the character's rigid body and capsule collider
#[derive(Debug, Clone)]
pub struct CharacterHandle {
    /// The rigid body handle
    pub body: RigidBodyHandle,
    /// The collider handle for this character
    pub collider: ColliderHandle,
    /// Current capsule dimensions (mirrors the rapier shape)
    capsule: CapsuleShape,
    /// Acceleration queued by the controller for the coming step
    pending_acceleration: Vec3,
}

impl CharacterHandle {
    /// Spawn the character in the physics world with its feet at `position`
    pub fn spawn(physics: &mut PhysicsWorld, config: &CharacterBodyConfig, position: Vec3) -> Self {
        let capsule = config.capsule;

        // Rotation is driven by the camera, gravity by the controller
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .lock_rotations()
            .gravity_scale(0.0)
            .ccd_enabled(true)
            .build();

        let collider = ColliderBuilder::capsule_y(capsule.half_segment(), capsule.radius)
            .translation(vector![capsule.center.x, capsule.center.y, capsule.center.z])
            .mass(config.mass)
            .friction(0.0) // Smooth sliding against walls
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(0.0)
            .build();

        let (body, collider) = physics.insert_dynamic(rigid_body, collider);
        debug!("Spawned character body at {:?}", position);

        Self {
            body,
            collider,
            capsule,
            pending_acceleration: Vec3::ZERO,
        }
    }

    /// Borrow the body for one controller tick
    pub fn view<'a>(
        &'a mut self,
        physics: &'a mut PhysicsWorld,
    ) -> Result<RapierCharacterBody<'a>, PhysicsError> {
        if physics.rigid_body_set.get(self.body).is_none() {
            return Err(PhysicsError::MissingBody(self.body));
        }
        if physics.collider_set.get(self.collider).is_none() {
            return Err(PhysicsError::MissingCollider(self.collider));
        }

        Ok(RapierCharacterBody {
            physics,
            body: self.body,
            collider: self.collider,
            capsule: &mut self.capsule,
            pending_acceleration: &mut self.pending_acceleration,
        })
    }

    /// Fold the queued acceleration into the body's velocity, then advance
    /// the world by one fixed step
    pub fn step(&mut self, physics: &mut PhysicsWorld) -> Result<(), PhysicsError> {
        let delta = self.pending_acceleration * physics.config.timestep;
        self.pending_acceleration = Vec3::ZERO;

        let body = physics
            .rigid_body_set
            .get_mut(self.body)
            .ok_or(PhysicsError::MissingBody(self.body))?;
        if delta != Vec3::ZERO {
            let velocity = *body.linvel() + vector![delta.x, delta.y, delta.z];
            body.set_linvel(velocity, true);
        }

        physics.step();
        Ok(())
    }

    /// Contacts touching the character after the last physics step
    pub fn contacts(&self, physics: &PhysicsWorld) -> Vec<ContactSample> {
        physics.contacts_for(self.collider)
    }

    /// Current body position, if the body is still in the world
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        physics.rigid_body_set.get(self.body).map(|rb| {
            let t = rb.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    /// Capsule dimensions as last set through the body view
    pub fn capsule(&self) -> CapsuleShape {
        self.capsule
    }
}

/// A validated mutable view of the character body inside the physics world
pub struct RapierCharacterBody<'a> {
    physics: &'a mut PhysicsWorld,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    capsule: &'a mut CapsuleShape,
    pending_acceleration: &'a mut Vec3,
}

impl RapierCharacterBody<'_> {
    fn rigid_body(&self) -> &RigidBody {
        &self.physics.rigid_body_set[self.body]
    }

    fn rigid_body_mut(&mut self) -> &mut RigidBody {
        &mut self.physics.rigid_body_set[self.body]
    }
}

impl CharacterBody for RapierCharacterBody<'_> {
    fn position(&self) -> Vec3 {
        let t = self.rigid_body().translation();
        Vec3::new(t.x, t.y, t.z)
    }

    fn set_position(&mut self, position: Vec3) {
        self.rigid_body_mut()
            .set_translation(vector![position.x, position.y, position.z], true);
    }

    fn velocity(&self) -> Vec3 {
        let v = self.rigid_body().linvel();
        Vec3::new(v.x, v.y, v.z)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.rigid_body_mut()
            .set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
    }

    fn add_acceleration(&mut self, acceleration: Vec3) {
        // Held on the handle rather than as a rapier force, whose effect
        // would depend on mass properties the pipeline computes lazily
        *self.pending_acceleration += acceleration;
    }

    fn clear_forces(&mut self) {
        *self.pending_acceleration = Vec3::ZERO;
        self.rigid_body_mut().reset_forces(true);
    }

    fn set_heading(&mut self, heading: Heading) {
        let rotation =
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -heading.yaw_degrees().to_radians());
        self.rigid_body_mut().set_rotation(rotation, true);
    }

    fn collider(&self) -> CapsuleShape {
        *self.capsule
    }

    fn set_collider(&mut self, shape: CapsuleShape) {
        *self.capsule = shape;
        let collider = &mut self.physics.collider_set[self.collider];
        collider.set_shape(SharedShape::capsule_y(shape.half_segment(), shape.radius));
        collider.set_translation_wrt_parent(vector![shape.center.x, shape.center.y, shape.center.z]);
    }

    fn set_collider_enabled(&mut self, enabled: bool) {
        self.physics.collider_set[self.collider].set_enabled(enabled);
    }

    fn gravity(&self) -> Vec3 {
        self.physics.config.gravity
    }
}
