//! Parkour Physics - rapier3d backend for the locomotion controller
//!
//! Owns the simulation world, builds static course geometry, turns rapier
//! contact manifolds into controller contact samples and exposes the
//! character's rigid body through the controller's body seam.

mod character_body;

pub use character_body::{CharacterBodyConfig, CharacterHandle, RapierCharacterBody};

use glam::Vec3;
use nalgebra::Unit;
use parkour_core::{ContactSample, SurfaceId};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Errors raised while wiring the character into the physics world
#[derive(Debug, Clone, thiserror::Error)]
pub enum PhysicsError {
    #[error("rigid body {0:?} is not in the physics world")]
    MissingBody(RigidBodyHandle),

    #[error("collider {0:?} is not in the physics world")]
    MissingCollider(ColliderHandle),
}

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Scene gravity, handed to the controller rather than the engine
    pub gravity: Vec3,
    /// Fixed step length in seconds
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// Map a rapier collider handle onto the opaque surface identity the controller compares
pub fn surface_id(handle: ColliderHandle) -> SurfaceId {
    let (index, generation) = handle.into_raw_parts();
    SurfaceId(((generation as u64) << 32) | index as u64)
}

/// A course: static geometry plus the character's dynamic body
pub struct PhysicsWorld {
    pub config: PhysicsConfig,

    pub(crate) rigid_body_set: RigidBodySet,
    pub(crate) collider_set: ColliderSet,

    // Pipeline state, the course has no joints but the step needs the sets
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Create an empty world with the default gravity and a 60 Hz step
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create an empty world with custom gravity and step length
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Engine gravity is passed through, but the character body spawns with a
    /// zero gravity scale so only static geometry would ever feel it.
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Number of colliders in the course, the character's included
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    fn insert_static(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    pub(crate) fn insert_dynamic(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.rigid_body_set.insert(rigid_body);
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);
        (body, collider)
    }

    /// Contacts touching `collider` from the last step, normals pointing towards it
    pub fn contacts_for(&self, collider: ColliderHandle) -> Vec<ContactSample> {
        let mut samples = Vec::new();

        for pair in self.narrow_phase.contact_pairs_with(collider) {
            if !pair.has_any_active_contact {
                continue;
            }

            // Manifold normals point from collider1 to collider2
            let (other, sign) = if pair.collider1 == collider {
                (pair.collider2, -1.0)
            } else {
                (pair.collider1, 1.0)
            };

            for manifold in &pair.manifolds {
                let n = manifold.data.normal;
                let normal = Vec3::new(n.x, n.y, n.z) * sign;

                for contact in &manifold.data.solver_contacts {
                    let p = contact.point;
                    samples.push(ContactSample::new(
                        Vec3::new(p.x, p.y, p.z),
                        normal,
                        surface_id(other),
                    ));
                }
            }
        }

        samples
    }

    /// Infinite floor at height `y`
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let up = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(up)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.insert_static(ground)
    }

    /// Axis-aligned static block centred on `position`
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .build();
        self.insert_static(collider)
    }

    /// Tall thin wall standing on y = 0 and running along Z, for wall-running
    pub fn create_wall(&mut self, x: f32, z_start: f32, z_end: f32, height: f32) -> ColliderHandle {
        let half_length = (z_end - z_start).abs() / 2.0;
        let center_z = (z_start + z_end) / 2.0;
        self.create_static_box(
            Vec3::new(0.25, height / 2.0, half_length),
            Vec3::new(x, height / 2.0, center_z),
        )
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
