//! Parkour Controller - physically driven first-person locomotion
//!
//! Every fixed physics step the [`CharacterController`] reconciles player
//! intent ([`InputSnapshot`]) with the contacts the physics engine reported
//! ([`ContactSample`]) to decide which motion mode is active and which forces
//! and velocity changes to apply to the [`CharacterBody`].
//!
//! The controller is split into cooperating modules, sequenced once per tick:
//! - [`ground`]: slope-filtered ground contact tracking
//! - [`wall_detection`]: side and front wall classification
//! - [`slide`]: crouch/slide state and collider morph
//! - [`wall_run`]: wall-run activation and forces
//! - [`mantle`]: ledge detection and scripted traversal
//! - [`gravity`]: mode-dependent custom gravity
//! - [`movement`]: horizontal acceleration model
//! - [`jump`] and [`wall_jump`]: buffered, forgiving jumps
//! - [`wall_climb`], [`launch_pad`], [`respawn`]: course mechanics
//!
//! [`ContactSample`]: parkour_core::ContactSample
//! [`CharacterBody`]: parkour_core::CharacterBody

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod gravity;
pub mod ground;
pub mod input;
pub mod jump;
pub mod launch_pad;
pub mod mantle;
pub mod movement;
pub mod respawn;
pub mod slide;
pub mod wall_climb;
pub mod wall_detection;
pub mod wall_jump;
pub mod wall_run;

pub use config::ControllerConfig;
pub use controller::{CharacterController, MotionState};
pub use error::{ConfigError, ControllerError};
pub use events::{ControllerEvent, EventBus, EventListener};
pub use input::{InputAction, InputSnapshot, InputState};
pub use wall_detection::WallSide;
