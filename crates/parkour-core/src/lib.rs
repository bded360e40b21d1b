//! Parkour Core - Core types and utilities shared by the parkour crates
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Heading, capsule shape, and contact sample types
//! - The `CharacterBody` trait the controller drives, plus a point-mass implementation
//! - Fixed timestep accounting and countdown timers

pub mod body;
pub mod time;
pub mod types;

pub use body::{CharacterBody, PointMassBody};
pub use glam::{Quat, Vec2, Vec3};
pub use time::{Countdown, GameTime, TimeConfig};
pub use types::{CapsuleShape, ContactSample, Heading, SurfaceId};
