//! Input accumulation and per-tick input snapshots
//!
//! Device callbacks arrive at arbitrary times between physics steps. They are
//! folded into an [`InputState`], which the controller turns into exactly one
//! [`InputSnapshot`] per fixed tick.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Digital actions that can drive the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    /// Edge-triggered: one press, one jump request
    Jump,
    /// Level-triggered: slide while held
    Slide,
}

/// Immutable per-tick input record
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Movement intent in [-1, 1]^2 (x = right, y = forward)
    pub move_axis: Vec2,
    /// A jump was pressed since the previous snapshot
    pub jump_requested: bool,
    /// The slide button is currently held
    pub slide_held: bool,
}

impl InputSnapshot {
    pub fn new(move_axis: Vec2, jump_requested: bool, slide_held: bool) -> Self {
        Self {
            move_axis: move_axis.clamp(Vec2::NEG_ONE, Vec2::ONE),
            jump_requested,
            slide_held,
        }
    }
}

/// Accumulated device state between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    held: HashSet<InputAction>,
    /// Analog stick value, overrides the digital directions when set
    analog_axis: Option<Vec2>,
    /// Jump pressed since the last snapshot
    jump_pending: bool,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action being pressed
    pub fn press(&mut self, action: InputAction) {
        if action == InputAction::Jump && !self.held.contains(&action) {
            self.jump_pending = true;
        }
        self.held.insert(action);
    }

    /// Record an action being released
    pub fn release(&mut self, action: InputAction) {
        self.held.remove(&action);
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Set the analog movement axis (e.g. a gamepad stick)
    pub fn set_move_axis(&mut self, axis: Vec2) {
        self.analog_axis = Some(axis.clamp(Vec2::NEG_ONE, Vec2::ONE));
    }

    /// Stop using the analog axis and fall back to digital directions
    pub fn clear_move_axis(&mut self) {
        self.analog_axis = None;
    }

    /// Request a jump without tracking button state
    pub fn press_jump(&mut self) {
        self.jump_pending = true;
    }

    /// Hold or release the slide action
    pub fn set_slide_held(&mut self, held: bool) {
        if held {
            self.held.insert(InputAction::Slide);
        } else {
            self.held.remove(&InputAction::Slide);
        }
    }

    /// Current movement axis from the analog stick or the held directions
    pub fn move_axis(&self) -> Vec2 {
        if let Some(axis) = self.analog_axis {
            return axis;
        }

        let mut axis = Vec2::ZERO;
        if self.is_held(InputAction::MoveForward) {
            axis.y += 1.0;
        }
        if self.is_held(InputAction::MoveBackward) {
            axis.y -= 1.0;
        }
        if self.is_held(InputAction::MoveLeft) {
            axis.x -= 1.0;
        }
        if self.is_held(InputAction::MoveRight) {
            axis.x += 1.0;
        }
        axis
    }

    /// Produce this tick's snapshot, consuming the pending jump
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(
            self.move_axis(),
            self.jump_pending,
            self.is_held(InputAction::Slide),
        );
        self.jump_pending = false;
        snapshot
    }
}
