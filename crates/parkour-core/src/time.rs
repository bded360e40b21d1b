//! Time system for the parkour workspace
//!
//! Handles frame delta accumulation into fixed physics steps, and the
//! countdown timers the controller uses for grace windows and cooldowns.

use serde::{Deserialize, Serialize};

/// Configuration for simulation time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for physics (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped)
    pub delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Number of fixed steps run so far
    pub fixed_step_count: u64,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(TimeConfig::default())
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            fixed_step_count: 0,
            fixed_accumulator: 0.0,
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        let clamped = raw_delta.min(self.config.max_delta_time);
        self.frame_count += 1;

        self.delta_time = clamped * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        self.fixed_step_count += steps as u64;
        steps
    }

    /// The fixed step duration in seconds
    pub fn fixed_delta(&self) -> f32 {
        self.config.fixed_timestep
    }
}

/// A grace-window or cooldown timer that only ever counts down.
///
/// The remaining time is clamped at zero, so reading it is always safe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub const fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Start (or restart) the window at `duration` seconds
    pub fn reset(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Close the window immediately
    pub fn cancel(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by one step of `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Whether any time is left in the window
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Seconds left in the window
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);
        assert!((time.total_time - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_time_scale_stretches_steps() {
        let mut time = GameTime::new(TimeConfig {
            time_scale: 0.5,
            fixed_timestep: 0.01,
            ..Default::default()
        });
        time.update(0.05);
        assert_eq!(time.fixed_steps(), 2);
    }

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.01,
            ..Default::default()
        });
        time.update(0.035);
        assert_eq!(time.fixed_steps(), 3);

        time.update(0.006);
        assert_eq!(time.fixed_steps(), 1);
        assert_eq!(time.fixed_step_count, 4);
    }

    #[test]
    fn test_max_delta_clamps_spiral() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.1,
            max_delta_time: 0.25,
            ..Default::default()
        });
        time.update(10.0);
        assert_eq!(time.fixed_steps(), 2);
    }

    #[test]
    fn test_countdown_never_negative() {
        let mut timer = Countdown::new();
        timer.reset(0.1);
        assert!(timer.is_active());

        for _ in 0..20 {
            timer.tick(0.03);
            assert!(timer.remaining() >= 0.0);
        }
        assert!(!timer.is_active());
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn test_countdown_cancel() {
        let mut timer = Countdown::new();
        timer.reset(2.5);
        timer.tick(1.0);
        assert!((timer.remaining() - 1.5).abs() < 1e-6);
        timer.cancel();
        assert!(!timer.is_active());
    }
}
