//! Runner settings with persistence
//!
//! Settings are saved to `~/.config/parkour/settings.toml`

use std::fs;
use std::path::PathBuf;

use parkour_controller::ControllerConfig;
use parkour_physics::{CharacterBodyConfig, PhysicsConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Everything the runner can be tuned with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    pub controller: ControllerConfig,
    pub physics: PhysicsConfig,
    pub body: CharacterBodyConfig,
    pub simulation: SimulationSettings,
}

impl RunnerSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("parkour"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse settings from TOML, filling missing fields with defaults
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(path)
    }
}

/// How long and how fast the scripted run plays
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Simulated seconds to run
    pub duration: f32,
    /// Simulated render frame rate feeding the fixed-step accumulator
    pub frame_rate: f32,
    /// Time scale multiplier
    pub time_scale: f32,
    /// Seconds between speed readouts
    pub report_interval: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            duration: 14.0,
            frame_rate: 144.0,
            time_scale: 1.0,
            report_interval: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = RunnerSettings::parse(
            r#"
            [controller.movement]
            top_speed = 12.0

            [simulation]
            duration = 3.0
            "#,
        )
        .expect("valid toml");

        assert_eq!(settings.controller.movement.top_speed, 12.0);
        assert_eq!(settings.controller.movement.acceleration, 60.0);
        assert_eq!(settings.controller.jump.jump_height, 2.0);
        assert_eq!(settings.simulation.duration, 3.0);
        assert_eq!(settings.simulation.frame_rate, 144.0);
    }

    #[test]
    fn test_defaults_survive_toml() {
        let defaults = RunnerSettings::default();
        let text = toml::to_string_pretty(&defaults).expect("serializable");
        let parsed = RunnerSettings::parse(&text).expect("parsable");

        assert_eq!(parsed.controller.wall_jump.same_wall_cooldown, 2.5);
        assert_eq!(parsed.physics.gravity, defaults.physics.gravity);
        assert_eq!(parsed.body.capsule, defaults.body.capsule);
    }
}
