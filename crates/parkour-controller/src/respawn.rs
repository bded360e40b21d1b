//! Fall-out respawn

use glam::Vec3;
use parkour_core::CharacterBody;
use tracing::info;

use crate::config::RespawnConfig;

#[derive(Debug, Clone)]
pub struct RespawnModule {
    config: RespawnConfig,
}

impl RespawnModule {
    pub fn new(config: RespawnConfig) -> Self {
        Self { config }
    }

    /// Whether the body has fallen out of the course
    pub fn should_respawn(&self, position: Vec3) -> bool {
        self.config.enabled && position.y < self.config.kill_height
    }

    /// Put the body back at the checkpoint, at rest
    pub fn respawn(&self, body: &mut impl CharacterBody) {
        info!(
            "Respawning from {:?} at checkpoint {:?}",
            body.position(),
            self.config.checkpoint
        );
        body.set_position(self.config.checkpoint);
        body.set_velocity(Vec3::ZERO);
        body.clear_forces();
    }

    /// Where the next respawn places the body
    pub fn checkpoint(&self) -> Vec3 {
        self.config.checkpoint
    }

    /// Move the respawn point
    pub fn set_checkpoint(&mut self, checkpoint: Vec3) {
        self.config.checkpoint = checkpoint;
    }
}
