//! Launch pads: surfaces that throw the character on contact

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use parkour_core::{CharacterBody, ContactSample, SurfaceId};
use tracing::debug;

use crate::gravity::launch_speed;

/// Registered pads and the ones currently touched
#[derive(Debug, Clone, Default)]
pub struct LaunchPads {
    /// Launch per pad: horizontal velocity in x/z, apex height in y
    pads: HashMap<SurfaceId, Vec3>,
    touching: HashSet<SurfaceId>,
}

impl LaunchPads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the launch for `surface`
    pub fn register(&mut self, surface: SurfaceId, launch: Vec3) {
        self.pads.insert(surface, launch);
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    /// Launch off any pad touched for the first time this tick.
    ///
    /// A pad fires once per contact and re-arms when the contact ends.
    pub fn update(
        &mut self,
        body: &mut impl CharacterBody,
        contacts: &[ContactSample],
        gravity_scale: f32,
    ) -> bool {
        let touching: HashSet<SurfaceId> = contacts
            .iter()
            .map(|contact| contact.surface)
            .filter(|surface| self.pads.contains_key(surface))
            .collect();

        let fresh = contacts
            .iter()
            .map(|contact| contact.surface)
            .find(|surface| touching.contains(surface) && !self.touching.contains(surface));
        self.touching = touching;

        let Some(launch) = fresh.and_then(|surface| self.pads.get(&surface).copied()) else {
            return false;
        };

        let vertical = launch_speed(body.gravity(), gravity_scale, launch.y);
        body.set_velocity(Vec3::new(launch.x, vertical, launch.z));
        debug!("Launch pad fired with vertical speed {:.2}", vertical);
        true
    }

    /// Forget current contacts so every pad is armed again
    pub fn rearm(&mut self) {
        self.touching.clear();
    }
}
