//! Side and front wall classification
//!
//! Contacts are classified against the character's yaw basis every tick:
//! a contact whose normal points along `+right` belongs to a wall on the
//! left, along `-right` to a wall on the right, and along `-forward` to a
//! wall in front. Side walls only count inside a height band around the
//! torso so floor and ceiling grazes never register.

use glam::Vec3;
use parkour_core::{ContactSample, Heading, SurfaceId};
use serde::{Deserialize, Serialize};

/// Largest vertical normal component a front wall may have
const VERTICAL_WALL_EPSILON: f32 = 0.01;

/// Which side of the character a wall is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Axis a wall normal on this side points along
    pub fn away_axis(self, heading: Heading) -> Vec3 {
        match self {
            WallSide::Left => heading.right(),
            WallSide::Right => -heading.right(),
        }
    }
}

/// A classified side-wall contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub side: WallSide,
    pub normal: Vec3,
    pub point: Vec3,
    pub surface: SurfaceId,
}

/// Vertical range, in world space, within which wall contacts count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBand {
    pub min: f32,
    pub max: Option<f32>,
}

impl HeightBand {
    /// Band measured from the world-space capsule center
    pub fn around_center(center: Vec3, min_offset: f32, max_offset: Option<f32>) -> Self {
        Self {
            min: center.y + min_offset,
            max: max_offset.map(|offset| center.y + offset),
        }
    }

    /// Whether `y` falls inside the band
    pub fn contains(&self, y: f32) -> bool {
        y >= self.min && self.max.map_or(true, |max| y <= max)
    }
}

/// Pick the side wall the character is touching, if any.
///
/// When contacts qualify on both sides, the one most aligned with its side
/// axis wins, so a single tick never reports two walls.
pub fn detect_side_wall(
    contacts: &[ContactSample],
    heading: Heading,
    band: HeightBand,
    threshold: f32,
) -> Option<WallContact> {
    let right = heading.right();
    let mut best: Option<(f32, WallContact)> = None;

    for contact in contacts.iter().filter(|c| band.contains(c.point.y)) {
        let alignment = contact.normal.dot(right);
        let side = if alignment > threshold {
            WallSide::Left
        } else if -alignment > threshold {
            WallSide::Right
        } else {
            continue;
        };

        let score = alignment.abs();
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((
                score,
                WallContact {
                    side,
                    normal: contact.normal,
                    point: contact.point,
                    surface: contact.surface,
                },
            ));
        }
    }

    best.map(|(_, wall)| wall)
}

/// Near-vertical contacts facing the character head-on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontWall {
    contacts: Vec<ContactSample>,
}

impl FrontWall {
    /// Collect the front-wall contacts of this tick
    pub fn scan(contacts: &[ContactSample], heading: Heading, threshold: f32) -> Self {
        let backward = -heading.forward();
        let contacts = contacts
            .iter()
            .filter(|c| c.normal.dot(backward) > threshold && c.normal.y.abs() < VERTICAL_WALL_EPSILON)
            .copied()
            .collect();
        Self { contacts }
    }

    /// Any front contact at all
    pub fn is_touching(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// Any front contact at or below `height`
    pub fn has_contact_below(&self, height: f32) -> bool {
        self.contacts.iter().any(|c| c.point.y <= height)
    }

    /// Any front contact strictly above `height`
    pub fn has_contact_above(&self, height: f32) -> bool {
        self.contacts.iter().any(|c| c.point.y > height)
    }

    /// Wall below the reference height with open air above it
    pub fn is_ledge(&self, reference_height: f32) -> bool {
        self.has_contact_below(reference_height) && !self.has_contact_above(reference_height)
    }

    /// Contacts classified as in front of the body
    pub fn contacts(&self) -> &[ContactSample] {
        &self.contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(point: Vec3, normal: Vec3) -> ContactSample {
        ContactSample::new(point, normal, SurfaceId(7))
    }

    fn torso_band() -> HeightBand {
        HeightBand::around_center(Vec3::new(0.0, 1.0, 0.0), 0.1, None)
    }

    #[test]
    fn test_left_and_right_walls() {
        let heading = Heading::default();

        // Wall at -X: its normal points to +X, the character's right axis
        let left = detect_side_wall(
            &[sample(Vec3::new(-0.5, 1.5, 0.0), Vec3::X)],
            heading,
            torso_band(),
            0.9,
        )
        .expect("left wall");
        assert_eq!(left.side, WallSide::Left);

        let right = detect_side_wall(
            &[sample(Vec3::new(0.5, 1.5, 0.0), Vec3::NEG_X)],
            heading,
            torso_band(),
            0.9,
        )
        .expect("right wall");
        assert_eq!(right.side, WallSide::Right);
        assert_eq!(right.side.away_axis(heading), Vec3::NEG_X);
    }

    #[test]
    fn test_band_excludes_low_contacts() {
        let contacts = [sample(Vec3::new(-0.5, 0.5, 0.0), Vec3::X)];
        assert!(detect_side_wall(&contacts, Heading::default(), torso_band(), 0.9).is_none());

        let capped = HeightBand::around_center(Vec3::new(0.0, 1.0, 0.0), 0.1, Some(0.5));
        let high = [sample(Vec3::new(-0.5, 1.8, 0.0), Vec3::X)];
        assert!(detect_side_wall(&high, Heading::default(), capped, 0.9).is_none());
    }

    #[test]
    fn test_strongest_side_wins() {
        let skewed = Vec3::new(-0.95, 0.0, 0.3).normalize();
        let contacts = [
            sample(Vec3::new(0.5, 1.5, 0.0), skewed),
            sample(Vec3::new(-0.5, 1.5, 0.0), Vec3::X),
        ];
        let wall = detect_side_wall(&contacts, Heading::default(), torso_band(), 0.9)
            .expect("wall");
        assert_eq!(wall.side, WallSide::Left);
    }

    #[test]
    fn test_front_wall_ledge() {
        let heading = Heading::default();
        // Facing -Z, so a wall ahead has a +Z normal
        let low = sample(Vec3::new(0.0, 0.8, -0.5), Vec3::Z);
        let high = sample(Vec3::new(0.0, 1.6, -0.5), Vec3::Z);

        let ledge = FrontWall::scan(&[low], heading, 0.9);
        assert!(ledge.is_touching());
        assert!(ledge.is_ledge(1.1));

        let full_wall = FrontWall::scan(&[low, high], heading, 0.9);
        assert!(!full_wall.is_ledge(1.1));
    }

    #[test]
    fn test_front_wall_rejects_slopes() {
        let ramp = sample(Vec3::new(0.0, 0.8, -0.5), Vec3::new(0.0, 0.2, 1.0).normalize());
        assert!(!FrontWall::scan(&[ramp], Heading::default(), 0.9).is_touching());
    }
}
