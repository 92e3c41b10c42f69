//! Player kinematic and logical state
//!
//! Lane, facing, vertical motion, and the corner-negotiation state. The
//! pending corner carries the candidate anchors with it, so anchors exist
//! exactly when a corner side is set.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::timer::TickTimer;
use super::track::{LaneAnchor, SegmentId, Turn};
use crate::tuning::Tuning;

/// One of the three parallel paths the player can occupy.
/// Ordered Left < Middle < Right; lane swaps never wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Middle,
    Right,
}

impl Lane {
    /// Signed offset from the middle lane, in lane widths
    pub fn offset(self) -> f32 {
        match self {
            Lane::Left => -1.0,
            Lane::Middle => 0.0,
            Lane::Right => 1.0,
        }
    }

    /// Next lane to the left, or None at the boundary
    pub fn shifted_left(self) -> Option<Lane> {
        match self {
            Lane::Left => None,
            Lane::Middle => Some(Lane::Left),
            Lane::Right => Some(Lane::Middle),
        }
    }

    /// Next lane to the right, or None at the boundary
    pub fn shifted_right(self) -> Option<Lane> {
        match self {
            Lane::Left => Some(Lane::Middle),
            Lane::Middle => Some(Lane::Right),
            Lane::Right => None,
        }
    }

    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Middle, Lane::Right];
}

/// Track-relative facing; changes only on corner resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// Unit direction of travel on the ground plane
    pub fn dir(self) -> Vec3 {
        match self {
            Orientation::North => Vec3::new(0.0, 0.0, 1.0),
            Orientation::East => Vec3::new(1.0, 0.0, 0.0),
            Orientation::South => Vec3::new(0.0, 0.0, -1.0),
            Orientation::West => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// Unit direction 90 degrees clockwise of travel (the player's right)
    pub fn right_dir(self) -> Vec3 {
        self.rotated_right().dir()
    }

    /// Facing after a left (counter-clockwise) turn
    pub fn rotated_left(self) -> Orientation {
        match self {
            Orientation::North => Orientation::West,
            Orientation::West => Orientation::South,
            Orientation::South => Orientation::East,
            Orientation::East => Orientation::North,
        }
    }

    /// Facing after a right (clockwise) turn
    pub fn rotated_right(self) -> Orientation {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::South,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
        }
    }

    /// Yaw in degrees (North = 0, clockwise positive)
    pub fn yaw_degrees(self) -> f32 {
        match self {
            Orientation::North => 0.0,
            Orientation::East => 90.0,
            Orientation::South => 180.0,
            Orientation::West => 270.0,
        }
    }

    /// True when travel runs along the world z axis
    pub fn along_z(self) -> bool {
        matches!(self, Orientation::North | Orientation::South)
    }
}

/// Corner being negotiated: which turn input is expected, and where the
/// player may snap to once it resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCorner {
    /// Expected turn direction
    pub turn: Turn,
    /// Corner segment being negotiated (non-owning)
    pub segment: SegmentId,
    /// Lane anchors of the outgoing corridor
    pub anchors: [LaneAnchor; 3],
    /// Entry-edge position of the corner tile
    pub entry: Vec3,
    /// Facing at entry; progress is measured along this direction
    pub entry_heading: Orientation,
}

impl PendingCorner {
    /// Forward distance travelled into the corner tile
    pub fn progress(&self, pos: Vec3) -> f32 {
        (pos - self.entry).dot(self.entry_heading.dir())
    }
}

/// Cosmetic facing rotation. The logical orientation flips at resolution
/// time; this only eases the visual yaw toward it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationAnim {
    pub from_yaw: f32,
    pub to_yaw: f32,
    pub timer: TickTimer,
}

impl RotationAnim {
    pub fn new(from_yaw: f32, to_yaw: f32, duration: f32) -> Self {
        Self {
            from_yaw,
            to_yaw,
            timer: TickTimer::new(duration),
        }
    }

    /// Interpolated yaw, taking the short way around
    pub fn current_yaw(&self) -> f32 {
        let mut delta = (self.to_yaw - self.from_yaw) % 360.0;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        (self.from_yaw + delta * self.timer.progress()).rem_euclid(360.0)
    }
}

/// The player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    pub lane: Lane,
    pub orientation: Orientation,
    /// Forward speed (m/s)
    pub speed: f32,
    /// Signed vertical speed; positive is rising
    pub vertical_speed: f32,
    /// Corner currently being negotiated, if any
    pub pending_corner: Option<PendingCorner>,
    /// Recovery countdown after a failed corner; Some while damaged
    pub damage: Option<TickTimer>,
    /// Cosmetic yaw easing toward the logical orientation
    pub rotation: Option<RotationAnim>,
    /// Segment the player was last seen over (non-owning)
    pub current_segment: Option<SegmentId>,
    /// Corner segment most recently resolved; one resolution per encounter
    pub last_resolved_corner: Option<SegmentId>,
}

impl Player {
    pub fn new(spawn: Vec3, tuning: &Tuning) -> Self {
        Self {
            pos: spawn,
            lane: Lane::Middle,
            orientation: Orientation::North,
            speed: (tuning.min_speed + tuning.max_speed) / 2.0,
            vertical_speed: 0.0,
            pending_corner: None,
            damage: None,
            rotation: None,
            current_segment: None,
            last_resolved_corner: None,
        }
    }

    pub fn is_damaged(&self) -> bool {
        self.damage.is_some()
    }

    pub fn is_on_corner(&self) -> bool {
        self.pending_corner.is_some()
    }

    /// Turn input currently expected, if a corner is being negotiated
    pub fn corner_side(&self) -> Option<Turn> {
        self.pending_corner.as_ref().map(|c| c.turn)
    }

    /// Yaw to render this frame (eased during corner rotation)
    pub fn visual_yaw(&self) -> f32 {
        match &self.rotation {
            Some(anim) => anim.current_yaw(),
            None => self.orientation.yaw_degrees(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_bounds_never_wrap() {
        assert_eq!(Lane::Left.shifted_left(), None);
        assert_eq!(Lane::Right.shifted_right(), None);
        assert_eq!(Lane::Middle.shifted_left(), Some(Lane::Left));
        assert_eq!(Lane::Middle.shifted_right(), Some(Lane::Right));
    }

    #[test]
    fn test_orientation_rotations_inverse() {
        for o in [
            Orientation::North,
            Orientation::East,
            Orientation::South,
            Orientation::West,
        ] {
            assert_eq!(o.rotated_left().rotated_right(), o);
            assert_eq!(
                o.rotated_right().rotated_right().rotated_right().rotated_right(),
                o
            );
        }
    }

    #[test]
    fn test_right_dir_is_perpendicular() {
        for o in [
            Orientation::North,
            Orientation::East,
            Orientation::South,
            Orientation::West,
        ] {
            assert!(o.dir().dot(o.right_dir()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rotation_anim_short_way() {
        // West (270) to North (0/360) must ease through 315, not back
        // through 135.
        let mut anim = RotationAnim::new(270.0, 0.0, 1.0);
        anim.timer.tick(0.5);
        assert!((anim.current_yaw() - 315.0).abs() < 1e-3);
    }

    #[test]
    fn test_initial_speed_is_midpoint() {
        let tuning = Tuning::default();
        let p = Player::new(Vec3::ZERO, &tuning);
        assert!((p.speed - (tuning.min_speed + tuning.max_speed) / 2.0).abs() < 1e-6);
        assert_eq!(p.lane, Lane::Middle);
        assert_eq!(p.orientation, Orientation::North);
    }
}
