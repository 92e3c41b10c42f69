//! Procedural track: tile segments and the sliding window
//!
//! The track is a bounded window of tile segments streamed ahead of the
//! player and recycled behind them. Corner placement is constrained so the
//! track stays navigable: never two corners in a row, and never more than a
//! fixed number of corners in the live window (or in its recent half).
//! Violations of those constraints are programming errors and panic.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::player::{Lane, Orientation};
use super::rng::TrackRng;
use crate::consts::{
    GROUND_EPSILON, LANE_DISTANCE, MAX_CORNERS, MAX_TILES, PROBE_HEIGHT, TILES_BEHIND_PLAYER,
    TILE_LENGTH, TILE_WIDTH,
};

/// Opaque handle to an instantiated segment, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub u32);

/// Turn direction of a corner tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

/// Tile segment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Straight,
    Corner(Turn),
}

impl SegmentKind {
    pub fn is_corner(self) -> bool {
        matches!(self, SegmentKind::Corner(_))
    }
}

/// A lane position a player may occupy on or after a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneAnchor {
    pub lane: Lane,
    pub position: Vec3,
}

/// One tile of track geometry. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub kind: SegmentKind,
    /// Center of the entry edge
    pub origin: Vec3,
    /// Direction of travel entering the tile
    pub heading: Orientation,
    /// Lane anchors of the outgoing corridor (Left, Middle, Right)
    pub anchors: [LaneAnchor; 3],
    /// Segment this one was placed from; never used for traversal
    pub prev: Option<SegmentId>,
}

impl Segment {
    fn new(
        id: SegmentId,
        kind: SegmentKind,
        origin: Vec3,
        heading: Orientation,
        prev: Option<SegmentId>,
    ) -> Self {
        let center = origin + heading.dir() * (TILE_LENGTH / 2.0);
        let exit = match kind {
            SegmentKind::Straight => heading,
            SegmentKind::Corner(Turn::Left) => heading.rotated_left(),
            SegmentKind::Corner(Turn::Right) => heading.rotated_right(),
        };
        let anchors = Lane::ALL.map(|lane| LaneAnchor {
            lane,
            position: center + exit.right_dir() * (lane.offset() * LANE_DISTANCE),
        });
        Self {
            id,
            kind,
            origin,
            heading,
            anchors,
            prev,
        }
    }

    /// Center of the tile footprint
    pub fn center(&self) -> Vec3 {
        self.origin + self.heading.dir() * (TILE_LENGTH / 2.0)
    }

    /// Direction of travel leaving the tile
    pub fn exit_heading(&self) -> Orientation {
        match self.kind {
            SegmentKind::Straight => self.heading,
            SegmentKind::Corner(Turn::Left) => self.heading.rotated_left(),
            SegmentKind::Corner(Turn::Right) => self.heading.rotated_right(),
        }
    }

    /// Center of the exit edge; the next tile is placed here
    pub fn exit_point(&self) -> Vec3 {
        self.center() + self.exit_heading().dir() * (TILE_LENGTH / 2.0)
    }

    /// True if the ground-plane position lies within this tile's footprint
    pub fn contains(&self, pos: Vec3) -> bool {
        let rel = pos - self.center();
        let along = rel.dot(self.heading.dir());
        let across = rel.dot(self.heading.right_dir());
        along.abs() <= TILE_LENGTH / 2.0 && across.abs() <= TILE_WIDTH / 2.0
    }
}

/// Sliding buffer of live segments, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackWindow {
    segments: Vec<Segment>,
    next_id: u32,
    /// Segments still owed by the staged reset population
    pending: u32,
}

/// Result of appending a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended {
    pub id: SegmentId,
    pub kind: SegmentKind,
    pub evicted: Option<SegmentId>,
}

impl TrackWindow {
    pub fn new() -> Self {
        let mut window = Self {
            segments: Vec::with_capacity(MAX_TILES + 1),
            next_id: 0,
            pending: 0,
        };
        window.reset();
        window
    }

    /// Clear all segments, re-add the canonical start segment, and schedule
    /// the initial population (one segment per population step, so a reset
    /// never stalls a frame).
    pub fn reset(&mut self) {
        self.segments.clear();
        let id = self.alloc_id();
        self.segments.push(Segment::new(
            id,
            SegmentKind::Straight,
            Vec3::ZERO,
            Orientation::North,
            None,
        ));
        self.pending = (MAX_TILES - TILES_BEHIND_PLAYER - 1) as u32;
        log::debug!("track reset, {} segments pending", self.pending);
    }

    fn alloc_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Live segments, oldest first
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Still owed segments from a staged reset
    pub fn is_populating(&self) -> bool {
        self.pending > 0
    }

    /// Newest segment whose footprint contains the position
    pub fn segment_at(&self, pos: Vec3) -> Option<&Segment> {
        self.segments.iter().rev().find(|s| s.contains(pos))
    }

    /// Ground probe: the probe point sits `PROBE_HEIGHT` above the feet;
    /// grounded means the feet are on (or within epsilon of) a live tile.
    pub fn is_grounded(&self, probe_point: Vec3) -> bool {
        let feet_y = probe_point.y - PROBE_HEIGHT;
        feet_y <= GROUND_EPSILON && self.segment_at(probe_point).is_some()
    }

    /// Run one step of the staged reset population, if any is owed
    pub fn populate_step(&mut self, rng: &mut TrackRng, corner_chance: f64) -> Option<Appended> {
        if self.pending == 0 {
            return None;
        }
        self.pending -= 1;
        Some(self.try_append_segment(rng, corner_chance))
    }

    /// Corner eligibility: false if the newest segment is a corner, or if
    /// either density bound would be exceeded by one more corner.
    fn may_place_corner(&self) -> bool {
        let last = self.segments.last().expect("track window empty");
        if last.kind.is_corner() {
            return false;
        }

        let recent = self.segments.iter().rev();
        let half = recent
            .clone()
            .take(MAX_TILES / 2)
            .filter(|s| s.kind.is_corner())
            .count();
        let full = recent
            .take(MAX_TILES)
            .filter(|s| s.kind.is_corner())
            .count();
        half < MAX_CORNERS / 2 && full < MAX_CORNERS
    }

    /// Append one segment, corner or straight decided by the random policy,
    /// then evict the oldest segment once the window exceeds its bound.
    ///
    /// The Bernoulli draw runs even when corners are disallowed (with the
    /// probability forced to 0) so the RNG stream advances identically
    /// regardless of eligibility.
    pub fn try_append_segment(&mut self, rng: &mut TrackRng, corner_chance: f64) -> Appended {
        let prev = self.segments.last().expect("track window empty");
        let origin = prev.exit_point();
        let heading = prev.exit_heading();
        let prev_id = prev.id;

        let chance = if self.may_place_corner() {
            corner_chance
        } else {
            0.0
        };
        let kind = if rng.percentage_chance(chance) {
            SegmentKind::Corner(rng.pick(Turn::Left, Turn::Right))
        } else {
            SegmentKind::Straight
        };

        let id = self.alloc_id();
        self.segments
            .push(Segment::new(id, kind, origin, heading, Some(prev_id)));
        assert!(
            self.segments.len() <= MAX_TILES + 1,
            "track window overflow: {} segments",
            self.segments.len()
        );

        let evicted = if self.segments.len() > MAX_TILES {
            let old = self.segments.remove(0);
            Some(old.id)
        } else {
            None
        };

        self.check_invariants();
        log::debug!(
            "appended segment {:?} ({:?}), evicted {:?}",
            id,
            kind,
            evicted
        );
        Appended { id, kind, evicted }
    }

    /// Density and adjacency invariants over the live set. A violation is a
    /// corrupted placement policy, never a recoverable condition.
    fn check_invariants(&self) {
        for pair in self.segments.windows(2) {
            assert!(
                !(pair[0].kind.is_corner() && pair[1].kind.is_corner()),
                "adjacent corner segments {:?} and {:?}",
                pair[0].id,
                pair[1].id
            );
        }
        let recent = self.segments.iter().rev();
        let half = recent
            .clone()
            .take(MAX_TILES / 2)
            .filter(|s| s.kind.is_corner())
            .count();
        let full = recent
            .take(MAX_TILES)
            .filter(|s| s.kind.is_corner())
            .count();
        assert!(
            half <= MAX_CORNERS / 2,
            "corner density violated in recent half-window: {half}"
        );
        assert!(
            full <= MAX_CORNERS,
            "corner density violated across window: {full}"
        );
    }
}

impl Default for TrackWindow {
    fn default() -> Self {
        Self::new()
    }
}
