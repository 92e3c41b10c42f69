//! Tiledash - endless lane-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track generation, player kinematics)
//! - `tuning`: Data-driven game balance
//!
//! The sim is headless: it owns no rendering, audio, or networking. A host
//! samples input once per frame, drives `sim::tick` at a fixed timestep,
//! and reads back snapshots and events.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth kinematics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Live tiles kept in the sliding window
    pub const MAX_TILES: usize = 10;
    /// Corner tiles allowed among the live window
    pub const MAX_CORNERS: usize = 4;
    /// Tiles kept behind the player as trailing margin
    pub const TILES_BEHIND_PLAYER: usize = 2;
    /// Full percentage scale
    pub const HUNDRED_PERCENT: f64 = 100.0;
    /// Percentage chance (0-100) to place a corner when one is allowed
    pub const CORNER_CHANCE: f64 = HUNDRED_PERCENT * 2.0 / 3.0;

    /// Tile extent along the direction of travel
    pub const TILE_LENGTH: f32 = 6.0;
    /// Center-to-center spacing between adjacent lanes
    pub const LANE_DISTANCE: f32 = 2.0;
    /// Tile extent across the direction of travel (three lanes)
    pub const TILE_WIDTH: f32 = 3.0 * LANE_DISTANCE;

    /// Downward acceleration (m/s^2)
    pub const GRAVITY: f32 = 9.8;

    /// Ground probe origin height above the player's feet
    pub const PROBE_HEIGHT: f32 = 0.6;
    /// Tolerance between feet and track surface that still counts as grounded
    pub const GROUND_EPSILON: f32 = 0.05;

    /// Forward distance into a corner tile within which a turn input
    /// resolves. Shorter than the tile so a missed corner resolves while
    /// the player is still over the footprint.
    pub const CORNER_WINDOW: f32 = TILE_LENGTH - LANE_DISTANCE / 2.0;
}
