//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (window is oldest-first, ids monotonic)
//! - No rendering or platform dependencies

pub mod player;
pub mod rng;
pub mod tick;
pub mod timer;
pub mod track;

pub use player::{Lane, Orientation, PendingCorner, Player, RotationAnim};
pub use rng::TrackRng;
pub use tick::{GameEvent, GameState, GroundProbe, TickInput, tick, tick_with_probe};
pub use timer::{Cadence, TickTimer};
pub use track::{LaneAnchor, Segment, SegmentId, SegmentKind, TrackWindow, Turn};
