//! Fixed timestep simulation tick
//!
//! Per-tick update order matters: corner entry/resolution runs first, then
//! lane swapping, then jump/gravity, then forward motion, then track
//! advancement. Later steps read state written by earlier ones.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::player::{Orientation, PendingCorner, Player, RotationAnim};
use super::rng::TrackRng;
use super::timer::{Cadence, TickTimer};
use super::track::{Appended, SegmentId, SegmentKind, TrackWindow, Turn};
use crate::consts::{CORNER_WINDOW, GRAVITY, LANE_DISTANCE, PROBE_HEIGHT};
use crate::tuning::Tuning;

/// Input intents for a single tick, sampled once before the update runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump: bool,
    pub swap_left: bool,
    pub swap_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Observational events for the presentation layer. Draining them never
/// feeds back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    SegmentSpawned {
        id: SegmentId,
        kind: SegmentKind,
    },
    SegmentEvicted(SegmentId),
    CornerEntered {
        segment: SegmentId,
        turn: Turn,
    },
    CornerResolved {
        segment: SegmentId,
        success: bool,
        orientation: Orientation,
        rotation_secs: f32,
    },
    DamageStarted,
    DamageCleared,
    Jumped,
    Landed,
}

/// Abstraction over collision/physics groundedness queries. The probe point
/// sits `PROBE_HEIGHT` above the player's feet.
pub trait GroundProbe {
    fn is_grounded(&self, probe_point: Vec3) -> bool;
}

impl GroundProbe for TrackWindow {
    fn is_grounded(&self, probe_point: Vec3) -> bool {
        TrackWindow::is_grounded(self, probe_point)
    }
}

/// Complete simulation state: the owning context for the track window, the
/// player, the random policy, and every deferred action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance knobs for this run
    pub tuning: Tuning,
    /// Generation random policy
    pub rng: TrackRng,
    /// Live track segments
    pub track: TrackWindow,
    /// The player entity
    pub player: Player,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Staged reset-population pacing
    populate_cadence: Cadence,
    /// Pending presentation events (drained by the host)
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let track = TrackWindow::new();
        let spawn = track.segments()[0].anchors[1].position;
        let mut player = Player::new(spawn, &tuning);
        player.current_segment = Some(track.segments()[0].id);
        let populate_cadence = Cadence::new(tuning.populate_interval);
        Self {
            seed,
            tuning,
            rng: TrackRng::new(seed),
            track,
            player,
            time_ticks: 0,
            populate_cadence,
            events: Vec::new(),
        }
    }

    /// Clear the track back to the start segment and re-center the player.
    /// Every deferred action (damage recovery, staged population, rotation)
    /// is dropped here, so nothing scheduled before the reset can fire
    /// against the new state.
    pub fn reset_track(&mut self) {
        self.track.reset();
        self.populate_cadence.restart();
        let spawn = self.track.segments()[0].anchors[1].position;
        self.player = Player::new(spawn, &self.tuning);
        self.player.current_segment = Some(self.track.segments()[0].id);
        self.events.clear();
        log::info!("track reset (seed {})", self.seed);
    }

    /// Read-only player snapshot
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Live segments, oldest first
    pub fn segments(&self) -> &[super::track::Segment] {
        self.track.segments()
    }

    /// Take all pending presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_appended(&mut self, appended: Appended) {
        self.events.push(GameEvent::SegmentSpawned {
            id: appended.id,
            kind: appended.kind,
        });
        if let Some(evicted) = appended.evicted {
            self.events.push(GameEvent::SegmentEvicted(evicted));
        }
    }
}

/// Advance the simulation one step, probing groundedness from the track
/// geometry itself.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let grounded = state
        .track
        .is_grounded(state.player.pos + Vec3::Y * PROBE_HEIGHT);
    step(state, input, dt, grounded);
}

/// Advance the simulation one step with a host-supplied ground probe
/// (a physics engine at the boundary described in the crate docs).
pub fn tick_with_probe<P: GroundProbe + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    probe: &P,
) {
    let grounded = probe.is_grounded(state.player.pos + Vec3::Y * PROBE_HEIGHT);
    step(state, input, dt, grounded);
}

fn step(state: &mut GameState, input: &TickInput, dt: f32, grounded: bool) {
    state.time_ticks += 1;

    advance_deferred(state, dt);
    detect_corner_entry(state);
    resolve_corner(state, input);
    swap_lanes(state, input);
    integrate_vertical(state, input, dt, grounded);
    move_forward(state, dt);
    advance_track(state);
}

/// Timers and staged population; runs before any gameplay step so a
/// recovery that ends this tick unblocks this tick's transitions.
fn advance_deferred(state: &mut GameState, dt: f32) {
    if let Some(anim) = &mut state.player.rotation {
        if anim.timer.tick(dt) {
            state.player.rotation = None;
        }
    }

    if let Some(timer) = &mut state.player.damage {
        if timer.tick(dt) {
            state.player.damage = None;
            state.events.push(GameEvent::DamageCleared);
            log::debug!("damage recovery complete");
        }
    }

    if state.track.is_populating() && state.populate_cadence.tick(dt) {
        let corner_chance = state.tuning.corner_chance;
        if let Some(appended) = state.track.populate_step(&mut state.rng, corner_chance) {
            state.push_appended(appended);
        }
    }
}

/// Entering a corner tile's footprint arms the negotiation window. A
/// damaged player does not arm, and a corner already resolved never
/// re-arms.
fn detect_corner_entry(state: &mut GameState) {
    if state.player.is_on_corner() || state.player.is_damaged() {
        return;
    }
    let Some(segment) = state.track.segment_at(state.player.pos) else {
        return;
    };
    let SegmentKind::Corner(turn) = segment.kind else {
        return;
    };
    if state.player.last_resolved_corner == Some(segment.id) {
        return;
    }

    state.player.pending_corner = Some(PendingCorner {
        turn,
        segment: segment.id,
        anchors: segment.anchors,
        entry: segment.origin,
        entry_heading: segment.heading,
    });
    state.events.push(GameEvent::CornerEntered {
        segment: segment.id,
        turn,
    });
    log::debug!("entered {:?} corner {:?}", turn, segment.id);
}

/// A matching turn input succeeds; advancing past the resolvable window
/// without one fails. Exactly one resolution fires per corner encounter.
fn resolve_corner(state: &mut GameState, input: &TickInput) {
    let (turn, progress) = match &state.player.pending_corner {
        Some(pending) => (pending.turn, pending.progress(state.player.pos)),
        None => return,
    };
    let matched = match turn {
        Turn::Left => input.turn_left,
        Turn::Right => input.turn_right,
    };
    if matched {
        complete_corner(state, true);
    } else if progress > CORNER_WINDOW {
        complete_corner(state, false);
    }
}

/// Snap onto the nearest outgoing lane anchor, rotate the logical
/// orientation immediately, and start the cosmetic rotation. Failure also
/// starts the damage recovery window and drops speed to the floor.
fn complete_corner(state: &mut GameState, success: bool) {
    let player = &mut state.player;
    let pending = player
        .pending_corner
        .take()
        .expect("corner resolution without a pending corner");

    // Nearest anchor; on an exact tie the lowest-indexed lane wins because
    // only a strictly closer anchor replaces the current best.
    let mut best = &pending.anchors[0];
    let mut best_dist = best.position.distance(player.pos);
    for anchor in &pending.anchors[1..] {
        let dist = anchor.position.distance(player.pos);
        if dist < best_dist {
            best = anchor;
            best_dist = dist;
        }
    }

    // Snap the coordinate perpendicular to the outgoing corridor: entering
    // along z the anchor fixes z, entering along x it fixes x.
    if pending.entry_heading.along_z() {
        player.pos.z = best.position.z;
    } else {
        player.pos.x = best.position.x;
    }
    player.lane = best.lane;

    let from_yaw = player.visual_yaw();
    player.orientation = match pending.turn {
        Turn::Left => player.orientation.rotated_left(),
        Turn::Right => player.orientation.rotated_right(),
    };
    let rotation_secs = if success {
        state.tuning.turn_rotation
    } else {
        state.tuning.failed_turn_rotation
    };
    player.rotation = Some(RotationAnim::new(
        from_yaw,
        player.orientation.yaw_degrees(),
        rotation_secs,
    ));
    player.last_resolved_corner = Some(pending.segment);

    if !success {
        player.damage = Some(TickTimer::new(state.tuning.damage_recovery));
        player.speed = state.tuning.min_speed;
        state.events.push(GameEvent::DamageStarted);
        log::debug!("missed {:?} corner {:?}", pending.turn, pending.segment);
    } else {
        log::debug!("took {:?} corner {:?}", pending.turn, pending.segment);
    }
    state.events.push(GameEvent::CornerResolved {
        segment: pending.segment,
        success,
        orientation: state.player.orientation,
        rotation_secs,
    });
}

/// At most one lane swap per tick, left resolving first. Suppressed while
/// damaged or negotiating a corner.
fn swap_lanes(state: &mut GameState, input: &TickInput) {
    if state.player.is_damaged() || state.player.is_on_corner() {
        return;
    }
    let player = &mut state.player;

    if input.swap_left {
        if let Some(lane) = player.lane.shifted_left() {
            player.pos += player.orientation.rotated_left().dir() * LANE_DISTANCE;
            player.lane = lane;
            return;
        }
    }
    if input.swap_right {
        if let Some(lane) = player.lane.shifted_right() {
            player.pos += player.orientation.rotated_right().dir() * LANE_DISTANCE;
            player.lane = lane;
        }
    }
}

/// Jump impulse and gravity integration. Resting on the ground with no jump
/// input applies no vertical motion at all, so the player never sinks.
/// Runs even while damaged.
fn integrate_vertical(state: &mut GameState, input: &TickInput, dt: f32, grounded: bool) {
    let player = &mut state.player;
    let was_airborne = player.pos.y > 0.0;
    let may_jump = grounded && !player.is_on_corner() && player.vertical_speed <= 0.0;

    if may_jump && !input.jump {
        return;
    }
    if may_jump && input.jump {
        player.vertical_speed = state.tuning.jump_speed;
        state.events.push(GameEvent::Jumped);
    }

    player.vertical_speed -= state.tuning.gravity_multiplier * GRAVITY * dt;
    player.pos.y += player.vertical_speed * dt;

    // Landing: descending onto a live tile stops against the surface
    if player.vertical_speed < 0.0
        && player.pos.y <= 0.0
        && state.track.segment_at(player.pos).is_some()
    {
        player.pos.y = 0.0;
        player.vertical_speed = 0.0;
        if was_airborne {
            state.events.push(GameEvent::Landed);
        }
    }
}

/// Accelerate toward max speed and translate along the current facing
fn move_forward(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    if player.speed < state.tuning.max_speed {
        player.speed = (player.speed + state.tuning.acceleration * dt).min(state.tuning.max_speed);
    }
    player.pos += player.orientation.dir() * (player.speed * dt);
}

/// Crossing into a fresh segment extends the track by one (and evicts the
/// oldest once the window is full). Initial population must finish first.
fn advance_track(state: &mut GameState) {
    let Some(segment) = state.track.segment_at(state.player.pos) else {
        return;
    };
    let id = segment.id;
    if state.player.current_segment == Some(id) {
        return;
    }
    // Ids are monotonic; only forward crossings extend the track
    let moved_forward = state.player.current_segment.is_none_or(|cur| id > cur);
    state.player.current_segment = Some(id);
    if moved_forward && !state.track.is_populating() {
        let corner_chance = state.tuning.corner_chance;
        let appended = state.track.try_append_segment(&mut state.rng, corner_chance);
        state.push_appended(appended);
    }
}
