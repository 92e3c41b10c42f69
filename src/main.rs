//! Headless demo runner
//!
//! Drives the simulation at the fixed timestep with a trivial autopilot
//! (answers every corner, hops periodically) and prints a run summary.
//! Useful for eyeballing generation behavior and for replaying a seed:
//!
//! ```text
//! tiledash [seed] [seconds]
//! ```

use tiledash::Tuning;
use tiledash::consts::{MAX_SUBSTEPS, SIM_DT};
use tiledash::sim::{GameEvent, GameState, TickInput, Turn, tick};

struct RunSummary {
    ticks: u64,
    segments_spawned: u32,
    corners_taken: u32,
    corners_missed: u32,
    jumps: u32,
}

/// Input for the next tick: take the corner the sim is waiting on, and hop
/// every couple of seconds on straights.
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    match state.player().corner_side() {
        Some(Turn::Left) => input.turn_left = true,
        Some(Turn::Right) => input.turn_right = true,
        None => {
            input.jump = state.time_ticks % 240 == 0;
        }
    }
    input
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let seconds: f32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30.0);

    let mut state = GameState::new(seed, Tuning::default());
    let mut summary = RunSummary {
        ticks: 0,
        segments_spawned: 0,
        corners_taken: 0,
        corners_missed: 0,
        jumps: 0,
    };

    log::info!("running seed {seed} for {seconds} s");

    // Fixed-timestep loop; the accumulator shape matches a windowed host,
    // even though a headless run always steps cleanly.
    let mut accumulator = 0.0f32;
    let frame_dt = 1.0 / 60.0;
    let mut elapsed = 0.0f32;
    while elapsed < seconds {
        accumulator += frame_dt;
        elapsed += frame_dt;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = autopilot(&state);
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
            summary.ticks += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::SegmentSpawned { .. } => summary.segments_spawned += 1,
                    GameEvent::CornerResolved { success: true, .. } => {
                        summary.corners_taken += 1;
                    }
                    GameEvent::CornerResolved { success: false, .. } => {
                        summary.corners_missed += 1;
                    }
                    GameEvent::Jumped => summary.jumps += 1,
                    _ => {}
                }
            }
        }
    }

    let player = state.player();
    println!("seed {seed}: {} ticks", summary.ticks);
    println!(
        "  segments spawned: {}, corners taken: {}, missed: {}, jumps: {}",
        summary.segments_spawned, summary.corners_taken, summary.corners_missed, summary.jumps
    );
    println!(
        "  player at ({:.1}, {:.1}, {:.1}), lane {:?}, facing {:?}, {:.1} m/s",
        player.pos.x, player.pos.y, player.pos.z, player.lane, player.orientation, player.speed
    );
}
