//! Per-frame update
//!
//! Drives the menu → play → game-over state machine and, while playing, the
//! gameplay pipeline: spawn cooldowns, coins, saucer motion, landings,
//! power-up pickups, character integration, death check, ascent spawning,
//! pruning and camera.

use super::collision::resolve_landings;
use super::physics::{MoveDir, integrate_character};
use super::spawn::{
    collect_coins, collect_power_ups, prune_platforms, spawn_platform_for_ascent,
    try_spawn_coin, try_spawn_power_up, update_message, update_platforms,
};
use super::state::{GameEvent, GamePhase, SessionState};

/// Input for a single frame. Button signals are edge-detected by the caller.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Monotonic timestamp in seconds
    pub now: f64,
    pub move_left: bool,
    pub move_right: bool,
    pub jump_held: bool,
    pub play_pressed: bool,
    pub retry_pressed: bool,
    pub exit_pressed: bool,
}

impl FrameInput {
    pub fn move_dir(&self) -> MoveDir {
        MoveDir::from_keys(self.move_left, self.move_right)
    }
}

/// Advance the session by one frame. Once exit has been requested the
/// session is terminal and ignores all further input.
pub fn tick(state: &mut SessionState, input: &FrameInput) {
    if state.exit_requested {
        return;
    }

    match state.phase {
        GamePhase::MainMenu => {
            if input.exit_pressed {
                state.exit_requested = true;
                state.push_event(GameEvent::ExitRequested);
                log::info!("Exit requested from main menu");
            } else if input.play_pressed {
                state.start_run(input.now);
            }
        }

        GamePhase::GameOver => {
            if input.retry_pressed {
                state.start_run(input.now);
            }
        }

        GamePhase::Playing => {
            let dt = sanitize_dt(input.dt);
            step_playing(state, input, dt);
        }
    }
}

fn step_playing(state: &mut SessionState, input: &FrameInput, dt: f32) {
    try_spawn_power_up(state, input.now);

    try_spawn_coin(state, input.now);
    collect_coins(state);

    update_platforms(state, dt);
    let landing = resolve_landings(state);
    collect_power_ups(state);
    update_message(state, dt);

    integrate_character(
        &mut state.character,
        &state.tuning,
        landing.grounded,
        input.jump_held,
        input.move_dir(),
        dt,
    );

    if state.character.height() <= 0.0 {
        let score = state.progress.score;
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver { score });
        log::info!(
            "Game over: below 0 height (score {}, high score {})",
            score,
            state.progress.high_score
        );
        return;
    }

    if let Some(landing_y) = landing.highest_landing {
        spawn_platform_for_ascent(state, landing_y);
    }
    prune_platforms(state);

    state.camera.follow(state.character.pos.y);
}

/// Frame deltas are never negative; garbage becomes a zero-length frame
fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Clamping invalid frame delta {dt} to 0");
        0.0
    }
}
