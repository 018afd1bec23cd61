//! Saucer Hop headless driver
//!
//! Runs the simulation without a window: an autopilot plays a few runs,
//! gameplay events are logged, and the final scene snapshot is printed as
//! JSON. Usage: `saucer-hop [seed] [tuning.json]`

use std::process::ExitCode;

use saucer_hop::Tuning;
use saucer_hop::sim::{FrameInput, GameEvent, GamePhase, Scene, SessionState, tick};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
/// Longest frame the driver will report (stalls are not simulated)
const MAX_FRAME_DT: f32 = 0.1;
/// Upper bound on frames per run
const MAX_RUN_FRAMES: u32 = 60 * 120;
/// Retries after the first game over
const RETRIES: u32 = 2;

/// Game instance holding the session and the synthetic clock
struct Game {
    state: SessionState,
    input: FrameInput,
    now: f64,
}

impl Game {
    fn new(state: SessionState) -> Self {
        Self {
            state,
            input: FrameInput::default(),
            now: 0.0,
        }
    }

    /// Run one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_DT);
        self.now += dt as f64;
        self.input.dt = dt;
        self.input.now = self.now;

        if self.state.phase == GamePhase::Playing {
            self.steer();
        }
        tick(&mut self.state, &self.input);

        // Clear one-shot inputs after processing
        self.input.play_pressed = false;
        self.input.retry_pressed = false;
        self.input.exit_pressed = false;

        for event in self.state.drain_events() {
            log_event(&event);
        }
    }

    /// Head for the nearest saucer above and keep jumping
    fn steer(&mut self) {
        let character = &self.state.character;
        let feet = character.pos.y + character.size.y;
        let center_x = character.pos.x + character.size.x / 2.0;

        let target = self
            .state
            .platforms
            .iter()
            .filter(|p| p.pos.y < feet - 1.0)
            .min_by(|a, b| (feet - a.pos.y).total_cmp(&(feet - b.pos.y)))
            .or_else(|| {
                self.state
                    .platforms
                    .iter()
                    .min_by(|a, b| (a.pos.y - feet).abs().total_cmp(&(b.pos.y - feet).abs()))
            });

        let (left, right) = match target {
            Some(platform) => {
                let target_x = platform.pos.x + platform.size.x / 2.0;
                (center_x > target_x + 10.0, center_x < target_x - 10.0)
            }
            None => (false, false),
        };

        self.input.move_left = left;
        self.input.move_right = right;
        self.input.jump_held = true;
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::RunStarted => log::info!("New run"),
        GameEvent::PlatformLanded { platform_id, score } => {
            log::debug!("Landed on saucer {} (score {})", platform_id, score)
        }
        GameEvent::CoinCollected { score } => log::info!("Coin! (score {})", score),
        GameEvent::PowerUpCollected(kind) => log::info!("{} Activated!", kind.display_name()),
        GameEvent::GameOver { score } => log::info!("Game over with {} points", score),
        GameEvent::ExitRequested => log::info!("Exit"),
        GameEvent::PlatformSpawned { .. }
        | GameEvent::PowerUpSpawned { .. }
        | GameEvent::CoinSpawned { .. } => log::trace!("{:?}", event),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            return ExitCode::FAILURE;
        }
        None => 0x5a_0c_e2,
    };

    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    log::info!("Saucer Hop (headless) starting with seed {}", seed);
    let mut game = Game::new(SessionState::with_tuning(seed, tuning));

    game.input.play_pressed = true;
    let mut runs = 0;
    loop {
        let mut frames = 0;
        while game.state.phase != GamePhase::GameOver && frames < MAX_RUN_FRAMES {
            game.update(FRAME_DT);
            frames += 1;
        }

        let progress = &game.state.progress;
        log::info!(
            "Run {} finished after {:.1}s: score {}, saucers {}, high score {}",
            runs + 1,
            frames as f32 * FRAME_DT,
            progress.score,
            progress.saucers_jumped,
            progress.high_score
        );

        runs += 1;
        if runs > RETRIES || game.state.phase != GamePhase::GameOver {
            break;
        }
        game.input.retry_pressed = true;
        game.update(FRAME_DT);
    }

    let scene = Scene::capture(&game.state);
    println!("{}", scene.hud.score_text());
    println!("{}", scene.hud.high_score_text());
    println!("{}", scene.hud.height_text());
    match serde_json::to_string_pretty(&scene) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize scene: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
