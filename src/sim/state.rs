//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`SessionState`]. There is no
//! ambient global state: callers own the session and pass it to `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{height_above_floor, rect_center};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, simulation frozen
    MainMenu,
    /// Active gameplay
    Playing,
    /// Run ended, simulation frozen until retry
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SuperJump,
    SpeedBoost,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SuperJump,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Magnet,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PowerUpKind::SuperJump => "Super Jump",
            PowerUpKind::SpeedBoost => "Speed Boost",
            PowerUpKind::Magnet => "Magnet",
        }
    }
}

/// A timed effect flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTimer {
    pub active: bool,
    pub remaining: f32,
}

impl EffectTimer {
    pub fn activate(&mut self, duration: f32) {
        self.active = true;
        self.remaining = duration;
    }

    /// Count down by `dt`. Returns true on the frame the effect runs out.
    pub fn countdown(&mut self, dt: f32) -> bool {
        if self.active && self.remaining > 0.0 {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.active = false;
                self.remaining = 0.0;
                return true;
            }
        }
        false
    }
}

/// Active power-up effects on the character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub super_jump: EffectTimer,
    pub speed_boost: EffectTimer,
    /// Flag only, nothing is attracted yet
    pub magnet: EffectTimer,
}

impl Effects {
    pub fn timer(&self, kind: PowerUpKind) -> &EffectTimer {
        match kind {
            PowerUpKind::SuperJump => &self.super_jump,
            PowerUpKind::SpeedBoost => &self.speed_boost,
            PowerUpKind::Magnet => &self.magnet,
        }
    }

    pub fn timer_mut(&mut self, kind: PowerUpKind) -> &mut EffectTimer {
        match kind {
            PowerUpKind::SuperJump => &mut self.super_jump,
            PowerUpKind::SpeedBoost => &mut self.speed_boost,
            PowerUpKind::Magnet => &mut self.magnet,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.timer(kind).active
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub effects: Effects,
    /// Whether the character rested on a saucer during the previous frame
    pub was_grounded: bool,
}

impl Default for Character {
    fn default() -> Self {
        Self::new(CHARACTER_START)
    }
}

impl Character {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: CHARACTER_SIZE,
            effects: Effects::default(),
            was_grounded: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Height of the character above the world floor
    pub fn height(&self) -> f32 {
        height_above_floor(self.pos.y)
    }
}

/// A power-up riding on a saucer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Top-left corner, recomputed from the owning saucer every frame
    pub pos: Vec2,
    /// Spin angle in degrees
    pub rotation: f32,
    pub consumed: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, owner: &Aabb) -> Self {
        let mut power_up = Self {
            kind,
            pos: Vec2::ZERO,
            rotation: 0.0,
            consumed: false,
        };
        power_up.follow(owner);
        power_up
    }

    /// Sit centered on top of the owning saucer
    pub fn follow(&mut self, owner: &Aabb) {
        let center_x = rect_center(owner.min, owner.size()).x;
        self.pos = Vec2::new(center_x - POWER_UP_SIZE / 2.0, owner.min.y - POWER_UP_SIZE);
    }

    pub fn spin(&mut self, degrees_per_sec: f32, dt: f32) {
        self.rotation = (self.rotation + degrees_per_sec * dt).rem_euclid(360.0);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(POWER_UP_SIZE))
    }

    pub fn is_active(&self) -> bool {
        !self.consumed
    }
}

/// A flying saucer (platform)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Signed horizontal speed in units per fixed step
    pub speed: f32,
    /// Set once a power-up has been attached; never cleared, so a saucer
    /// carries at most one power-up in its lifetime
    pub has_power_up: bool,
    pub power_up: Option<PowerUp>,
}

impl Platform {
    pub fn new(id: u32, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            size: PLATFORM_SIZE,
            speed,
            has_power_up: false,
            power_up: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Patrol horizontally, reflecting and clamping at the world edges
    pub fn advance(&mut self, step: f32) {
        self.pos.x += self.speed * step;

        if self.pos.x <= 0.0 && self.speed < 0.0 {
            self.pos.x = 0.0;
            self.speed = -self.speed;
        } else if self.pos.x + self.size.x >= WORLD_WIDTH && self.speed > 0.0 {
            self.pos.x = WORLD_WIDTH - self.size.x;
            self.speed = -self.speed;
        }
    }

    /// Attach a power-up. Refuses (and logs) if this saucer already got one.
    pub fn attach_power_up(&mut self, kind: PowerUpKind) -> bool {
        if self.has_power_up || self.power_up.is_some() {
            log::error!("Refusing second power-up ({:?}) on saucer {}", kind, self.id);
            return false;
        }
        self.power_up = Some(PowerUp::new(kind, &self.bounds()));
        self.has_power_up = true;
        true
    }

    /// The power-up on this saucer, if it hasn't been picked up
    pub fn active_power_up(&self) -> Option<&PowerUp> {
        self.power_up.as_ref().filter(|p| p.is_active())
    }
}

/// A collectible coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    /// Top-left corner of the coin's bounding square
    pub pos: Vec2,
    pub collected: bool,
}

impl Coin {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            collected: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(COIN_DIAMETER))
    }
}

/// Score and ascent bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub score: u64,
    /// Best score this session; survives retries
    pub high_score: u64,
    pub saucers_jumped: u32,
    /// Smallest saucer y the character has landed on (highest point)
    pub max_ascent: f32,
    /// Where the most recent saucer was spawned
    pub next_spawn_height: f32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            score: 0,
            high_score: 0,
            saucers_jumped: 0,
            max_ascent: FLOOR_Y,
            next_spawn_height: INITIAL_SPAWN_HEIGHT,
        }
    }
}

impl Progress {
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    pub fn saucer_landed(&mut self, points: u64) {
        self.saucers_jumped += 1;
        self.add_score(points);
    }

    /// Clear per-run values, keeping the session high score
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.saucers_jumped = 0;
        self.max_ascent = FLOOR_Y;
        self.next_spawn_height = INITIAL_SPAWN_HEIGHT;
    }
}

/// "<Name> Activated!" banner state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpMessage {
    pub kind: PowerUpKind,
    pub remaining: f32,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    PlatformLanded { platform_id: u32, score: u64 },
    CoinCollected { score: u64 },
    PowerUpCollected(PowerUpKind),
    PlatformSpawned { platform_id: u32, y: f32 },
    PowerUpSpawned { platform_id: u32, kind: PowerUpKind },
    CoinSpawned { coin_id: u32 },
    GameOver { score: u64 },
    ExitRequested,
}

/// Pending events kept for a caller that never drains
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Complete session state
///
/// Each `tick` appends [`GameEvent`]s to an internal queue. Callers are
/// expected to take them with [`SessionState::drain_events`] once per frame.
/// An undrained queue is capped at [`MAX_PENDING_EVENTS`], dropping the
/// oldest half when full.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub character: Character,
    /// Active saucers (spawn order)
    pub platforms: Vec<Platform>,
    /// Active coins (spawn order)
    pub coins: Vec<Coin>,
    pub progress: Progress,
    pub camera: Camera,
    pub message: Option<PowerUpMessage>,
    /// Timestamp (seconds) of the last power-up spawn or run start
    pub last_power_up_spawn: f64,
    /// Timestamp (seconds) of the last coin spawn or run start
    pub last_coin_spawn: f64,
    /// Set when the player chose Exit from the main menu
    pub exit_requested: bool,
    rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl SessionState {
    /// Create a session on the main menu with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            tuning,
            phase: GamePhase::MainMenu,
            character: Character::default(),
            platforms: Vec::new(),
            coins: Vec::new(),
            progress: Progress::default(),
            camera: Camera::default(),
            message: None,
            last_power_up_spawn: 0.0,
            last_coin_spawn: 0.0,
            exit_requested: false,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        };
        state.seed_platforms();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Reset the world for a fresh run and enter `Playing`.
    ///
    /// The high score is kept. Spawn cooldowns start counting from `now`.
    pub fn start_run(&mut self, now: f64) {
        self.progress.reset_run();
        self.character = Character::default();
        self.coins.clear();
        self.seed_platforms();
        self.camera = Camera::default();
        self.message = None;
        self.last_power_up_spawn = now;
        self.last_coin_spawn = now;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::RunStarted);
        log::info!("Run started (high score {})", self.progress.high_score);
    }

    fn seed_platforms(&mut self) {
        self.platforms.clear();
        let speed = self.tuning.platform_speed;
        for pos in SEED_PLATFORMS {
            let id = self.next_entity_id();
            self.platforms.push(Platform::new(id, pos, speed));
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            log::warn!(
                "Event queue not drained, dropping {} oldest events",
                MAX_PENDING_EVENTS / 2
            );
            self.events.drain(..MAX_PENDING_EVENTS / 2);
        }
        self.events.push(event);
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_reflects_off_left_edge() {
        let mut platform = Platform::new(1, Vec2::new(-5.0, 100.0), -50.0);
        platform.advance(1.0);
        assert_eq!(platform.pos.x, 0.0);
        assert_eq!(platform.speed, 50.0);
    }

    #[test]
    fn platform_reflects_off_right_edge() {
        let mut platform = Platform::new(1, Vec2::new(698.0, 100.0), 10.0);
        platform.advance(0.5);
        assert_eq!(platform.pos.x, WORLD_WIDTH - PLATFORM_SIZE.x);
        assert_eq!(platform.speed, -10.0);
    }

    #[test]
    fn platform_patrols_at_fixed_step() {
        let mut platform = Platform::new(1, Vec2::new(400.0, 100.0), -0.5);
        platform.advance(0.5);
        assert_eq!(platform.pos.x, 399.75);
        assert_eq!(platform.speed, -0.5);
    }

    #[test]
    fn platform_holds_at_most_one_power_up() {
        let mut platform = Platform::new(1, Vec2::new(300.0, 100.0), -0.5);
        assert!(platform.attach_power_up(PowerUpKind::Magnet));
        assert!(!platform.attach_power_up(PowerUpKind::SuperJump));
        assert_eq!(platform.power_up.as_ref().map(|p| p.kind), Some(PowerUpKind::Magnet));

        // Consumed power-ups still block a second attachment
        if let Some(p) = platform.power_up.as_mut() {
            p.consumed = true;
        }
        assert!(platform.active_power_up().is_none());
        assert!(!platform.attach_power_up(PowerUpKind::SpeedBoost));
    }

    #[test]
    fn power_up_sits_centered_on_saucer() {
        let platform = Platform::new(1, Vec2::new(300.0, 200.0), -0.5);
        let power_up = PowerUp::new(PowerUpKind::SuperJump, &platform.bounds());
        assert_eq!(power_up.pos, Vec2::new(335.0, 170.0));
        let center = power_up.bounds().center();
        assert_eq!(center.x, platform.bounds().center().x);
    }

    #[test]
    fn power_up_spin_wraps() {
        let platform = Platform::new(1, Vec2::new(300.0, 200.0), -0.5);
        let mut power_up = PowerUp::new(PowerUpKind::SuperJump, &platform.bounds());
        power_up.spin(90.0, 5.0);
        assert!((power_up.rotation - 90.0).abs() < 1e-3);
    }

    #[test]
    fn effect_timer_expires_once() {
        let mut timer = EffectTimer::default();
        timer.activate(1.0);
        assert!(!timer.countdown(0.6));
        assert!(timer.active);
        assert!(timer.countdown(0.6));
        assert!(!timer.active);
        assert!(!timer.countdown(0.6));
    }

    #[test]
    fn high_score_tracks_score() {
        let mut progress = Progress::default();
        progress.add_score(200);
        progress.saucer_landed(10);
        assert_eq!(progress.score, 210);
        assert_eq!(progress.high_score, 210);
        assert_eq!(progress.saucers_jumped, 1);

        progress.reset_run();
        assert_eq!(progress.score, 0);
        assert_eq!(progress.saucers_jumped, 0);
        assert_eq!(progress.high_score, 210);

        progress.add_score(10);
        assert_eq!(progress.high_score, 210);
    }

    #[test]
    fn new_session_starts_on_menu_with_seed_platforms() {
        let state = SessionState::new(7);
        assert_eq!(state.phase, GamePhase::MainMenu);
        assert_eq!(state.platforms.len(), SEED_PLATFORMS.len());
        assert_eq!(state.character.pos, CHARACTER_START);
        assert_eq!(state.character.height(), 300.0);
    }

    #[test]
    fn start_run_resets_world_but_not_high_score() {
        let mut state = SessionState::new(7);
        state.progress.add_score(500);
        state.coins.push(Coin::new(99, Vec2::ZERO));
        state.platforms.truncate(1);
        state.character.pos.y = -1000.0;

        state.start_run(42.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.progress.score, 0);
        assert_eq!(state.progress.high_score, 500);
        assert!(state.coins.is_empty());
        assert_eq!(state.platforms.len(), 3);
        assert_eq!(state.character, Character::default());
        assert_eq!(state.last_coin_spawn, 42.0);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted]);
        assert!(state.events().is_empty());
    }

    #[test]
    fn undrained_events_stay_bounded() {
        let mut state = SessionState::new(7);
        for score in 0..3 * MAX_PENDING_EVENTS as u64 {
            state.push_event(GameEvent::CoinCollected { score });
        }
        assert!(state.events().len() <= MAX_PENDING_EVENTS);
        let last = GameEvent::CoinCollected {
            score: 3 * MAX_PENDING_EVENTS as u64 - 1,
        };
        assert_eq!(state.events().last(), Some(&last));
    }
}
