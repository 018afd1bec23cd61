//! Saucer Hop - an endless vertical platformer
//!
//! Core modules:
//! - `sim`: Simulation (physics, spawning, collisions, game state machine)
//! - `tuning`: Data-driven game balance
//!
//! Windowing, drawing and input polling live outside this crate. The
//! simulation consumes a [`sim::FrameInput`] per frame and hands back a
//! [`sim::Scene`] describing what to draw.

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// World geometry constants
pub mod consts {
    use glam::Vec2;

    /// World/view dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
    /// Death boundary; height is measured upward from here
    pub const FLOOR_Y: f32 = 600.0;

    /// Character defaults
    pub const CHARACTER_SIZE: Vec2 = Vec2::new(40.0, 40.0);
    pub const CHARACTER_START: Vec2 = Vec2::new(375.0, 300.0);

    /// Saucer dimensions
    pub const PLATFORM_SIZE: Vec2 = Vec2::new(100.0, 20.0);
    /// Saucers present at the start of every run
    pub const SEED_PLATFORMS: [Vec2; 3] = [
        Vec2::new(200.0, 500.0),
        Vec2::new(500.0, 350.0),
        Vec2::new(300.0, 200.0),
    ];

    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const COIN_DIAMETER: f32 = 30.0;

    /// Camera starts following once the character climbs above this y
    pub const CAMERA_ANCHOR: f32 = 300.0;

    /// First spawn height before any ascent has been recorded
    pub const INITIAL_SPAWN_HEIGHT: f32 = 200.0;
}

/// Height of a point above the world floor (positive = above)
#[inline]
pub fn height_above_floor(y: f32) -> f32 {
    consts::FLOOR_Y - y
}

/// Center of a rectangle given its top-left corner and size
#[inline]
pub fn rect_center(top_left: Vec2, size: Vec2) -> Vec2 {
    top_left + size * 0.5
}
