//! Gameplay simulation
//!
//! All gameplay logic lives here:
//! - Frame-stepped, single-threaded
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod physics;
pub mod scene;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{Aabb, LandingReport, resolve_landings};
pub use physics::{MoveDir, apply_power_up, integrate_character};
pub use scene::{Hud, Pose, PowerUpPose, Scene};
pub use state::{
    Character, Coin, EffectTimer, Effects, GameEvent, GamePhase, Platform, PowerUp, PowerUpKind,
    PowerUpMessage, Progress, SessionState,
};
pub use tick::{FrameInput, tick};
