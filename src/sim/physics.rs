//! Character integration and power-up effects
//!
//! Horizontal motion is input-driven with no inertia: velocity is set from
//! the held direction every frame. Vertical motion is gravity plus jumps.

use super::state::{Character, PowerUpKind};
use crate::tuning::Tuning;

/// Held horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveDir {
    Left,
    #[default]
    Idle,
    Right,
}

impl MoveDir {
    /// Left wins when both are held
    pub fn from_keys(left: bool, right: bool) -> Self {
        if left {
            MoveDir::Left
        } else if right {
            MoveDir::Right
        } else {
            MoveDir::Idle
        }
    }

    pub fn sign(&self) -> f32 {
        match self {
            MoveDir::Left => -1.0,
            MoveDir::Idle => 0.0,
            MoveDir::Right => 1.0,
        }
    }
}

/// Advance the character by `dt` seconds
pub fn integrate_character(
    character: &mut Character,
    tuning: &Tuning,
    grounded: bool,
    jump: bool,
    dir: MoveDir,
    dt: f32,
) {
    character.vel.y += tuning.gravity * dt;

    let effects = &mut character.effects;
    effects.super_jump.countdown(dt);
    if effects.speed_boost.countdown(dt) && character.vel.x != 0.0 {
        character.vel.x = character.vel.x.signum() * tuning.base_speed;
    }
    effects.magnet.countdown(dt);

    if grounded && jump {
        character.vel.y = if character.effects.super_jump.active {
            -tuning.super_jump_speed
        } else {
            -tuning.jump_speed
        };
    }

    let boosted = character.effects.speed_boost.active;
    character.vel.x = dir.sign() * tuning.run_speed(boosted);

    character.pos += character.vel * dt;
}

/// Apply a picked-up power-up's effect to the character
pub fn apply_power_up(character: &mut Character, kind: PowerUpKind, tuning: &Tuning) {
    match kind {
        PowerUpKind::SuperJump => {
            character.effects.super_jump.activate(tuning.effect_duration);
        }
        PowerUpKind::SpeedBoost => {
            character.effects.speed_boost.activate(tuning.effect_duration);
            character.vel.x *= tuning.speed_boost_impulse;
        }
        PowerUpKind::Magnet => {
            character.effects.magnet.activate(tuning.effect_duration);
        }
    }
    log::info!("Activated {}", kind.display_name());
}
