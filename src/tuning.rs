//! Game balance values
//!
//! Defaults reproduce the stock game. A JSON file may override any subset
//! of fields; missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Balance knobs for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Character ===
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Jump launch speed (units/s)
    pub jump_speed: f32,
    /// Jump launch speed while Super Jump is active
    pub super_jump_speed: f32,
    /// Horizontal run speed (units/s)
    pub base_speed: f32,
    /// Run speed multiplier while Speed Boost is active
    pub speed_boost_multiplier: f32,
    /// One-time horizontal velocity multiplier applied on Speed Boost pickup
    pub speed_boost_impulse: f32,

    // === Power-ups ===
    /// How long each effect lasts (seconds)
    pub effect_duration: f32,
    /// How long the "<Name> Activated!" message stays up (seconds)
    pub message_duration: f32,
    /// Minimum time between power-up spawns (seconds)
    pub power_up_interval: f64,
    /// Spin rate (degrees/s)
    pub power_up_spin: f32,

    // === Coins ===
    pub coin_interval: f64,
    pub coin_value: u64,
    /// How far above the character a coin appears
    pub coin_spawn_offset: f32,

    // === Saucers ===
    pub landing_points: u64,
    /// Distance above the best landing at which the next saucer appears
    pub platform_spawn_gap: f32,
    pub platform_spawn_min_x: f32,
    pub platform_spawn_max_x: f32,
    /// Horizontal speed, in units per fixed step
    pub platform_speed: f32,
    /// Fixed step used for saucer motion instead of the frame delta
    pub platform_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            jump_speed: 600.0,
            super_jump_speed: 900.0,
            base_speed: 300.0,
            speed_boost_multiplier: 2.0,
            speed_boost_impulse: 10.5,

            effect_duration: 5.0,
            message_duration: 2.0,
            power_up_interval: 5.0,
            power_up_spin: 90.0,

            coin_interval: 10.0,
            coin_value: 200,
            coin_spawn_offset: 200.0,

            landing_points: 10,
            platform_spawn_gap: 100.0,
            platform_spawn_min_x: 100.0,
            platform_spawn_max_x: 700.0,
            platform_speed: -0.5,
            platform_step: 0.5,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("gravity", self.gravity)?;
        positive("jump_speed", self.jump_speed)?;
        positive("super_jump_speed", self.super_jump_speed)?;
        positive("base_speed", self.base_speed)?;
        positive("effect_duration", self.effect_duration)?;
        positive("message_duration", self.message_duration)?;
        positive("power_up_interval", self.power_up_interval as f32)?;
        positive("coin_interval", self.coin_interval as f32)?;
        positive("platform_step", self.platform_step)?;

        let range_order = self.platform_spawn_min_x.partial_cmp(&self.platform_spawn_max_x);
        if range_order != Some(std::cmp::Ordering::Less) {
            return Err(TuningError::Invalid {
                field: "platform_spawn_min_x",
                reason: format!(
                    "spawn range {}..{} is empty",
                    self.platform_spawn_min_x, self.platform_spawn_max_x
                ),
            });
        }
        Ok(())
    }

    /// Run speed with or without Speed Boost
    pub fn run_speed(&self, boosted: bool) -> f32 {
        if boosted {
            self.base_speed * self.speed_boost_multiplier
        } else {
            self.base_speed
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}
