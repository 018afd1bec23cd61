//! Renderable snapshot of the simulation
//!
//! The presentation layer draws from this and never touches live state.

use glam::Vec2;
use serde::Serialize;

use super::state::{GamePhase, PowerUpKind, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    /// Top-left corner in world coordinates
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerUpPose {
    pub pose: Pose,
    pub kind: PowerUpKind,
    /// Spin angle in degrees
    pub rotation: f32,
}

/// Values shown as text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    /// Character height above the floor
    pub height: f32,
    /// Most recently activated power-up and how long its banner remains
    pub power_up: Option<(PowerUpKind, f32)>,
    pub in_menu: bool,
    pub game_over: bool,
}

impl Hud {
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn high_score_text(&self) -> String {
        format!("High Score: {}", self.high_score)
    }

    pub fn height_text(&self) -> String {
        format!("Height: {} units", self.height as i32)
    }

    pub fn power_up_text(&self) -> Option<String> {
        self.power_up.map(|(kind, _)| format!("{} Activated!", kind.display_name()))
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub phase: GamePhase,
    pub character: Pose,
    pub platforms: Vec<Pose>,
    pub coins: Vec<Pose>,
    pub power_ups: Vec<PowerUpPose>,
    /// World y of the top of the view
    pub camera_offset: f32,
    pub hud: Hud,
}

impl Scene {
    pub fn capture(state: &SessionState) -> Self {
        let character = &state.character;

        let platforms = state
            .platforms
            .iter()
            .map(|p| Pose {
                pos: p.pos,
                size: p.size,
            })
            .collect();

        let coins = state
            .coins
            .iter()
            .filter(|c| !c.collected)
            .map(|c| {
                let bounds = c.bounds();
                Pose {
                    pos: bounds.min,
                    size: bounds.size(),
                }
            })
            .collect();

        let power_ups = state
            .platforms
            .iter()
            .filter_map(|p| p.active_power_up())
            .map(|p| {
                let bounds = p.bounds();
                PowerUpPose {
                    pose: Pose {
                        pos: bounds.min,
                        size: bounds.size(),
                    },
                    kind: p.kind,
                    rotation: p.rotation,
                }
            })
            .collect();

        Self {
            phase: state.phase,
            character: Pose {
                pos: character.pos,
                size: character.size,
            },
            platforms,
            coins,
            power_ups,
            camera_offset: state.camera.offset_y,
            hud: Hud {
                score: state.progress.score,
                high_score: state.progress.high_score,
                height: character.height(),
                power_up: state.message.map(|m| (m.kind, m.remaining)),
                in_menu: state.phase == GamePhase::MainMenu,
                game_over: state.phase == GamePhase::GameOver,
            },
        }
    }
}
