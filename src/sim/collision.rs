//! Collision detection and landing resolution
//!
//! Everything in the world is an axis-aligned rectangle, so overlap tests
//! are plain interval checks. Landing is one-way: the character only lands
//! while falling or at rest, so jumping up through a saucer never snaps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, SessionState};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(top_left: Vec2, size: Vec2) -> Self {
        Self {
            min: top_left,
            max: top_left + size,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: boxes that merely touch along an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Landing contact with `ground`: strict horizontal overlap, and the
    /// bottom edge at or below the ground's top edge. Feet resting exactly on
    /// the top edge still count.
    #[inline]
    pub fn rests_on(&self, ground: &Aabb) -> bool {
        self.min.x < ground.max.x
            && ground.min.x < self.max.x
            && self.max.y >= ground.min.y
            && self.min.y < ground.max.y
    }
}

/// Outcome of resolving the character against every saucer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandingReport {
    /// Character is resting on at least one saucer this frame
    pub grounded: bool,
    /// Top y of the highest saucer landed on this frame
    pub highest_landing: Option<f32>,
    /// Scoring events fired this frame
    pub scored: u32,
}

/// Land the character on any saucer it is falling into.
///
/// Each qualifying saucer zeroes vertical velocity and snaps the character's
/// feet onto its top edge, in saucer order. Landing scores only when the
/// character was airborne on the previous frame; if two saucers qualify on
/// that frame, both score.
pub fn resolve_landings(state: &mut SessionState) -> LandingReport {
    let mut report = LandingReport::default();
    let mut events = Vec::new();
    let points = state.tuning.landing_points;
    let character = &mut state.character;

    for platform in &state.platforms {
        let falling = character.vel.y >= 0.0;
        if !falling || !character.bounds().rests_on(&platform.bounds()) {
            continue;
        }

        character.vel.y = 0.0;
        character.pos.y = platform.pos.y - character.size.y;

        if !character.was_grounded {
            state.progress.saucer_landed(points);
            report.scored += 1;
            events.push(GameEvent::PlatformLanded {
                platform_id: platform.id,
                score: state.progress.score,
            });
        }

        report.grounded = true;
        report.highest_landing = Some(match report.highest_landing {
            Some(best) => best.min(platform.pos.y),
            None => platform.pos.y,
        });
    }

    character.was_grounded = report.grounded;
    for event in events {
        state.push_event(event);
    }
    report
}
