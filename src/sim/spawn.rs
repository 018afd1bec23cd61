//! Saucer, power-up and coin lifecycles
//!
//! Saucers spawn from ascent progress, never from elapsed time. Power-ups
//! and coins spawn on wall-clock cooldowns that re-arm only on a successful
//! spawn. Removal is always mark-then-filter.

use glam::Vec2;
use rand::Rng;

use super::physics::apply_power_up;
use super::state::{Coin, GameEvent, Platform, PowerUpKind, PowerUpMessage, SessionState};
use crate::consts::{COIN_DIAMETER, WORLD_WIDTH};

/// Move every saucer one fixed step and carry its power-up along
pub fn update_platforms(state: &mut SessionState, dt: f32) {
    let step = state.tuning.platform_step;
    let spin = state.tuning.power_up_spin;

    for platform in &mut state.platforms {
        platform.advance(step);
        let bounds = platform.bounds();
        if let Some(power_up) = platform.power_up.as_mut() {
            power_up.follow(&bounds);
            power_up.spin(spin, dt);
        }
    }
}

/// Record a landing height and spawn one saucer above it if it beats the
/// best ascent so far. Returns the new saucer's id.
pub fn spawn_platform_for_ascent(state: &mut SessionState, landing_y: f32) -> Option<u32> {
    if landing_y >= state.progress.max_ascent {
        return None;
    }

    state.progress.max_ascent = landing_y;
    let y = landing_y - state.tuning.platform_spawn_gap;
    state.progress.next_spawn_height = y;

    let (min_x, max_x) = (
        state.tuning.platform_spawn_min_x,
        state.tuning.platform_spawn_max_x,
    );
    let x = state.rng_mut().random_range(min_x..max_x);
    let id = state.next_entity_id();
    let speed = state.tuning.platform_speed;
    state.platforms.push(Platform::new(id, Vec2::new(x, y), speed));

    log::debug!("Spawned saucer {} at ({:.0}, {:.0})", id, x, y);
    state.push_event(GameEvent::PlatformSpawned { platform_id: id, y });
    Some(id)
}

/// Drop saucers whose top edge has left the bottom of the view
pub fn prune_platforms(state: &mut SessionState) {
    let bottom = state.camera.visible_bottom();
    let before = state.platforms.len();
    state.platforms.retain(|p| p.pos.y <= bottom);

    let removed = before - state.platforms.len();
    if removed > 0 {
        log::debug!("Pruned {} saucer(s) below y={:.0}", removed, bottom);
    }
}

/// Put a power-up on the highest saucer without one, at most once per
/// cooldown. With no eligible saucer the cooldown stays expired so the next
/// frame tries again.
pub fn try_spawn_power_up(state: &mut SessionState, now: f64) -> bool {
    if now - state.last_power_up_spawn < state.tuning.power_up_interval {
        return false;
    }

    let target = state
        .platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.has_power_up)
        .min_by(|(_, a), (_, b)| a.pos.y.total_cmp(&b.pos.y))
        .map(|(i, _)| i);

    let Some(index) = target else {
        return false;
    };

    let kind = PowerUpKind::ALL[state.rng_mut().random_range(0..PowerUpKind::ALL.len())];
    let platform = &mut state.platforms[index];
    if !platform.attach_power_up(kind) {
        return false;
    }

    let platform_id = platform.id;
    state.last_power_up_spawn = now;
    log::debug!("Spawned {:?} on saucer {}", kind, platform_id);
    state.push_event(GameEvent::PowerUpSpawned { platform_id, kind });
    true
}

/// Consume any power-up the character touches and apply its effect
pub fn collect_power_ups(state: &mut SessionState) {
    let character_bounds = state.character.bounds();
    let mut collected = Vec::new();

    for platform in &mut state.platforms {
        let Some(power_up) = platform.power_up.as_mut() else {
            continue;
        };
        if power_up.is_active() && power_up.bounds().intersects(&character_bounds) {
            power_up.consumed = true;
            apply_power_up(&mut state.character, power_up.kind, &state.tuning);
            state.message = Some(PowerUpMessage {
                kind: power_up.kind,
                remaining: state.tuning.message_duration,
            });
            collected.push(power_up.kind);
        }
    }

    for kind in collected {
        state.push_event(GameEvent::PowerUpCollected(kind));
    }
}

/// Count down the "<Name> Activated!" banner
pub fn update_message(state: &mut SessionState, dt: f32) {
    if let Some(message) = state.message.as_mut() {
        message.remaining -= dt;
        if message.remaining <= 0.0 {
            state.message = None;
        }
    }
}

/// Drop a coin above the character once per cooldown
pub fn try_spawn_coin(state: &mut SessionState, now: f64) -> bool {
    if now - state.last_coin_spawn < state.tuning.coin_interval {
        return false;
    }

    let x = state.rng_mut().random_range(0.0..WORLD_WIDTH - COIN_DIAMETER);
    let y = state.character.pos.y - state.tuning.coin_spawn_offset;
    let id = state.next_entity_id();
    state.coins.push(Coin::new(id, Vec2::new(x, y)));
    state.last_coin_spawn = now;

    log::debug!("Spawned coin {} at ({:.0}, {:.0})", id, x, y);
    state.push_event(GameEvent::CoinSpawned { coin_id: id });
    true
}

/// Collect touched coins, then sweep collected ones out
pub fn collect_coins(state: &mut SessionState) {
    let character_bounds = state.character.bounds();
    let value = state.tuning.coin_value;
    let mut collected = 0;

    for coin in &mut state.coins {
        if !coin.collected && coin.bounds().intersects(&character_bounds) {
            coin.collected = true;
            state.progress.add_score(value);
            collected += 1;
        }
    }

    state.coins.retain(|c| !c.collected);

    for _ in 0..collected {
        let score = state.progress.score;
        state.push_event(GameEvent::CoinCollected { score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    fn playing_state() -> SessionState {
        let mut state = SessionState::new(3);
        state.start_run(0.0);
        state.drain_events();
        state
    }

    #[test]
    fn ascent_spawns_exactly_one_saucer_above() {
        let mut state = playing_state();
        let count = state.platforms.len();

        let id = spawn_platform_for_ascent(&mut state, 500.0);
        assert!(id.is_some());
        assert_eq!(state.platforms.len(), count + 1);
        let spawned = state.platforms.last().unwrap();
        assert_eq!(spawned.pos.y, 400.0);
        assert!((100.0..700.0).contains(&spawned.pos.x));
        assert_eq!(state.progress.max_ascent, 500.0);
        assert_eq!(state.progress.next_spawn_height, 400.0);

        // Same or lower landing does not spawn again
        assert!(spawn_platform_for_ascent(&mut state, 500.0).is_none());
        assert!(spawn_platform_for_ascent(&mut state, 550.0).is_none());
        assert_eq!(state.platforms.len(), count + 1);
    }

    #[test]
    fn prune_keeps_saucers_inside_view() {
        let mut state = playing_state();
        state.platforms.push(Platform::new(50, Vec2::new(0.0, 600.0), 0.0));
        state.platforms.push(Platform::new(51, Vec2::new(0.0, 601.0), 0.0));
        prune_platforms(&mut state);
        assert!(state.platforms.iter().any(|p| p.id == 50));
        assert!(!state.platforms.iter().any(|p| p.id == 51));

        state.camera.follow(-1000.0);
        prune_platforms(&mut state);
        assert!(state.platforms.is_empty());
    }

    #[test]
    fn power_up_waits_for_cooldown_and_picks_highest() {
        let mut state = playing_state();
        assert!(!try_spawn_power_up(&mut state, 4.99));
        assert!(try_spawn_power_up(&mut state, 5.0));

        let highest = state
            .platforms
            .iter()
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .unwrap();
        assert!(highest.power_up.is_some());
        assert_eq!(state.last_power_up_spawn, 5.0);

        // Next one goes to the next-highest saucer, after another cooldown
        assert!(!try_spawn_power_up(&mut state, 9.0));
        assert!(try_spawn_power_up(&mut state, 10.0));
        assert_eq!(state.platforms.iter().filter(|p| p.has_power_up).count(), 2);
    }

    #[test]
    fn power_up_cooldown_does_not_rearm_without_target() {
        let mut state = playing_state();
        for platform in &mut state.platforms {
            platform.attach_power_up(PowerUpKind::Magnet);
        }
        assert!(!try_spawn_power_up(&mut state, 6.0));
        assert_eq!(state.last_power_up_spawn, 0.0);

        state.platforms.push(Platform::new(77, Vec2::new(100.0, 100.0), 0.0));
        assert!(try_spawn_power_up(&mut state, 6.1));
        assert!(state.platforms.last().unwrap().power_up.is_some());
    }

    #[test]
    fn power_up_pickup_applies_effect_and_message() {
        let mut state = playing_state();
        state.platforms.truncate(1);
        state.platforms[0].attach_power_up(PowerUpKind::SuperJump);
        let target = state.platforms[0].power_up.as_ref().unwrap().pos;
        state.character.pos = target;

        collect_power_ups(&mut state);
        assert!(state.character.effects.super_jump.active);
        assert!(state.platforms[0].active_power_up().is_none());
        assert_eq!(
            state.message,
            Some(PowerUpMessage {
                kind: PowerUpKind::SuperJump,
                remaining: 2.0
            })
        );
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PowerUpCollected(PowerUpKind::SuperJump)]
        );

        // Consumed power-ups cannot be collected again
        state.character.effects.super_jump.active = false;
        collect_power_ups(&mut state);
        assert!(!state.character.effects.super_jump.active);
    }

    #[test]
    fn latest_power_up_message_wins() {
        let mut state = playing_state();
        state.platforms.truncate(2);
        state.platforms[0].attach_power_up(PowerUpKind::SuperJump);
        state.platforms[1].attach_power_up(PowerUpKind::Magnet);

        state.character.pos = state.platforms[0].power_up.as_ref().unwrap().pos;
        collect_power_ups(&mut state);
        update_message(&mut state, 1.5);

        state.character.pos = state.platforms[1].power_up.as_ref().unwrap().pos;
        collect_power_ups(&mut state);
        let message = state.message.unwrap();
        assert_eq!(message.kind, PowerUpKind::Magnet);
        assert_eq!(message.remaining, 2.0);

        update_message(&mut state, 2.0);
        assert!(state.message.is_none());
    }

    #[test]
    fn power_up_rides_with_saucer() {
        let mut state = playing_state();
        state.platforms.truncate(1);
        state.platforms[0].attach_power_up(PowerUpKind::SpeedBoost);
        update_platforms(&mut state, 1.0);

        let platform = &state.platforms[0];
        let power_up = platform.power_up.as_ref().unwrap();
        assert_eq!(platform.pos.x, 199.75);
        assert_eq!(power_up.bounds().center().x, platform.bounds().center().x);
        assert!((power_up.rotation - 90.0).abs() < 1e-3);
    }

    #[test]
    fn coin_spawns_above_character_after_interval() {
        let mut state = playing_state();
        assert!(!try_spawn_coin(&mut state, 9.99));
        assert!(try_spawn_coin(&mut state, 10.0));
        let coin = &state.coins[0];
        assert_eq!(coin.pos.y, state.character.pos.y - 200.0);
        assert!(coin.pos.x >= 0.0 && coin.pos.x < WORLD_WIDTH - COIN_DIAMETER);

        assert!(!try_spawn_coin(&mut state, 19.0));
        assert!(try_spawn_coin(&mut state, 20.0));
    }

    #[test]
    fn coin_pickup_scores_and_sweeps() {
        let mut state = playing_state();
        let far = state.next_entity_id();
        let near = state.next_entity_id();
        state.coins.push(Coin::new(far, Vec2::new(0.0, -5000.0)));
        state.coins.push(Coin::new(near, state.character.pos));

        collect_coins(&mut state);
        assert_eq!(state.progress.score, 200);
        assert_eq!(state.progress.high_score, 200);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.coins[0].id, far);
        assert_eq!(state.phase, GamePhase::Playing);
    }
}
