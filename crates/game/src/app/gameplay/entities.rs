use engine::{Facing, Vec2};
use rand::Rng;
use tracing::warn;

use super::tuning::GameTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Hero {
    pub(crate) position: Vec2,
    pub(crate) facing: Facing,
}

impl Hero {
    pub(crate) fn at(position: Vec2) -> Self {
        Self {
            position,
            facing: Facing::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Monster {
    pub(crate) position: Vec2,
    pub(crate) carries_key: bool,
}

pub(crate) fn random_world_position<R: Rng + ?Sized>(rng: &mut R, tuning: &GameTuning) -> Vec2 {
    Vec2::new(
        rng.gen::<f32>() * tuning.world_max_x,
        rng.gen::<f32>() * tuning.world_max_y,
    )
}

pub(crate) fn spawn_hero<R: Rng + ?Sized>(rng: &mut R, tuning: &GameTuning) -> Hero {
    Hero::at(random_world_position(rng, tuning))
}

/// Builds a fresh batch of `count` monsters (at least one), exactly one of
/// which carries the key.
///
/// Each monster is resampled until it lies at least the safe-start distance
/// from `hero_position`. After `max_spawn_attempts` misses it is placed at the
/// world corner farthest from the hero.
pub(crate) fn spawn_monsters<R: Rng + ?Sized>(
    rng: &mut R,
    hero_position: Vec2,
    count: u32,
    tuning: &GameTuning,
) -> Vec<Monster> {
    let count = count.max(1) as usize;
    let mut monsters = Vec::with_capacity(count);
    let mut fallbacks = 0u32;
    for _ in 0..count {
        let position = match sample_safe_position(rng, hero_position, tuning) {
            Some(position) => position,
            None => {
                fallbacks = fallbacks.saturating_add(1);
                farthest_corner(hero_position, tuning)
            }
        };
        monsters.push(Monster {
            position,
            carries_key: false,
        });
    }

    if fallbacks > 0 {
        warn!(
            fallbacks,
            max_spawn_attempts = tuning.max_spawn_attempts,
            safe_start_distance = tuning.safe_start_distance(),
            "spawn_fallback_used"
        );
    }

    let key_index = rng.gen_range(0..count);
    monsters[key_index].carries_key = true;
    monsters
}

fn sample_safe_position<R: Rng + ?Sized>(
    rng: &mut R,
    hero_position: Vec2,
    tuning: &GameTuning,
) -> Option<Vec2> {
    let safe_distance = tuning.safe_start_distance();
    (0..tuning.max_spawn_attempts.max(1))
        .map(|_| random_world_position(rng, tuning))
        .find(|candidate| candidate.distance_to(hero_position) >= safe_distance)
}

fn farthest_corner(hero_position: Vec2, tuning: &GameTuning) -> Vec2 {
    let x = if hero_position.x * 2.0 < tuning.world_max_x {
        tuning.world_max_x
    } else {
        0.0
    };
    let y = if hero_position.y * 2.0 < tuning.world_max_y {
        tuning.world_max_y
    } else {
        0.0
    };
    Vec2::new(x, y)
}
