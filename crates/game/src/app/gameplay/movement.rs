use std::f32::consts::{SQRT_2, TAU};

use engine::{Facing, Vec2};
use rand::Rng;

use super::entities::{Hero, Monster};
use super::intent::InputIntent;
use super::tuning::GameTuning;

pub(crate) fn hero_bounds(tuning: &GameTuning) -> Vec2 {
    Vec2::new(tuning.world_max_x, tuning.world_max_y)
}

/// Applies one tick of movement intent to the hero. Diagonal steps are scaled
/// down so every step has length `step`.
pub(crate) fn move_hero(hero: &mut Hero, intent: InputIntent, tuning: &GameTuning) {
    let mut dx = f32::from(intent.axis_x) * tuning.step;
    let mut dy = f32::from(intent.axis_y) * tuning.step;
    if intent.is_diagonal() {
        dx /= SQRT_2;
        dy /= SQRT_2;
    }

    match intent.axis_x {
        x if x < 0 => hero.facing = Facing::Left,
        x if x > 0 => hero.facing = Facing::Right,
        _ => {}
    }

    hero.position = Vec2::new(hero.position.x + dx, hero.position.y + dy)
        .clamped(Vec2::ZERO, hero_bounds(tuning));
}

/// Moves a monster that is inside the light: the key carrier runs away, every
/// other monster closes in.
///
/// `overshoot` widens the upper bounds so a fleeing monster can slip slightly
/// past the hero's own limits.
pub(crate) fn chase_or_flee(
    monster: &mut Monster,
    hero_position: Vec2,
    overshoot: f32,
    tuning: &GameTuning,
) {
    let angle =
        (hero_position.y - monster.position.y).atan2(hero_position.x - monster.position.x);
    let (direction, speed_factor) = if monster.carries_key {
        (-1.0, tuning.flee_speed_factor)
    } else {
        (1.0, tuning.pursue_speed_factor)
    };
    let distance = tuning.step * speed_factor * direction;

    let upper = Vec2::new(tuning.world_max_x + overshoot, tuning.world_max_y + overshoot);
    monster.position = Vec2::new(
        monster.position.x + angle.cos() * distance,
        monster.position.y + angle.sin() * distance,
    )
    .clamped(Vec2::ZERO, upper);
}

/// Occasional random shuffle for monsters outside the light.
pub(crate) fn idle_wander<R: Rng + ?Sized>(
    monster: &mut Monster,
    rng: &mut R,
    tuning: &GameTuning,
) {
    let roll = rng.gen::<f32>();
    if roll < 1.0 - tuning.idle_move_chance {
        return;
    }

    let angle = rng.gen::<f32>() * TAU;
    monster.position = Vec2::new(
        monster.position.x + angle.cos() * tuning.idle_step,
        monster.position.y + angle.sin() * tuning.idle_step,
    )
    .clamped(Vec2::ZERO, hero_bounds(tuning));
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const EPSILON: f32 = 1e-5;

    fn displacement_after(intent: InputIntent) -> f32 {
        let tuning = GameTuning::default();
        let start = Vec2::new(60.0, 40.0);
        let mut hero = Hero::at(start);
        move_hero(&mut hero, intent, &tuning);
        hero.position.distance_to(start)
    }

    #[test]
    fn single_axis_step_has_exact_length() {
        for intent in [
            InputIntent::new(1, 0),
            InputIntent::new(-1, 0),
            InputIntent::new(0, 1),
            InputIntent::new(0, -1),
        ] {
            assert_eq!(displacement_after(intent), 0.25);
        }
    }

    #[test]
    fn diagonal_step_is_normalized() {
        for intent in [
            InputIntent::new(1, 1),
            InputIntent::new(-1, 1),
            InputIntent::new(1, -1),
            InputIntent::new(-1, -1),
        ] {
            assert!((displacement_after(intent) - 0.25).abs() < EPSILON);
        }
    }

    #[test]
    fn step_left_from_ten_ten() {
        let tuning = GameTuning::default();
        let mut hero = Hero::at(Vec2::new(10.0, 10.0));
        move_hero(&mut hero, InputIntent::new(-1, 0), &tuning);
        assert_eq!(hero.position, Vec2::new(9.75, 10.0));
        assert_eq!(hero.facing, Facing::Left);
    }

    #[test]
    fn facing_persists_without_horizontal_intent() {
        let tuning = GameTuning::default();
        let mut hero = Hero::at(Vec2::new(10.0, 10.0));
        move_hero(&mut hero, InputIntent::new(-1, 0), &tuning);
        move_hero(&mut hero, InputIntent::new(0, 1), &tuning);
        move_hero(&mut hero, InputIntent::default(), &tuning);
        assert_eq!(hero.facing, Facing::Left);

        move_hero(&mut hero, InputIntent::new(1, -1), &tuning);
        assert_eq!(hero.facing, Facing::Right);
    }

    #[test]
    fn hero_stays_in_bounds_for_any_input_sequence() {
        let tuning = GameTuning::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut hero = Hero::at(Vec2::new(0.1, tuning.world_max_y - 0.1));
        for _ in 0..5_000 {
            let intent = InputIntent::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1));
            move_hero(&mut hero, intent, &tuning);
            assert!(hero.position.x >= 0.0 && hero.position.x <= tuning.world_max_x);
            assert!(hero.position.y >= 0.0 && hero.position.y <= tuning.world_max_y);
        }
    }

    #[test]
    fn hero_is_clamped_at_origin() {
        let tuning = GameTuning::default();
        let mut hero = Hero::at(Vec2::new(0.1, 0.1));
        move_hero(&mut hero, InputIntent::new(-1, -1), &tuning);
        assert_eq!(hero.position, Vec2::ZERO);
    }

    #[test]
    fn plain_monster_pursues_at_half_step() {
        let tuning = GameTuning::default();
        let mut monster = Monster {
            position: Vec2::new(50.0, 50.0),
            carries_key: false,
        };
        chase_or_flee(&mut monster, Vec2::new(55.0, 50.0), 1.25, &tuning);
        assert!((monster.position.x - 50.125).abs() < EPSILON);
        assert!((monster.position.y - 50.0).abs() < EPSILON);
    }

    #[test]
    fn key_monster_flees_at_three_quarter_step() {
        let tuning = GameTuning::default();
        let mut monster = Monster {
            position: Vec2::new(50.0, 50.0),
            carries_key: true,
        };
        chase_or_flee(&mut monster, Vec2::new(50.0, 45.0), 1.25, &tuning);
        assert!((monster.position.x - 50.0).abs() < EPSILON);
        assert!((monster.position.y - 50.1875).abs() < EPSILON);
    }

    #[test]
    fn fleeing_monster_may_pass_hero_bounds_by_overshoot() {
        let tuning = GameTuning::default();
        let mut monster = Monster {
            position: Vec2::new(tuning.world_max_x, 50.0),
            carries_key: true,
        };
        for _ in 0..100 {
            let hero_position = Vec2::new(tuning.world_max_x - 5.0, 50.0);
            chase_or_flee(&mut monster, hero_position, 1.25, &tuning);
        }
        assert!((monster.position.x - (tuning.world_max_x + 1.25)).abs() < EPSILON);
    }

    #[test]
    fn idle_roll_below_threshold_leaves_monster_in_place() {
        let tuning = GameTuning::default();
        let mut rng = StepRng::new(0, 0);
        let mut monster = Monster {
            position: Vec2::new(20.0, 30.0),
            carries_key: false,
        };
        for _ in 0..100 {
            idle_wander(&mut monster, &mut rng, &tuning);
        }
        assert_eq!(monster.position, Vec2::new(20.0, 30.0));
    }

    #[test]
    fn idle_roll_above_threshold_moves_by_idle_step() {
        let tuning = GameTuning::default();
        let mut rng = StepRng::new(u64::MAX, 0);
        let start = Vec2::new(20.0, 30.0);
        let mut monster = Monster {
            position: start,
            carries_key: false,
        };
        idle_wander(&mut monster, &mut rng, &tuning);
        assert!((monster.position.distance_to(start) - tuning.idle_step).abs() < 1e-4);
    }

    #[test]
    fn idle_move_pulls_a_fled_monster_back_inside_hero_bounds() {
        let tuning = GameTuning::default();
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut monster = Monster {
            position: Vec2::new(tuning.world_max_x + 1.0, tuning.world_max_y + 1.0),
            carries_key: true,
        };
        idle_wander(&mut monster, &mut rng, &tuning);
        assert_eq!(monster.position.x, tuning.world_max_x);
        assert_eq!(monster.position.y, tuning.world_max_y);
    }

    #[test]
    fn idle_move_is_clamped_at_origin() {
        let tuning = GameTuning::default();
        // Roll reads as ~1.0, then the next draw reads as 0.625 of a turn (down-left).
        let mut rng = StepRng::new(u64::MAX, 0xA000_0001);
        let mut monster = Monster {
            position: Vec2::ZERO,
            carries_key: false,
        };
        idle_wander(&mut monster, &mut rng, &tuning);
        assert_eq!(monster.position, Vec2::ZERO);
    }
}
