use engine::{Vec2, ViewportMetrics};

use super::entities::Monster;
use super::tuning::GameTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CollisionOutcome {
    Win,
    Lose,
}

/// Distances that depend on the viewport aspect ratio, derived once per tick
/// from [`ViewportMetrics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProximityRules {
    pub(crate) light_radius: f32,
    pub(crate) collision_distance: f32,
    /// Half the hero's size; how far a chasing monster may leave the hero bounds.
    pub(crate) character_half_extent: f32,
}

impl ProximityRules {
    pub(crate) fn new(tuning: &GameTuning, metrics: ViewportMetrics) -> Self {
        let reference_height = metrics.reference_height;
        let hero_size = tuning.relative_character_size * reference_height;
        let monster_size = tuning.relative_character_size / 2.0 * reference_height;
        Self {
            light_radius: tuning.relative_torch_size
                * reference_height
                * tuning.light_radius_factor,
            collision_distance: (hero_size + monster_size) / 2.0,
            character_half_extent: hero_size / 2.0,
        }
    }

    pub(crate) fn is_near(&self, hero_position: Vec2, monster_position: Vec2) -> bool {
        hero_position.distance_to(monster_position) < self.light_radius
    }

    /// First monster in list order touching the hero, if any.
    pub(crate) fn first_collision<'a>(
        &self,
        hero_position: Vec2,
        monsters: &'a [Monster],
    ) -> Option<&'a Monster> {
        monsters
            .iter()
            .find(|monster| hero_position.distance_to(monster.position) < self.collision_distance)
    }
}

impl CollisionOutcome {
    pub(crate) fn for_monster(monster: &Monster) -> Self {
        if monster.carries_key {
            Self::Win
        } else {
            Self::Lose
        }
    }
}
