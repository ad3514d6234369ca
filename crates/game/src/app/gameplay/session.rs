use engine::ViewportMetrics;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use super::camera::CameraZoom;
use super::entities::{spawn_hero, spawn_monsters, Hero, Monster};
use super::intent::InputIntent;
use super::movement::{chase_or_flee, idle_wander, move_hero};
use super::proximity::{CollisionOutcome, ProximityRules};
use super::state::{GameState, Transition};
use super::tuning::GameTuning;

/// Everything one running game owns: flow state, entities, zoom and the
/// random source the simulation draws from.
#[derive(Debug)]
pub(crate) struct GameSession<R = StdRng> {
    tuning: GameTuning,
    rng: R,
    state: GameState,
    hero: Hero,
    monsters: Vec<Monster>,
    zoom: CameraZoom,
    monster_count: u32,
    viewport_metrics: ViewportMetrics,
}

impl<R: Rng> GameSession<R> {
    pub(crate) fn new(tuning: GameTuning, mut rng: R) -> Self {
        let hero = spawn_hero(&mut rng, &tuning);
        let zoom = CameraZoom::new(tuning.reset_zoom);
        Self {
            tuning,
            rng,
            state: GameState::Menu,
            hero,
            monsters: Vec::new(),
            zoom,
            monster_count: 1,
            viewport_metrics: ViewportMetrics::from_size(4, 3),
        }
    }

    pub(crate) fn tuning(&self) -> &GameTuning {
        &self.tuning
    }

    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn hero(&self) -> &Hero {
        &self.hero
    }

    pub(crate) fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub(crate) fn zoom(&self) -> f32 {
        self.zoom.value()
    }

    pub(crate) fn monster_count(&self) -> u32 {
        self.monster_count
    }

    pub(crate) fn viewport_metrics(&self) -> ViewportMetrics {
        self.viewport_metrics
    }

    pub(crate) fn set_viewport_metrics(&mut self, metrics: ViewportMetrics) {
        self.viewport_metrics = metrics;
    }

    /// Handles the advance action for the current state.
    pub(crate) fn advance(&mut self) {
        match self
            .state
            .on_advance(self.monster_count, self.tuning.new_monster_spawning)
        {
            Transition::Show(next) => self.change_state(next),
            Transition::Reset { monster_count } => self.reset(monster_count),
            Transition::Ignore => {}
        }
    }

    /// Starts a new round: fresh hero position, reset zoom and a new batch of
    /// `monster_count` monsters kept clear of the hero. The hero keeps facing
    /// the way it last moved.
    pub(crate) fn reset(&mut self, monster_count: u32) {
        self.monster_count = monster_count.max(1);
        self.zoom = CameraZoom::new(self.tuning.reset_zoom);
        let facing = self.hero.facing;
        self.hero = spawn_hero(&mut self.rng, &self.tuning);
        self.hero.facing = facing;
        self.monsters = spawn_monsters(
            &mut self.rng,
            self.hero.position,
            self.monster_count,
            &self.tuning,
        );
        info!(
            monster_count = self.monster_count,
            hero_x = self.hero.position.x,
            hero_y = self.hero.position.y,
            "session_reset"
        );
        self.change_state(GameState::Playing);
    }

    /// Advances the simulation by one tick. Does nothing outside `Playing`.
    ///
    /// Order: hero, then each monster by its own distance to the hero, then
    /// zoom, then collision.
    pub(crate) fn tick(&mut self, intent: InputIntent) -> Option<CollisionOutcome> {
        if !self.state.is_playing() {
            return None;
        }

        move_hero(&mut self.hero, intent, &self.tuning);

        let rules = ProximityRules::new(&self.tuning, self.viewport_metrics);
        let hero_position = self.hero.position;
        let mut any_near = false;
        for monster in &mut self.monsters {
            if rules.is_near(hero_position, monster.position) {
                any_near = true;
                chase_or_flee(
                    monster,
                    hero_position,
                    rules.character_half_extent,
                    &self.tuning,
                );
            } else {
                idle_wander(monster, &mut self.rng, &self.tuning);
            }
        }
        self.zoom.step(any_near, &self.tuning);

        let outcome = rules
            .first_collision(hero_position, &self.monsters)
            .map(CollisionOutcome::for_monster)?;
        info!(
            outcome = ?outcome,
            monster_count = self.monster_count,
            "collision"
        );
        self.change_state(match outcome {
            CollisionOutcome::Win => GameState::Win,
            CollisionOutcome::Lose => GameState::Lose,
        });
        Some(outcome)
    }

    fn change_state(&mut self, next: GameState) {
        if next == self.state {
            return;
        }
        debug!(from = ?self.state, to = ?next, "state_changed");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use engine::{Facing, Vec2};
    use rand::SeedableRng;

    use super::*;

    fn seeded_session(seed: u64) -> GameSession {
        let mut session = GameSession::new(GameTuning::default(), StdRng::seed_from_u64(seed));
        session.set_viewport_metrics(ViewportMetrics::from_size(1600, 900));
        session
    }

    fn playing_with(hero: Vec2, monsters: &[(f32, f32, bool)]) -> GameSession {
        let mut session = seeded_session(1);
        session.reset(monsters.len() as u32);
        session.hero = Hero::at(hero);
        session.monsters = monsters
            .iter()
            .map(|&(x, y, carries_key)| Monster {
                position: Vec2::new(x, y),
                carries_key,
            })
            .collect();
        session
    }

    #[test]
    fn new_session_starts_in_menu_with_one_monster() {
        let session = seeded_session(0);
        assert_eq!(session.state(), GameState::Menu);
        assert_eq!(session.monster_count(), 1);
        assert!(session.monsters().is_empty());
    }

    #[test]
    fn tick_outside_playing_is_a_no_op() {
        let mut session = seeded_session(0);
        let hero_before = *session.hero();
        assert_eq!(session.tick(InputIntent::new(1, 0)), None);
        assert_eq!(*session.hero(), hero_before);
        assert_eq!(session.zoom(), 2.0);
    }

    #[test]
    fn third_advance_starts_first_round() {
        let mut session = seeded_session(4);
        session.advance();
        assert_eq!(session.state(), GameState::Tutorial1);
        session.advance();
        assert_eq!(session.state(), GameState::Tutorial2);
        session.advance();
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.monster_count(), 1);
        assert_eq!(session.monsters().len(), 1);
        assert_eq!(session.zoom(), 2.0);
    }

    #[test]
    fn reset_produces_safe_batch_with_one_key() {
        let mut session = seeded_session(9);
        session.reset(8);
        let safe = session.tuning().safe_start_distance();
        assert_eq!(session.monsters().len(), 8);
        assert_eq!(session.monsters().iter().filter(|m| m.carries_key).count(), 1);
        for monster in session.monsters() {
            assert!(monster.position.distance_to(session.hero().position) >= safe);
        }
    }

    #[test]
    fn touching_key_monster_wins() {
        let mut session = playing_with(
            Vec2::new(50.0, 50.0),
            &[(51.0, 50.0, true), (90.0, 10.0, false)],
        );
        assert_eq!(session.tick(InputIntent::default()), Some(CollisionOutcome::Win));
        assert_eq!(session.state(), GameState::Win);
    }

    #[test]
    fn touching_plain_monster_loses() {
        let mut session = playing_with(
            Vec2::new(50.0, 50.0),
            &[(90.0, 10.0, true), (50.0, 51.0, false)],
        );
        assert_eq!(session.tick(InputIntent::default()), Some(CollisionOutcome::Lose));
        assert_eq!(session.state(), GameState::Lose);

        session.advance();
        assert_eq!(session.state(), GameState::Menu);
    }

    #[test]
    fn no_collision_keeps_playing() {
        let mut session = playing_with(
            Vec2::new(50.0, 50.0),
            &[(120.0, 90.0, true), (5.0, 5.0, false)],
        );
        assert_eq!(session.tick(InputIntent::new(0, 1)), None);
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.hero().position, Vec2::new(50.0, 50.25));
    }

    #[test]
    fn advance_is_ignored_while_playing() {
        let mut session = playing_with(Vec2::new(50.0, 50.0), &[(120.0, 90.0, true)]);
        session.advance();
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.monster_count(), 1);
    }

    #[test]
    fn zoom_tracks_monsters_inside_the_light() {
        let mut session = playing_with(Vec2::new(50.0, 50.0), &[(56.0, 50.0, true)]);
        let mut previous = session.zoom();
        for _ in 0..10 {
            session.tick(InputIntent::default());
            assert!(session.zoom() > previous);
            previous = session.zoom();
        }

        let mut session = playing_with(Vec2::new(10.0, 10.0), &[(120.0, 90.0, true)]);
        let mut previous = session.zoom();
        for _ in 0..300 {
            session.tick(InputIntent::default());
            assert!(session.zoom() <= previous);
            assert!(session.zoom() >= 1.0);
            previous = session.zoom();
        }
        assert_eq!(session.zoom(), 1.0);
    }

    #[test]
    fn nearby_key_monster_runs_and_plain_monster_closes_in() {
        let hero = Vec2::new(50.0, 50.0);
        let mut session = playing_with(hero, &[(55.0, 50.0, true), (45.0, 50.0, false)]);
        session.tick(InputIntent::default());
        assert!(session.monsters()[0].position.x > 55.0);
        assert!(session.monsters()[1].position.x > 45.0);
    }

    #[test]
    fn first_win_detours_through_third_tutorial() {
        let mut session = playing_with(Vec2::new(50.0, 50.0), &[(51.0, 50.0, true)]);
        session.tick(InputIntent::default());
        assert_eq!(session.state(), GameState::Win);

        session.advance();
        assert_eq!(session.state(), GameState::Tutorial3Pending);
        assert_eq!(session.monster_count(), 1);

        session.advance();
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.monster_count(), 5);
        assert_eq!(session.monsters().len(), 5);
    }

    #[test]
    fn later_win_replays_with_more_monsters() {
        let mut session = playing_with(
            Vec2::new(50.0, 50.0),
            &[(51.0, 50.0, true), (100.0, 10.0, false), (10.0, 90.0, false)],
        );
        assert_eq!(session.monster_count(), 3);
        session.tick(InputIntent::default());
        assert_eq!(session.state(), GameState::Win);

        session.advance();
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(session.monster_count(), 8);
        assert_eq!(session.monsters().len(), 8);
        assert_eq!(session.zoom(), 2.0);
    }

    #[test]
    fn facing_carries_into_the_next_round() {
        let mut session = playing_with(Vec2::new(50.0, 50.0), &[(120.0, 90.0, true)]);
        session.tick(InputIntent::new(-1, 0));
        assert_eq!(session.hero().facing, Facing::Left);

        session.reset(3);
        assert_eq!(session.hero().facing, Facing::Left);
    }

    #[test]
    fn hero_stays_in_bounds_over_long_sessions() {
        let mut session = seeded_session(21);
        session.reset(5);
        let mut rng = StdRng::seed_from_u64(99);
        let tuning = session.tuning().clone();
        for _ in 0..10_000 {
            if !session.state().is_playing() {
                session.reset(5);
            }
            let intent = InputIntent::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1));
            session.tick(intent);
            let position = session.hero().position;
            assert!(position.x >= 0.0 && position.x <= tuning.world_max_x);
            assert!(position.y >= 0.0 && position.y <= tuning.world_max_y);
        }
    }
}
