use engine::{
    HeroVisual, InputSnapshot, MonsterVisual, RenderFrame, Scene, Vec2, Viewport, ViewportMetrics,
};
use rand::rngs::StdRng;
use tracing::info;

use super::intent::InputIntent;
use super::messages::MessageProvider;
use super::session::GameSession;
use super::torch::TorchFlicker;

const WINDOW_TITLE_PREFIX: &str = "Torchlight";
/// Monsters are drawn larger than their collision footprint.
const MONSTER_VISUAL_SCALE: f32 = 1.5;

/// Adapts a [`GameSession`] to the engine's scene loop.
pub(crate) struct TorchlightScene {
    session: GameSession,
    messages: Box<dyn MessageProvider>,
    torch: TorchFlicker,
    ambient_rng: StdRng,
    monster_visuals: Vec<MonsterVisual>,
}

impl TorchlightScene {
    pub(crate) fn new(
        session: GameSession,
        messages: Box<dyn MessageProvider>,
        ambient_rng: StdRng,
    ) -> Self {
        let torch = TorchFlicker::steady(session.tuning(), session.viewport_metrics());
        Self {
            session,
            messages,
            torch,
            ambient_rng,
            monster_visuals: Vec::new(),
        }
    }

    fn apply_window_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let metrics = ViewportMetrics::from_size(width, height);
        if metrics != self.session.viewport_metrics() {
            info!(
                width,
                height,
                reference_height = metrics.reference_height,
                "viewport_metrics_changed"
            );
            self.session.set_viewport_metrics(metrics);
        }
    }

    fn sync_monster_visuals(&mut self) {
        self.monster_visuals.clear();
        self.monster_visuals
            .extend(self.session.monsters().iter().map(|monster| MonsterVisual {
                position: monster.position,
                carries_key: monster.carries_key,
            }));
    }

    /// Character size in world units for the current viewport.
    fn character_size_world(&self) -> f32 {
        let metrics = self.session.viewport_metrics();
        metrics.reference_height * self.session.tuning().relative_character_size / metrics.scale
    }
}

impl Scene for TorchlightScene {
    fn load(&mut self, viewport: Viewport) {
        self.apply_window_size(viewport.width, viewport.height);
        self.torch = TorchFlicker::steady(self.session.tuning(), self.session.viewport_metrics());
        self.sync_monster_visuals();
        info!(
            state = ?self.session.state(),
            monster_count = self.session.monster_count(),
            "scene_loaded"
        );
    }

    fn update(&mut self, input: &InputSnapshot) {
        let (width, height) = input.window_size();
        self.apply_window_size(width, height);

        if input.advance_pressed() {
            self.session.advance();
        }
        self.session.tick(InputIntent::from_snapshot(input));
        self.sync_monster_visuals();
    }

    fn refresh_ambient(&mut self, viewport: Viewport) {
        if viewport.width == 0 || viewport.height == 0 {
            return;
        }
        let metrics = ViewportMetrics::for_viewport(viewport);
        self.torch
            .refresh(&mut self.ambient_rng, self.session.tuning(), metrics);
    }

    fn render_frame(&self) -> RenderFrame<'_> {
        let tuning = self.session.tuning();
        let metrics = self.session.viewport_metrics();
        let hero = self.session.hero();
        let character_size = self.character_size_world();
        RenderFrame {
            world_extent: Vec2::new(
                tuning.world_max_x + character_size,
                tuning.world_max_y + character_size,
            ),
            hero: HeroVisual {
                position: hero.position,
                facing: hero.facing,
                size_world: character_size,
            },
            monsters: &self.monster_visuals,
            monster_size_world: character_size * MONSTER_VISUAL_SCALE,
            zoom: self.session.zoom(),
            torch: self.torch.visual(metrics),
            message: self.messages.message(self.session.state()),
        }
    }

    fn unload(&mut self) {
        info!(
            state = ?self.session.state(),
            monster_count = self.session.monster_count(),
            "scene_unloaded"
        );
    }

    fn title(&self) -> Option<String> {
        self.messages
            .message(self.session.state())
            .map(|message| format!("{WINDOW_TITLE_PREFIX} - {message}"))
    }
}

#[cfg(test)]
mod tests {
    use engine::InputAction;
    use rand::SeedableRng;

    use super::super::messages::DefaultMessages;
    use super::super::state::GameState;
    use super::super::tuning::GameTuning;
    use super::*;

    const WINDOW: (u32, u32) = (1600, 900);

    fn loaded_scene() -> TorchlightScene {
        let session = GameSession::new(GameTuning::default(), StdRng::seed_from_u64(8));
        let mut scene = TorchlightScene::new(
            session,
            Box::new(DefaultMessages),
            StdRng::seed_from_u64(9),
        );
        scene.load(Viewport {
            width: WINDOW.0,
            height: WINDOW.1,
        });
        scene
    }

    fn advance(scene: &mut TorchlightScene) {
        scene.update(
            &InputSnapshot::empty()
                .with_advance_pressed(true)
                .with_window_size(WINDOW),
        );
    }

    #[test]
    fn menu_frame_shows_message_and_title() {
        let scene = loaded_scene();
        let frame = scene.render_frame();
        assert!(frame.message.is_some());
        assert!(frame.monsters.is_empty());
        let title = scene.title().expect("menu title");
        assert!(title.starts_with("Torchlight - "));
    }

    #[test]
    fn three_advances_start_playing_and_expose_monsters() {
        let mut scene = loaded_scene();
        for _ in 0..3 {
            advance(&mut scene);
        }
        assert_eq!(scene.session.state(), GameState::Playing);

        let frame = scene.render_frame();
        assert!(frame.message.is_none());
        assert_eq!(frame.monsters.len(), 1);
        assert!(frame.monsters[0].carries_key);
        assert!(scene.title().is_none());
        assert!((frame.hero.size_world - 2.5).abs() < 1e-4);
        assert!((frame.monster_size_world - 3.75).abs() < 1e-4);
    }

    #[test]
    fn held_movement_moves_hero_during_play() {
        let mut scene = loaded_scene();
        for _ in 0..3 {
            advance(&mut scene);
        }
        let start = scene.session.hero().position;
        scene.update(
            &InputSnapshot::empty()
                .with_action_down(InputAction::MoveDown, true)
                .with_window_size(WINDOW),
        );
        let moved = scene.session.hero().position;
        let expected_y = (start.y + 0.25).min(scene.session.tuning().world_max_y);
        assert_eq!(scene.session.state(), GameState::Playing);
        assert!((moved.y - expected_y).abs() < 1e-5);
        assert_eq!(moved.x, start.x);
    }

    #[test]
    fn resize_updates_viewport_metrics() {
        let mut scene = loaded_scene();
        scene.update(&InputSnapshot::empty().with_window_size((600, 900)));
        assert_eq!(scene.session.viewport_metrics().reference_height, 75.0);
    }

    #[test]
    fn ambient_refresh_only_touches_torch() {
        let mut scene = loaded_scene();
        for _ in 0..3 {
            advance(&mut scene);
        }
        let hero_before = *scene.session.hero();
        let zoom_before = scene.session.zoom();
        scene.refresh_ambient(Viewport {
            width: WINDOW.0,
            height: WINDOW.1,
        });
        assert_eq!(*scene.session.hero(), hero_before);
        assert_eq!(scene.session.zoom(), zoom_before);
        let torch = scene.render_frame().torch;
        assert!(torch.intensity >= 0.4 && torch.intensity < 0.6 + 1e-6);
    }
}
