mod camera;
mod entities;
mod intent;
mod messages;
mod movement;
mod proximity;
mod scene_impl;
mod session;
mod state;
mod torch;
mod tuning;

use engine::Scene;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub(crate) use tuning::{GameTuning, TuningError};

use messages::DefaultMessages;
use scene_impl::TorchlightScene;
use session::GameSession;

/// Ambient effects draw from their own stream, separate from the simulation.
const AMBIENT_SEED_SALT: u64 = 0x7f4a_7c15_9e37_79b9;

pub(crate) fn build_scene(tuning: GameTuning, seed: u64) -> Box<dyn Scene> {
    let session = GameSession::new(tuning, StdRng::seed_from_u64(seed));
    let ambient_rng = StdRng::seed_from_u64(seed ^ AMBIENT_SEED_SALT);
    Box::new(TorchlightScene::new(
        session,
        Box::new(DefaultMessages),
        ambient_rng,
    ))
}
