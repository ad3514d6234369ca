use engine::{TorchVisual, ViewportMetrics};
use rand::Rng;

use super::tuning::GameTuning;

const INTENSITY_BASE: f32 = 0.4;
const INTENSITY_SPREAD: f32 = 0.2;

/// Flickering torch glow. Refreshed on the ambient timer, never read by the
/// simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TorchFlicker {
    /// Glow height in viewport units, noise included.
    pub(crate) height: f32,
    pub(crate) intensity: f32,
}

impl TorchFlicker {
    pub(crate) fn steady(tuning: &GameTuning, metrics: ViewportMetrics) -> Self {
        Self {
            height: metrics.reference_height * tuning.relative_torch_size,
            intensity: INTENSITY_BASE + INTENSITY_SPREAD / 2.0,
        }
    }

    pub(crate) fn refresh<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tuning: &GameTuning,
        metrics: ViewportMetrics,
    ) {
        let height_noise =
            rng.gen::<f32>() * tuning.torch_height_noise - tuning.torch_height_noise / 2.0;
        let light_noise = rng.gen::<f32>() * INTENSITY_SPREAD + INTENSITY_BASE;
        self.height = metrics.reference_height * tuning.relative_torch_size + height_noise;
        self.intensity = light_noise;
    }

    /// Glow in world units for the render sink.
    pub(crate) fn visual(&self, metrics: ViewportMetrics) -> TorchVisual {
        TorchVisual {
            height_world: self.height / metrics.scale,
            intensity: self.intensity,
        }
    }
}
