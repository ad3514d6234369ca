use super::tuning::GameTuning;

const MIN_ZOOM: f32 = 1.0;

/// Camera zoom that creeps in while something is inside the light and backs
/// out faster otherwise. Never drops below 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CameraZoom {
    value: f32,
}

impl CameraZoom {
    pub(crate) fn new(start: f32) -> Self {
        Self {
            value: start.max(MIN_ZOOM),
        }
    }

    pub(crate) fn value(self) -> f32 {
        self.value
    }

    pub(crate) fn step(&mut self, any_near: bool, tuning: &GameTuning) {
        if any_near {
            self.value += tuning.zoom_rate;
        } else {
            let decay = tuning.zoom_rate * tuning.zoom_decay_multiplier;
            self.value = (self.value - decay).max(MIN_ZOOM);
        }
    }
}
