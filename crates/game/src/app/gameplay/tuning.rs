use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gameplay constants. Every field has a default, so a tuning file only needs
/// to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameTuning {
    pub(crate) world_max_x: f32,
    pub(crate) world_max_y: f32,
    pub(crate) step: f32,
    /// Minimum spawn distance from the hero, as a share of `world_max_x`.
    pub(crate) safe_start_fraction: f32,
    pub(crate) new_monster_spawning: u32,
    pub(crate) relative_character_size: f32,
    pub(crate) relative_torch_size: f32,
    /// Share of the torch height that counts as lit.
    pub(crate) light_radius_factor: f32,
    pub(crate) flee_speed_factor: f32,
    pub(crate) pursue_speed_factor: f32,
    pub(crate) idle_move_chance: f32,
    pub(crate) idle_step: f32,
    pub(crate) zoom_rate: f32,
    pub(crate) zoom_decay_multiplier: f32,
    pub(crate) reset_zoom: f32,
    pub(crate) max_spawn_attempts: u32,
    pub(crate) torch_height_noise: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            world_max_x: 130.5,
            world_max_y: 97.1,
            step: 0.25,
            safe_start_fraction: 0.25,
            new_monster_spawning: 5,
            relative_character_size: 0.025,
            relative_torch_size: 0.15,
            light_radius_factor: 0.6,
            flee_speed_factor: 0.75,
            pursue_speed_factor: 0.5,
            idle_move_chance: 0.02,
            idle_step: 0.2,
            zoom_rate: 0.001,
            zoom_decay_multiplier: 5.0,
            reset_zoom: 2.0,
            max_spawn_attempts: 64,
            torch_height_noise: 1.5,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum TuningError {
    #[error("failed to read tuning file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse tuning file {} at {json_path}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning value `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl GameTuning {
    pub(crate) fn safe_start_distance(&self) -> f32 {
        self.world_max_x * self.safe_start_fraction
    }

    pub(crate) fn load_from_path(path: &Path) -> Result<Self, TuningError> {
        let raw = fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::parse_json(&raw, path)?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn parse_json(raw: &str, path: &Path) -> Result<Self, TuningError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, GameTuning>(&mut deserializer).map_err(|error| {
            let json_path = error.path().to_string();
            TuningError::Parse {
                path: path.to_path_buf(),
                json_path,
                source: error.into_inner(),
            }
        })
    }

    pub(crate) fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("world_max_x", self.world_max_x),
            ("world_max_y", self.world_max_y),
            ("step", self.step),
            ("relative_character_size", self.relative_character_size),
            ("relative_torch_size", self.relative_torch_size),
            ("light_radius_factor", self.light_radius_factor),
            ("idle_step", self.idle_step),
            ("zoom_rate", self.zoom_rate),
            ("zoom_decay_multiplier", self.zoom_decay_multiplier),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("expected a positive number, got {value}")));
            }
        }

        let unit_interval = [
            ("safe_start_fraction", self.safe_start_fraction),
            ("idle_move_chance", self.idle_move_chance),
        ];
        for (field, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("expected a value in [0, 1], got {value}")));
            }
        }

        let non_negative = [
            ("flee_speed_factor", self.flee_speed_factor),
            ("pursue_speed_factor", self.pursue_speed_factor),
            ("torch_height_noise", self.torch_height_noise),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("expected a non-negative number, got {value}")));
            }
        }

        if !self.reset_zoom.is_finite() || self.reset_zoom < 1.0 {
            return Err(invalid(
                "reset_zoom",
                format!("expected a number >= 1, got {}", self.reset_zoom),
            ));
        }
        if self.new_monster_spawning == 0 {
            return Err(invalid("new_monster_spawning", "expected at least 1"));
        }
        if self.max_spawn_attempts == 0 {
            return Err(invalid("max_spawn_attempts", "expected at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        message: message.into(),
    }
}
