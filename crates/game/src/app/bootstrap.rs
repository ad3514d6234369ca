use std::env;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, GameTuning, TuningError};

const TUNING_ENV_VAR: &str = "TORCHLIGHT_TUNING";
const SEED_ENV_VAR: &str = "TORCHLIGHT_SEED";
const DEFAULT_TUNING_FILE: &str = "tuning.json";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("TORCHLIGHT_SEED must be an unsigned 64-bit integer, got {raw:?}: {source}")]
    InvalidSeed {
        raw: String,
        #[source]
        source: ParseIntError,
    },
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    info!("=== Torchlight Startup ===");

    let app_paths = resolve_app_paths()?;
    let tuning_path = resolve_tuning_path(
        env::var_os(TUNING_ENV_VAR).map(PathBuf::from),
        &app_paths.assets_dir,
    );
    let tuning = match &tuning_path {
        Some(path) => GameTuning::load_from_path(path)?,
        None => GameTuning::default(),
    };
    let seed = match read_seed_from_env()? {
        Some(seed) => seed,
        None => rand::random(),
    };

    let tuning_source = tuning_path
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    info!(
        root = %app_paths.root.display(),
        tuning = %tuning_source,
        seed,
        "bootstrap_resolved"
    );

    let config = LoopConfig {
        asset_root: app_paths.assets_dir,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: gameplay::build_scene(tuning, seed),
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// An explicit path is used even when it does not exist; only the default
/// location is optional.
fn resolve_tuning_path(explicit: Option<PathBuf>, assets_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
        return Some(path);
    }
    let default_path = assets_dir.join(DEFAULT_TUNING_FILE);
    default_path.is_file().then_some(default_path)
}

fn read_seed_from_env() -> Result<Option<u64>, BootstrapError> {
    match env::var(SEED_ENV_VAR) {
        Ok(raw) => parse_seed(&raw).map(Some),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(BootstrapError::EnvVar {
            var: SEED_ENV_VAR,
            source,
        }),
    }
}

fn parse_seed(raw: &str) -> Result<u64, BootstrapError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|source| BootstrapError::InvalidSeed {
            raw: raw.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn explicit_tuning_path_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(DEFAULT_TUNING_FILE), "{}").expect("default tuning");
        let explicit = PathBuf::from("/elsewhere/tuning.json");

        assert_eq!(
            resolve_tuning_path(Some(explicit.clone()), dir.path()),
            Some(explicit)
        );
    }

    #[test]
    fn default_tuning_file_is_used_when_present() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join(DEFAULT_TUNING_FILE);
        fs::write(&default_path, "{}").expect("default tuning");

        assert_eq!(resolve_tuning_path(None, dir.path()), Some(default_path.clone()));
        assert_eq!(
            resolve_tuning_path(Some(PathBuf::new()), dir.path()),
            Some(default_path)
        );
    }

    #[test]
    fn missing_default_tuning_means_builtin_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(resolve_tuning_path(None, dir.path()), None);
    }

    #[test]
    fn seed_parses_with_surrounding_whitespace() {
        assert_eq!(parse_seed(" 42\n").expect("seed"), 42);
    }

    #[test]
    fn invalid_seed_is_reported() {
        let error = parse_seed("forty-two").expect_err("invalid seed");
        assert!(matches!(error, BootstrapError::InvalidSeed { .. }));
        assert!(error.to_string().contains("TORCHLIGHT_SEED"));
    }
}
