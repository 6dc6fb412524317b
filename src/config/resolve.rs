use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Settings};

pub const CONFIG_FILE_NAME: &str = "batchgraph.toml";

#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub settings: Settings,
    /// Path the settings were read from, if any file was found.
    pub path: Option<PathBuf>,
}

/// Resolves and loads settings. An explicit path wins, then
/// `BATCHGRAPH_CONFIG`, then the nearest `batchgraph.toml` above `start`.
/// With none of those, defaults are used. Env overrides for the source
/// paths are applied last.
pub fn load_config_with_override(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<LoadedConfig, ConfigError> {
    let path = match config_path {
        Some(path) => Some(require_file(path)?),
        None => match env::var("BATCHGRAPH_CONFIG") {
            Ok(path) => Some(require_file(PathBuf::from(path))?),
            Err(_) => find_config_from(start.as_ref()),
        },
    };

    let mut settings = match path.as_deref() {
        Some(path) => {
            let mut settings = load_settings(path)?;
            if let Some(base) = path.parent() {
                anchor_source_paths(&mut settings, base);
            }
            settings
        }
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings);

    Ok(LoadedConfig { settings, path })
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn require_file(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::ConfigNotFound(path))
    }
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn anchor_source_paths(settings: &mut Settings, base: &Path) {
    if settings.sources.nodes.is_relative() {
        settings.sources.nodes = base.join(&settings.sources.nodes);
    }
    if settings.sources.edges.is_relative() {
        settings.sources.edges = base.join(&settings.sources.edges);
    }
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(nodes) = env::var("BATCHGRAPH_NODES") {
        settings.sources.nodes = PathBuf::from(nodes);
    }
    if let Ok(edges) = env::var("BATCHGRAPH_EDGES") {
        settings.sources.edges = PathBuf::from(edges);
    }
}
