//! Config file discovery.
//!
//! Resolution order (first hit wins):
//! 1. An explicit path (e.g. `--config`)
//! 2. `$HOSTVIEW_CONFIG`
//! 3. `./hostview.toml` (project-local)
//! 4. `~/.config/hostview/config.toml` (platform config dir)
//!
//! Explicitly named files must exist; the implicit locations are optional
//! and an empty config is used when none is present.

use std::path::{Path, PathBuf};

use crate::{ConfigError, HostviewConfig, Result};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "hostview.toml";

/// Default config filename within the platform config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for config directory resolution.
const APP_NAME: &str = "hostview";

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "HOSTVIEW_CONFIG";

/// A config together with where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: HostviewConfig,
    /// The file that was loaded, `None` when defaults are in use.
    pub source: Option<PathBuf>,
}

/// Discover and load the config using the process environment.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let env_path = std::env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    load_config_with_options(
        explicit,
        env_path.as_deref(),
        Path::new("."),
        user_config_dir().as_deref(),
    )
}

/// Discover and load the config with every location spelled out.
pub fn load_config_with_options(
    explicit: Option<&Path>,
    env_path: Option<&Path>,
    project_dir: &Path,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    if let Some(path) = explicit.or(env_path) {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        return load_from(path);
    }

    let candidates = [
        Some(project_dir.join(PROJECT_CONFIG_FILE)),
        config_dir.map(|d| d.join(USER_CONFIG_FILE)),
    ];
    for path in candidates.into_iter().flatten() {
        if path.is_file() {
            return load_from(&path);
        }
    }

    Ok(LoadedConfig::default())
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<HostviewConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    HostviewConfig::from_toml(&contents)
}

/// The platform config directory for hostview.
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

fn load_from(path: &Path) -> Result<LoadedConfig> {
    let config = load_config_file(path)?;
    tracing::debug!(path = %path.display(), requests = config.expose.len(), "loaded config");
    Ok(LoadedConfig {
        config,
        source: Some(path.to_path_buf()),
    })
}
