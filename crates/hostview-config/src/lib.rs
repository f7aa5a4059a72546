//! Configuration for hostview.
//!
//! Provides TOML exposure request files with:
//! - `[[expose]]` entries binding, hiding or ensuring host paths
//! - `host-fs` for exposing the host's `/usr` and `/etc` under `/run/host`
//! - `~` expansion against the user's home directory
//! - Discovery from an explicit path, `$HOSTVIEW_CONFIG`, the project
//!   directory or the platform config directory

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    CONFIG_ENV, LoadedConfig, load_config, load_config_file, load_config_with_options,
    user_config_dir,
};
pub use error::{ConfigError, Result};
pub use types::*;
