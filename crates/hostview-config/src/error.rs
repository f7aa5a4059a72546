//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading or applying exposure requests.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An explicitly requested config file does not exist.
    #[error("config file '{0}' not found")]
    NotFound(String),

    /// Exposure requests must name absolute host paths.
    #[error("exposed path '{path}' must be absolute or start with '~/'")]
    RelativePath { path: String },

    /// A `~` path was requested but no home directory is known.
    #[error("cannot expand '{path}': home directory unknown")]
    NoHomeDir { path: String },
}
