//! Exposure request file format.
//!
//! ```toml
//! host-fs = "read-only"
//!
//! [[expose]]
//! path = "~/projects"
//! mode = "read-write"
//!
//! [[expose]]
//! path = "~/.ssh"
//! mode = "tmpfs"
//! ```

use std::path::{Path, PathBuf};

use hostview_exports::{AccessMode, Exports, FilesystemMode, HostFs};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ConfigError, Result};

/// How a configured path is brought into the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    ReadOnly,
    ReadWrite,
    /// Hidden behind a tmpfs; same as `tmpfs`.
    None,
    Tmpfs,
    /// Only make sure the directory exists.
    Dir,
}

/// One `[[expose]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposeRequest {
    /// Absolute host path, or `~`/`~/...` for the home directory.
    pub path: String,
    pub mode: RequestMode,
}

impl ExposeRequest {
    pub fn new(path: impl Into<String>, mode: RequestMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    /// The host path this request names, with `~` expanded against `home`.
    pub fn host_path(&self, home: Option<&Path>) -> Result<PathBuf> {
        let rest = if self.path == "~" {
            Some("")
        } else {
            self.path.strip_prefix("~/")
        };

        if let Some(rest) = rest {
            let home = home.ok_or_else(|| ConfigError::NoHomeDir {
                path: self.path.clone(),
            })?;
            if rest.is_empty() {
                return Ok(home.to_path_buf());
            }
            return Ok(home.join(rest));
        }

        let path = PathBuf::from(&self.path);
        if !path.is_absolute() {
            return Err(ConfigError::RelativePath {
                path: self.path.clone(),
            });
        }
        Ok(path)
    }
}

/// A complete exposure request file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HostviewConfig {
    /// Access for the host's `/usr` and `/etc` under `/run/host`.
    #[serde(default)]
    pub host_fs: FilesystemMode,

    #[serde(default)]
    pub expose: Vec<ExposeRequest>,
}

impl HostviewConfig {
    /// Parse from a TOML string, rejecting relative request paths.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: HostviewConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every request names an absolute or home-relative path.
    pub fn validate(&self) -> Result<()> {
        for request in &self.expose {
            let is_home = request.path == "~" || request.path.starts_with("~/");
            if !is_home && !Path::new(&request.path).is_absolute() {
                return Err(ConfigError::RelativePath {
                    path: request.path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Issue every request against `exports` in file order.
    ///
    /// Returns how many were accepted. Refused requests (missing paths,
    /// runtime prefixes) are skipped like any best-effort exposure.
    pub fn apply<F: HostFs>(&self, exports: &mut Exports<F>) -> Result<usize> {
        self.apply_with_home(exports, dirs::home_dir().as_deref())
    }

    /// [`apply`](Self::apply) with an explicit home directory for `~` paths.
    ///
    /// Every path is expanded before the first request is issued, so an
    /// error leaves `exports` untouched.
    pub fn apply_with_home<F: HostFs>(
        &self,
        exports: &mut Exports<F>,
        home: Option<&Path>,
    ) -> Result<usize> {
        let resolved = self
            .expose
            .iter()
            .map(|request| request.host_path(home).map(|path| (request, path)))
            .collect::<Result<Vec<_>>>()?;

        let mut accepted = 0;
        for (request, path) in resolved {
            let ok = match request.mode {
                RequestMode::ReadOnly => exports.expose_path(AccessMode::ReadOnly, &path),
                RequestMode::ReadWrite => exports.expose_path(AccessMode::ReadWrite, &path),
                RequestMode::None => exports.expose_or_hide(FilesystemMode::None, &path),
                RequestMode::Tmpfs => exports.expose_tmpfs(&path),
                RequestMode::Dir => exports.expose_dir(&path),
            };
            if ok {
                accepted += 1;
            } else {
                debug!(path = %path.display(), mode = ?request.mode, "exposure request refused");
            }
        }
        exports.set_host_fs(self.host_fs);
        Ok(accepted)
    }
}
