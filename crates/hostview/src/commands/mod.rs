//! CLI command handlers.

pub mod plan;
pub mod table;
pub mod visible;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use hostview_exports::{AccessMode, Exports, FilesystemMode};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Explicit exposure request file.
    pub config: Option<PathBuf>,
    pub read_only: Vec<PathBuf>,
    pub read_write: Vec<PathBuf>,
    pub tmpfs: Vec<PathBuf>,
    pub dir: Vec<PathBuf>,
    /// Overrides the config's `host-fs`.
    pub host_fs: Option<FilesystemMode>,
}

/// `--host-fs` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HostFsArg {
    None,
    ReadOnly,
    ReadWrite,
}

impl From<HostFsArg> for FilesystemMode {
    fn from(arg: HostFsArg) -> Self {
        match arg {
            HostFsArg::None => FilesystemMode::None,
            HostFsArg::ReadOnly => FilesystemMode::ReadOnly,
            HostFsArg::ReadWrite => FilesystemMode::ReadWrite,
        }
    }
}

impl Context {
    /// Build the export session: config requests first, then command-line
    /// requests in the order ro, rw, tmpfs, dir.
    pub fn build_exports(&self) -> Result<Exports> {
        let loaded = hostview_config::load_config(self.config.as_deref())
            .context("failed to load exposure requests")?;

        let mut exports = Exports::new();
        let accepted = loaded
            .config
            .apply(&mut exports)
            .context("failed to apply exposure requests")?;
        if let Some(source) = &loaded.source {
            tracing::info!(
                path = %source.display(),
                accepted,
                requested = loaded.config.expose.len(),
                "applied config"
            );
        }

        let requests = self
            .read_only
            .iter()
            .map(|p| (p, Request::Bind(AccessMode::ReadOnly)))
            .chain(self.read_write.iter().map(|p| (p, Request::Bind(AccessMode::ReadWrite))))
            .chain(self.tmpfs.iter().map(|p| (p, Request::Tmpfs)))
            .chain(self.dir.iter().map(|p| (p, Request::Dir)));

        for (path, request) in requests {
            let ok = match request {
                Request::Bind(access) => exports.expose_path(access, path),
                Request::Tmpfs => exports.expose_tmpfs(path),
                Request::Dir => exports.expose_dir(path),
            };
            if !ok {
                tracing::warn!(path = %path.display(), ?request, "exposure refused");
            }
        }

        if let Some(mode) = self.host_fs {
            exports.set_host_fs(mode);
        }

        Ok(exports)
    }
}

#[derive(Debug, Clone, Copy)]
enum Request {
    Bind(AccessMode),
    Tmpfs,
    Dir,
}
