//! Adding paths to the export table.
//!
//! A request is resolved against the host before it is recorded: if any
//! prefix of the path is a symlink, the link target is exposed instead and
//! the link itself is recorded so the sandbox can recreate it.

use std::path::Path;

use tracing::debug;

use crate::error::{ExposeError, ExposeResult};
use crate::exports::Exports;
use crate::mode::{AccessMode, ExportMode, FilesystemMode};
use crate::resolver::{
    HostFs, MAX_LINK_DEPTH, has_path_prefix, normalize, path_parts, prefix_of, resolve_link,
    splice,
};

/// Paths that belong to the sandbox's own read-only runtime.
///
/// They don't match the host and no mount points can be created inside
/// them, so nothing below them is ever exported.
pub const DONT_EXPORT_IN: &[&str] = &[
    "/lib", "/lib32", "/lib64", "/bin", "/sbin", "/usr", "/etc", "/app", "/dev",
];

/// Paths kept as directories even when they are symlinks on the host.
///
/// The sandbox creates its own `/tmp` before exports are applied, so a
/// symlink there would collide with it.
const NEVER_EXPORT_AS_SYMLINK: &[&str] = &["/tmp"];

fn never_export_as_symlink(path: &Path) -> bool {
    NEVER_EXPORT_AS_SYMLINK.iter().any(|p| path == Path::new(p))
}

fn denied_prefix(path: &Path) -> Option<&'static str> {
    DONT_EXPORT_IN
        .iter()
        .copied()
        .find(|prefix| has_path_prefix(path, Path::new(prefix)))
}

impl<F: HostFs> Exports<F> {
    /// Bind `path` into the sandbox with `access`.
    ///
    /// Returns `false` if the request was refused; nothing is recorded then.
    pub fn expose_path(&mut self, access: AccessMode, path: impl AsRef<Path>) -> bool {
        self.expose(ExportMode::from(access), path.as_ref())
    }

    /// Hide `path` behind an empty tmpfs.
    pub fn expose_tmpfs(&mut self, path: impl AsRef<Path>) -> bool {
        self.expose(ExportMode::Tmpfs, path.as_ref())
    }

    /// Ensure `path` exists as a directory in the sandbox.
    pub fn expose_dir(&mut self, path: impl AsRef<Path>) -> bool {
        self.expose(ExportMode::Dir, path.as_ref())
    }

    /// Bind `path` with `mode`, or hide it when `mode` is `None`.
    pub fn expose_or_hide(&mut self, mode: FilesystemMode, path: impl AsRef<Path>) -> bool {
        match mode.access() {
            Some(access) => self.expose_path(access, path),
            None => self.expose_tmpfs(path),
        }
    }

    /// Also bind the host's `/usr` and `/etc` under `/run/host`.
    pub fn set_host_fs(&mut self, mode: FilesystemMode) {
        self.table.set_host_fs(mode);
    }

    fn expose(&mut self, mode: ExportMode, path: &Path) -> bool {
        match self.expose_at(mode, path, 0) {
            Ok(()) => true,
            Err(e) => {
                debug!(path = %path.display(), %mode, "{e}");
                false
            }
        }
    }

    fn expose_at(&mut self, mode: ExportMode, path: &Path, depth: usize) -> ExposeResult<()> {
        if depth > MAX_LINK_DEPTH {
            return Err(ExposeError::TooDeep(path.to_path_buf()));
        }

        if !path.is_absolute() {
            return Err(ExposeError::Relative(path.to_path_buf()));
        }

        let kind = self
            .fs
            .symlink_kind(path)
            .map_err(|_| ExposeError::Missing(path.to_path_buf()))?;
        if !kind.is_exportable() {
            return Err(ExposeError::UnsupportedType {
                path: path.to_path_buf(),
            });
        }

        let canonical = normalize(path);

        if let Some(prefix) = denied_prefix(&canonical) {
            return Err(ExposeError::Denied {
                path: canonical,
                prefix,
            });
        }

        // Every prefix, the path itself included, may be a symlink. The first
        // one found is exposed through its target.
        let parts = path_parts(&canonical);
        for len in 1..=parts.len() {
            let prefix = prefix_of(&parts, len);
            if !self.fs.is_symlink(&prefix) || never_export_as_symlink(&prefix) {
                continue;
            }

            let resolved = resolve_link(&self.fs, &prefix)
                .ok_or_else(|| ExposeError::UnresolvableLink(prefix.clone()))?;
            let target = splice(resolved, &parts[len..]);

            self.expose_at(mode, &target, depth + 1)?;
            self.table.insert(prefix, ExportMode::Symlink);
            return Ok(());
        }

        self.table.insert(canonical, mode);
        Ok(())
    }
}
