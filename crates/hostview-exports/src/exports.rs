//! The per-launch export session.

use std::path::Path;

use crate::plan::{self, MountPlan};
use crate::resolver::{HostFs, OsHostFs};
use crate::table::ExportTable;
use crate::visibility;

/// One sandbox launch's view of the host filesystem.
///
/// Owns the [`ExportTable`] and the host filesystem handle used to probe it.
/// Populate it with the `expose_*` methods, then ask for the
/// [`mount_plan`](Self::mount_plan) or query
/// [`path_is_visible`](Self::path_is_visible).
///
/// ```no_run
/// use hostview_exports::{AccessMode, Exports};
///
/// let mut exports = Exports::new();
/// exports.expose_path(AccessMode::ReadWrite, "/home");
/// exports.expose_tmpfs("/tmp");
///
/// for args in exports.mount_plan().to_bwrap_args() {
///     println!("{:?}", args);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Exports<F = OsHostFs> {
    pub(crate) table: ExportTable,
    pub(crate) fs: F,
}

impl Exports<OsHostFs> {
    /// An empty session against the real host filesystem.
    pub fn new() -> Self {
        Self::with_fs(OsHostFs)
    }
}

impl Default for Exports<OsHostFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: HostFs> Exports<F> {
    /// An empty session against `fs`.
    pub fn with_fs(fs: F) -> Self {
        Self {
            table: ExportTable::new(),
            fs,
        }
    }

    pub fn table(&self) -> &ExportTable {
        &self.table
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Generate the ordered mount actions for the current table.
    pub fn mount_plan(&self) -> MountPlan {
        plan::generate(&self.table, &self.fs)
    }

    /// Whether `path` is reachable from inside the sandbox.
    pub fn path_is_visible(&self, path: impl AsRef<Path>) -> bool {
        visibility::is_visible(&self.table, &self.fs, path.as_ref())
    }
}
