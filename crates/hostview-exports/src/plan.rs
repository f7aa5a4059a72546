//! Turning a finished export table into ordered mount actions.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace};

use crate::mode::{AccessMode, ExportMode};
use crate::resolver::{HostFs, make_relative, resolve_link};
use crate::table::{ExportTable, parent_is_mapped};

/// Where the host's `/usr` is bound when host filesystem access is enabled.
pub const HOST_USR: &str = "/run/host/usr";

/// Where the host's `/etc` is bound when host filesystem access is enabled.
pub const HOST_ETC: &str = "/run/host/etc";

/// A single step of sandbox filesystem setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum MountAction {
    /// Bind host `source` onto sandbox `dest`.
    Bind {
        source: PathBuf,
        dest: PathBuf,
        access: AccessMode,
    },
    /// Mount an empty tmpfs over `path`.
    Tmpfs { path: PathBuf },
    /// Create `path` as a directory.
    Dir { path: PathBuf },
    /// Create a symlink at `path` pointing to the relative `target`.
    Symlink { target: PathBuf, path: PathBuf },
}

impl MountAction {
    /// Bind a host path onto the same path in the sandbox.
    pub fn bind(path: impl Into<PathBuf>, access: AccessMode) -> Self {
        let path = path.into();
        MountAction::Bind {
            source: path.clone(),
            dest: path,
            access,
        }
    }

    /// The sandbox path this action creates or covers.
    pub fn path(&self) -> &Path {
        match self {
            MountAction::Bind { dest, .. } => dest,
            MountAction::Tmpfs { path } | MountAction::Dir { path } => path,
            MountAction::Symlink { path, .. } => path,
        }
    }

    /// The bubblewrap arguments performing this action.
    pub fn to_bwrap_args(&self) -> Vec<OsString> {
        match self {
            MountAction::Bind {
                source,
                dest,
                access,
            } => vec![
                access.bwrap_flag().into(),
                source.into(),
                dest.into(),
            ],
            MountAction::Tmpfs { path } => vec!["--tmpfs".into(), path.into()],
            MountAction::Dir { path } => vec!["--dir".into(), path.into()],
            MountAction::Symlink { target, path } => {
                vec!["--symlink".into(), target.into(), path.into()]
            }
        }
    }
}

/// Mount actions in the order the sandbox must apply them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MountPlan {
    actions: Vec<MountAction>,
}

impl MountPlan {
    pub fn actions(&self) -> &[MountAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// One argument group per action, in plan order.
    pub fn to_bwrap_args(&self) -> Vec<Vec<OsString>> {
        self.actions.iter().map(MountAction::to_bwrap_args).collect()
    }

    /// The whole plan as a flat bubblewrap argument vector.
    pub fn to_bwrap_argv(&self) -> Vec<OsString> {
        self.actions
            .iter()
            .flat_map(MountAction::to_bwrap_args)
            .collect()
    }

    fn push(&mut self, action: MountAction) {
        trace!(?action, "mount action");
        self.actions.push(action);
    }
}

impl IntoIterator for MountPlan {
    type Item = MountAction;
    type IntoIter = std::vec::IntoIter<MountAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

impl<'a> IntoIterator for &'a MountPlan {
    type Item = &'a MountAction;
    type IntoIter = std::slice::Iter<'a, MountAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Generate the mount plan for `table`, probing `fs` for what exists now.
pub fn generate<F: HostFs + ?Sized>(table: &ExportTable, fs: &F) -> MountPlan {
    let sorted = table.sorted();
    let mut plan = MountPlan::default();

    for entry in &sorted {
        let path = entry.path.as_path();
        match entry.mode {
            ExportMode::Symlink => {
                // Under a mapped parent the host's own symlink is already there.
                if parent_is_mapped(&sorted, path) {
                    debug!(path = %path.display(), "symlink covered by mapped parent");
                    continue;
                }
                let Some(resolved) = resolve_link(fs, path) else {
                    debug!(path = %path.display(), "symlink no longer resolves");
                    continue;
                };
                let parent = path.parent().unwrap_or(Path::new("/"));
                plan.push(MountAction::Symlink {
                    target: make_relative(parent, &resolved),
                    path: path.to_path_buf(),
                });
            }
            ExportMode::Tmpfs => {
                // A tmpfs needs a pre-existing directory to mount on.
                if !fs.is_real_dir(path) {
                    debug!(path = %path.display(), "no directory to mount tmpfs on");
                    continue;
                }
                // An unmapped parent is already empty, a plain directory hides as well.
                if parent_is_mapped(&sorted, path) {
                    plan.push(MountAction::Tmpfs {
                        path: path.to_path_buf(),
                    });
                } else {
                    plan.push(MountAction::Dir {
                        path: path.to_path_buf(),
                    });
                }
            }
            ExportMode::Dir => {
                if fs.is_real_dir(path) {
                    plan.push(MountAction::Dir {
                        path: path.to_path_buf(),
                    });
                }
            }
            ExportMode::ReadOnlyBind => plan.push(MountAction::bind(path, AccessMode::ReadOnly)),
            ExportMode::ReadWriteBind => plan.push(MountAction::bind(path, AccessMode::ReadWrite)),
        }
    }

    if let Some(access) = table.host_fs().access() {
        for (source, dest) in [("/usr", HOST_USR), ("/etc", HOST_ETC)] {
            if fs.is_dir(Path::new(source)) {
                plan.push(MountAction::Bind {
                    source: PathBuf::from(source),
                    dest: PathBuf::from(dest),
                    access,
                });
            }
        }
    }

    plan
}
