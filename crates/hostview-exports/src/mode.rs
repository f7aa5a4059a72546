//! Export and request modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an entry of the export table is realised inside the sandbox.
///
/// Variants are ordered from least to most permissive. Merging two requests
/// for the same path keeps the greater mode, so `Symlink` always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// Ensure a mount point directory exists, either on tmpfs or in a mapped parent.
    Dir,
    /// Hide the host subtree behind an empty tmpfs.
    Tmpfs,
    /// Bind the host path read-only.
    ReadOnlyBind,
    /// Bind the host path read-write.
    ReadWriteBind,
    /// Recreate the host symlink inside the sandbox.
    Symlink,
}

impl ExportMode {
    pub fn name(self) -> &'static str {
        match self {
            ExportMode::Dir => "dir",
            ExportMode::Tmpfs => "tmpfs",
            ExportMode::ReadOnlyBind => "read-only",
            ExportMode::ReadWriteBind => "read-write",
            ExportMode::Symlink => "symlink",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<AccessMode> for ExportMode {
    fn from(access: AccessMode) -> Self {
        match access {
            AccessMode::ReadOnly => ExportMode::ReadOnlyBind,
            AccessMode::ReadWrite => ExportMode::ReadWriteBind,
        }
    }
}

/// Access granted to a bind mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl AccessMode {
    /// The bubblewrap flag that binds with this access.
    pub fn bwrap_flag(self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "--ro-bind",
            AccessMode::ReadWrite => "--bind",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::ReadOnly => f.write_str("read-only"),
            AccessMode::ReadWrite => f.write_str("read-write"),
        }
    }
}

/// Requested filesystem access where `None` means "hidden" or "off".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilesystemMode {
    #[default]
    None,
    ReadOnly,
    ReadWrite,
}

impl FilesystemMode {
    /// The bind access this mode grants, if any.
    pub fn access(self) -> Option<AccessMode> {
        match self {
            FilesystemMode::None => None,
            FilesystemMode::ReadOnly => Some(AccessMode::ReadOnly),
            FilesystemMode::ReadWrite => Some(AccessMode::ReadWrite),
        }
    }
}

impl From<AccessMode> for FilesystemMode {
    fn from(access: AccessMode) -> Self {
        match access {
            AccessMode::ReadOnly => FilesystemMode::ReadOnly,
            AccessMode::ReadWrite => FilesystemMode::ReadWrite,
        }
    }
}

impl fmt::Display for FilesystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.access() {
            Some(access) => fmt::Display::fmt(&access, f),
            None => f.write_str("none"),
        }
    }
}
