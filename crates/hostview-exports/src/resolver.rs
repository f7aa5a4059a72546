//! Host filesystem primitives and lexical path helpers.
//!
//! Everything that consults the host goes through [`HostFs`], so the export
//! algorithms can run against [`OsHostFs`] in production and against
//! [`MemoryFs`](crate::MemoryFs) for dry runs and tests.

use std::ffi::OsStr;
use std::fs::FileType;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::FileTypeExt;
use std::path::{Component, Path, PathBuf};

/// Bound on symlink hops, matching the kernel's `ELOOP` limit.
pub const MAX_LINK_DEPTH: usize = 40;

/// File type as reported by `stat`/`lstat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    Socket,
    Other,
}

impl FileKind {
    /// Types that may be exported into a sandbox.
    pub fn is_exportable(self) -> bool {
        !matches!(self, FileKind::Other)
    }
}

impl From<FileType> for FileKind {
    fn from(ft: FileType) -> Self {
        if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_dir() {
            FileKind::Directory
        } else if ft.is_file() {
            FileKind::Regular
        } else if ft.is_socket() {
            FileKind::Socket
        } else {
            FileKind::Other
        }
    }
}

/// Read access to the host filesystem.
pub trait HostFs {
    /// Type of `path` without following a final symlink (`lstat`).
    fn symlink_kind(&self, path: &Path) -> io::Result<FileKind>;

    /// Type of `path` after following symlinks (`stat`).
    fn kind(&self, path: &Path) -> io::Result<FileKind>;

    /// Raw target of the symlink at `path`.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.symlink_kind(path), Ok(FileKind::Symlink))
    }

    /// A directory that is not reached through a final symlink.
    fn is_real_dir(&self, path: &Path) -> bool {
        matches!(self.symlink_kind(path), Ok(FileKind::Directory))
    }

    /// A directory, possibly reached through symlinks.
    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.kind(path), Ok(FileKind::Directory))
    }
}

impl<T: HostFs + ?Sized> HostFs for &T {
    fn symlink_kind(&self, path: &Path) -> io::Result<FileKind> {
        (**self).symlink_kind(path)
    }

    fn kind(&self, path: &Path) -> io::Result<FileKind> {
        (**self).kind(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).read_link(path)
    }
}

/// The real host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsHostFs;

impl HostFs for OsHostFs {
    fn symlink_kind(&self, path: &Path) -> io::Result<FileKind> {
        Ok(std::fs::symlink_metadata(path)?.file_type().into())
    }

    fn kind(&self, path: &Path) -> io::Result<FileKind> {
        Ok(std::fs::metadata(path)?.file_type().into())
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }
}

/// Lexically normalize `path` as if it were rooted at `/`.
///
/// Collapses `.`, `..` (never above the root), repeated separators and
/// trailing slashes. Symlinks are never consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let rooted = if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new("/").join(path)
    };
    path_clean::clean(rooted)
}

/// Canonical absolute form of `path`, final component left untouched.
///
/// Relative paths are anchored at the process working directory; `None`
/// when that directory cannot be determined.
pub fn canonicalize(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return Some(normalize(path));
    }
    let cwd = std::env::current_dir().ok()?;
    Some(normalize(&cwd.join(path)))
}

/// Absolute target of the symlink at `path`.
///
/// Relative targets are joined onto the link's parent directory. The result
/// is not canonicalized.
pub fn resolve_link<F: HostFs + ?Sized>(fs: &F, path: &Path) -> Option<PathBuf> {
    let target = fs.read_link(path).ok()?;
    if target.is_absolute() {
        return Some(target);
    }
    let parent = path.parent().unwrap_or(Path::new("/"));
    Some(parent.join(target))
}

/// Component-wise prefix test: `/a` prefixes `/a` and `/a/b` but not `/ab`.
pub fn has_path_prefix(path: &Path, prefix: &Path) -> bool {
    path.starts_with(prefix)
}

/// Express `path` relative to the directory `base`.
///
/// Climbs one `..` per component of `base` back to the root, then descends
/// into `path`. The result does not depend on where the root is mounted.
pub fn make_relative(base: &Path, path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in base.components() {
        if !matches!(component, Component::RootDir | Component::Prefix(_)) {
            out.push("..");
        }
    }
    for component in path.components() {
        if !matches!(component, Component::RootDir | Component::Prefix(_)) {
            out.push(component.as_os_str());
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Normal components of an already canonical path.
pub(crate) fn path_parts(path: &Path) -> Vec<&OsStr> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// `/` followed by the first `len` parts.
pub(crate) fn prefix_of(parts: &[&OsStr], len: usize) -> PathBuf {
    let mut prefix = PathBuf::from("/");
    prefix.extend(&parts[..len]);
    prefix
}

/// `target` with `rest` appended component by component.
pub(crate) fn splice(target: PathBuf, rest: &[&OsStr]) -> PathBuf {
    let mut spliced = target;
    spliced.extend(rest);
    spliced
}

/// Raw bytes of a path, the sort key for mount planning.
pub(crate) fn path_bytes(path: &Path) -> &[u8] {
    path.as_os_str().as_bytes()
}
