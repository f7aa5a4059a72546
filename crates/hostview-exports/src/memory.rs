//! In-memory host filesystem.
//!
//! Models directories, files, sockets, other special files and symlinks with
//! kernel-like path walking, so export planning can be dry-run against an
//! imagined host or exercised in tests without touching `/`.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::resolver::{FileKind, HostFs, MAX_LINK_DEPTH, normalize};

static ROOT: Node = Node::Dir;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File,
    Socket,
    Special,
    Symlink(PathBuf),
}

impl Node {
    fn kind(&self) -> FileKind {
        match self {
            Node::Dir => FileKind::Directory,
            Node::File => FileKind::Regular,
            Node::Socket => FileKind::Socket,
            Node::Special => FileKind::Other,
            Node::Symlink(_) => FileKind::Symlink,
        }
    }
}

/// A host filesystem held entirely in memory.
///
/// Paths given to the builders are normalized lexically and their missing
/// parents are created as plain directories.
///
/// ```
/// use hostview_exports::{FileKind, HostFs, MemoryFs};
/// use std::path::Path;
///
/// let fs = MemoryFs::new().with_dir("/b").with_symlink("/a", "/b");
/// assert_eq!(fs.symlink_kind(Path::new("/a")).unwrap(), FileKind::Symlink);
/// assert_eq!(fs.kind(Path::new("/a")).unwrap(), FileKind::Directory);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    nodes: HashMap<PathBuf, Node>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::Dir);
        self
    }

    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::File);
        self
    }

    pub fn with_socket(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::Socket);
        self
    }

    /// A device node, fifo or anything else that is never exported.
    pub fn with_special(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::Special);
        self
    }

    /// A symlink at `path` whose raw target is `target`.
    pub fn with_symlink(mut self, path: impl AsRef<Path>, target: impl Into<PathBuf>) -> Self {
        self.insert(path.as_ref(), Node::Symlink(target.into()));
        self
    }

    fn insert(&mut self, path: &Path, node: Node) {
        let path = normalize(path);
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.parent().is_none() {
                break;
            }
            self.nodes.entry(dir.to_path_buf()).or_insert(Node::Dir);
            parent = dir.parent();
        }
        self.nodes.insert(path, node);
    }

    fn node(&self, path: &Path) -> Option<&Node> {
        if path.parent().is_none() {
            return Some(&ROOT);
        }
        self.nodes.get(path)
    }

    /// Walk `path` the way the kernel does, following every symlink met along
    /// the way and the final one only when `follow_final` is set.
    fn lookup(&self, path: &Path, follow_final: bool) -> io::Result<&Node> {
        if !path.is_absolute() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("relative path {}", path.display()),
            ));
        }

        let mut pending: Vec<OsString> = components_rev(path);
        let mut current = PathBuf::from("/");
        let mut hops = 0;

        while let Some(part) = pending.pop() {
            if part == ".." {
                current.pop();
                continue;
            }

            let candidate = current.join(&part);
            let node = self
                .node(&candidate)
                .ok_or_else(|| not_found(&candidate))?;
            let is_last = pending.is_empty();

            match node {
                Node::Symlink(target) if !is_last || follow_final => {
                    hops += 1;
                    if hops > MAX_LINK_DEPTH {
                        return Err(io::Error::other(format!(
                            "too many levels of symbolic links at {}",
                            candidate.display()
                        )));
                    }
                    if target.is_absolute() {
                        current = PathBuf::from("/");
                    }
                    pending.extend(components_rev(target));
                }
                _ if is_last => return Ok(node),
                Node::Dir => current = candidate,
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotADirectory,
                        format!("not a directory: {}", candidate.display()),
                    ));
                }
            }
        }

        // Every component was consumed by directory steps: the path names a
        // directory reached through `..` or a trailing symlink target.
        self.node(&current).ok_or_else(|| not_found(&current))
    }
}

fn components_rev(path: &Path) -> Vec<OsString> {
    let mut parts: Vec<OsString> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_os_string()),
            Component::ParentDir => Some(OsString::from("..")),
            _ => None,
        })
        .collect();
    parts.reverse();
    parts
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

impl HostFs for MemoryFs {
    fn symlink_kind(&self, path: &Path) -> io::Result<FileKind> {
        self.lookup(path, false).map(Node::kind)
    }

    fn kind(&self, path: &Path) -> io::Result<FileKind> {
        self.lookup(path, true).map(Node::kind)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        match self.lookup(path, false)? {
            Node::Symlink(target) => Ok(target.clone()),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a symlink: {}", path.display()),
            )),
        }
    }
}
