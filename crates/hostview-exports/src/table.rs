//! The export table: every path a launch session has decided to expose,
//! hide or ensure as a directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::mode::{ExportMode, FilesystemMode};
use crate::resolver::{has_path_prefix, path_bytes};

/// One exported path and how it is realised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    /// Canonical absolute path.
    pub path: PathBuf,
    pub mode: ExportMode,
}

/// Canonical path → export decision, plus the host `/usr` and `/etc` toggle.
///
/// Entries only ever grow more permissive: inserting a path that is already
/// present keeps the greater of the two modes.
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    entries: HashMap<PathBuf, ExportEntry>,
    host_fs: FilesystemMode,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge-insert `path` with `mode`.
    ///
    /// `path` must already be canonical; the exposer guarantees it.
    pub fn insert(&mut self, path: PathBuf, mode: ExportMode) {
        self.entries
            .entry(path)
            .and_modify(|entry| entry.mode = entry.mode.max(mode))
            .or_insert_with_key(|path| ExportEntry {
                path: path.clone(),
                mode,
            });
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&ExportEntry> {
        self.entries.get(path.as_ref())
    }

    pub fn mode_of(&self, path: impl AsRef<Path>) -> Option<ExportMode> {
        self.get(path).map(|entry| entry.mode)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &ExportEntry> {
        self.entries.values()
    }

    /// Entries sorted by the raw bytes of their paths.
    ///
    /// Byte order puts every parent before its descendants, which the mount
    /// plan and both ancestor predicates rely on.
    pub fn sorted(&self) -> Vec<&ExportEntry> {
        let mut entries: Vec<&ExportEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| path_bytes(&a.path).cmp(path_bytes(&b.path)));
        entries
    }

    /// Whether `/usr` and `/etc` are additionally bound under `/run/host`.
    pub fn host_fs(&self) -> FilesystemMode {
        self.host_fs
    }

    pub fn set_host_fs(&mut self, mode: FilesystemMode) {
        self.host_fs = mode;
    }
}

/// Whether host content reaches `path` through a strict ancestor.
///
/// The deepest non-`Dir` ancestor decides: a bind or symlink maps the path,
/// a tmpfs hides it. `Dir` entries inherit whatever their parent maps.
/// `sorted` must come from [`ExportTable::sorted`].
pub(crate) fn parent_is_mapped(sorted: &[&ExportEntry], path: &Path) -> bool {
    let mut is_mapped = false;
    for entry in sorted {
        if has_path_prefix(path, &entry.path) && path != entry.path {
            if entry.mode == ExportMode::Dir {
                continue;
            }
            is_mapped = entry.mode != ExportMode::Tmpfs;
        }
    }
    is_mapped
}

/// Whether `path` itself is mapped, by its own entry or an ancestor's.
///
/// Like [`parent_is_mapped`] but inclusive of `path`. A symlink entry only
/// maps its own path: what lies beneath it belongs to the link target.
pub(crate) fn path_is_mapped(sorted: &[&ExportEntry], path: &Path) -> bool {
    let mut is_mapped = false;
    for entry in sorted {
        if has_path_prefix(path, &entry.path) {
            match entry.mode {
                ExportMode::Dir => continue,
                ExportMode::Symlink => is_mapped = path == entry.path,
                mode => is_mapped = mode != ExportMode::Tmpfs,
            }
        }
    }
    is_mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, ExportMode)]) -> ExportTable {
        let mut table = ExportTable::new();
        for (path, mode) in entries {
            table.insert(PathBuf::from(path), *mode);
        }
        table
    }

    #[test]
    fn test_insert_merges_to_max() {
        let mut table = ExportTable::new();
        table.insert(PathBuf::from("/data"), ExportMode::ReadWriteBind);
        table.insert(PathBuf::from("/data"), ExportMode::ReadOnlyBind);
        table.insert(PathBuf::from("/data"), ExportMode::Tmpfs);

        assert_eq!(table.len(), 1);
        assert_eq!(table.mode_of("/data"), Some(ExportMode::ReadWriteBind));

        table.insert(PathBuf::from("/data"), ExportMode::Symlink);
        assert_eq!(table.mode_of("/data"), Some(ExportMode::Symlink));
    }

    #[test]
    fn test_sorted_is_byte_order() {
        let table = table(&[
            ("/a/b", ExportMode::ReadOnlyBind),
            ("/a-b", ExportMode::ReadOnlyBind),
            ("/a", ExportMode::ReadOnlyBind),
        ]);
        let paths: Vec<_> = table.sorted().iter().map(|e| e.path.clone()).collect();
        // '-' (0x2d) sorts before '/' (0x2f)
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a"),
                PathBuf::from("/a-b"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_host_fs_default_none() {
        let mut table = ExportTable::new();
        assert_eq!(table.host_fs(), FilesystemMode::None);
        table.set_host_fs(FilesystemMode::ReadOnly);
        assert_eq!(table.host_fs(), FilesystemMode::ReadOnly);
    }

    #[test]
    fn test_parent_is_mapped_excludes_self() {
        let table = table(&[("/home", ExportMode::ReadWriteBind)]);
        let sorted = table.sorted();
        assert!(!parent_is_mapped(&sorted, Path::new("/home")));
        assert!(parent_is_mapped(&sorted, Path::new("/home/user")));
        assert!(!parent_is_mapped(&sorted, Path::new("/homer")));
    }

    #[test]
    fn test_parent_is_mapped_deepest_decides() {
        let table = table(&[
            ("/home", ExportMode::ReadWriteBind),
            ("/home/user", ExportMode::Tmpfs),
            ("/home/user/cache", ExportMode::Dir),
        ]);
        let sorted = table.sorted();
        assert!(parent_is_mapped(&sorted, Path::new("/home/user")));
        assert!(!parent_is_mapped(&sorted, Path::new("/home/user/cache")));
        assert!(!parent_is_mapped(&sorted, Path::new("/home/user/cache/x")));
    }

    #[test]
    fn test_parent_is_mapped_counts_symlink_ancestor() {
        let table = table(&[("/run", ExportMode::Symlink)]);
        let sorted = table.sorted();
        assert!(parent_is_mapped(&sorted, Path::new("/run/media")));
    }

    #[test]
    fn test_path_is_mapped_includes_self() {
        let table = table(&[("/srv", ExportMode::ReadOnlyBind)]);
        let sorted = table.sorted();
        assert!(path_is_mapped(&sorted, Path::new("/srv")));
        assert!(path_is_mapped(&sorted, Path::new("/srv/www")));
        assert!(!path_is_mapped(&sorted, Path::new("/")));
    }

    #[test]
    fn test_path_is_mapped_symlink_only_exact() {
        let table = table(&[("/run", ExportMode::Symlink)]);
        let sorted = table.sorted();
        assert!(path_is_mapped(&sorted, Path::new("/run")));
        assert!(!path_is_mapped(&sorted, Path::new("/run/media")));
    }

    #[test]
    fn test_predicates_disagree_on_symlink_descendants() {
        // A strict-ancestor symlink maps for the plan but not for visibility.
        let table = table(&[
            ("/var", ExportMode::Symlink),
            ("/var/lib", ExportMode::Tmpfs),
        ]);
        let sorted = table.sorted();
        assert!(parent_is_mapped(&sorted, Path::new("/var/lib")));
        assert!(!path_is_mapped(&sorted, Path::new("/var/lib")));
    }

    #[test]
    fn test_tmpfs_self_entry() {
        let table = table(&[
            ("/home", ExportMode::ReadOnlyBind),
            ("/home/secret", ExportMode::Tmpfs),
        ]);
        let sorted = table.sorted();
        assert!(parent_is_mapped(&sorted, Path::new("/home/secret")));
        assert!(!path_is_mapped(&sorted, Path::new("/home/secret")));
        assert!(!path_is_mapped(&sorted, Path::new("/home/secret/key")));
    }
}
