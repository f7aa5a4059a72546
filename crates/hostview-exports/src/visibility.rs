//! Answering whether a host path can be reached from inside the sandbox.
//!
//! A path is visible when its final component is mapped and no mapped
//! prefix is a symlink. A mapped symlink prefix is followed the way the
//! sandbox would follow it, and the check restarts from the link target.

use std::path::Path;

use tracing::debug;

use crate::resolver::{
    FileKind, HostFs, MAX_LINK_DEPTH, canonicalize, normalize, path_parts, prefix_of,
    resolve_link, splice,
};
use crate::table::{ExportEntry, ExportTable, path_is_mapped};

/// Whether `path` is visible in a sandbox built from `table`.
///
/// Fails closed: a missing prefix, an unreadable symlink or too many
/// symlink hops all answer `false`. Relative paths are taken relative to
/// the current working directory.
pub fn is_visible<F: HostFs + ?Sized>(table: &ExportTable, fs: &F, path: &Path) -> bool {
    let Some(canonical) = canonicalize(path) else {
        return false;
    };
    let sorted = table.sorted();
    visible_at(&sorted, fs, &canonical, 0)
}

fn visible_at<F: HostFs + ?Sized>(
    sorted: &[&ExportEntry],
    fs: &F,
    path: &Path,
    depth: usize,
) -> bool {
    if depth > MAX_LINK_DEPTH {
        debug!(path = %path.display(), "visibility check too deep");
        return false;
    }

    let parts = path_parts(path);
    for len in 1..=parts.len() {
        let prefix = prefix_of(&parts, len);

        if path_is_mapped(sorted, &prefix) {
            let Ok(kind) = fs.symlink_kind(&prefix) else {
                return false;
            };
            if kind == FileKind::Symlink {
                let Some(resolved) = resolve_link(fs, &prefix) else {
                    return false;
                };
                let target = normalize(&splice(resolved, &parts[len..]));
                return visible_at(sorted, fs, &target, depth + 1);
            }
        } else if len == parts.len() {
            // The leaf itself was never exported.
            return false;
        }
    }

    true
}
