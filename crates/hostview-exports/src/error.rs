//! Reasons an exposure request is refused.
//!
//! These never cross the public API: exposure is best-effort and callers only
//! see a `bool`. They exist so rejections can be logged with a cause.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ExposeError {
    /// Only absolute paths can be exported.
    #[error("not exposing relative path {0}")]
    Relative(PathBuf),

    /// Nothing exists at the path on the host.
    #[error("not exposing missing path {0}")]
    Missing(PathBuf),

    /// Only directories, regular files, symlinks and sockets are exported.
    #[error("not exposing {path} of unsupported file type")]
    UnsupportedType { path: PathBuf },

    /// The path lies in the sandbox's own runtime image.
    #[error("skipping export for path {path} (under {prefix})")]
    Denied { path: PathBuf, prefix: &'static str },

    /// A symlink prefix could not be read.
    #[error("cannot resolve symlink {0}")]
    UnresolvableLink(PathBuf),

    /// The symlink chase exceeded the kernel's loop limit.
    #[error("expose too deep at {0}, bailing")]
    TooDeep(PathBuf),
}

pub(crate) type ExposeResult<T> = std::result::Result<T, ExposeError>;
