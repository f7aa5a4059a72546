//! Host path exports for sandboxed processes.
//!
//! Decides which host filesystem paths appear inside a sandbox and how,
//! producing the mount actions a sandbox helper such as bubblewrap applies.
//!
//! # Model
//!
//! - Requests are resolved against the **host**: a symlink anywhere along a
//!   requested path is recreated in the sandbox and its target exposed, so a
//!   redirected path is never silently exposed or missed.
//! - Overlapping requests merge to the most permissive mode
//!   (`Dir < Tmpfs < ReadOnlyBind < ReadWriteBind < Symlink`).
//! - Paths in the sandbox's own runtime (`/usr`, `/etc`, `/lib`, ...) are
//!   never exported.
//! - The mount plan is ordered parents-first by raw path bytes.
//!
//! # Example
//!
//! ```no_run
//! use hostview_exports::{AccessMode, Exports, FilesystemMode};
//!
//! let mut exports = Exports::new();
//! exports.expose_path(AccessMode::ReadWrite, "/home/user");
//! exports.expose_tmpfs("/home/user/.ssh");
//! exports.set_host_fs(FilesystemMode::ReadOnly);
//!
//! let argv = exports.mount_plan().to_bwrap_argv();
//! assert!(!exports.path_is_visible("/home/user/.ssh/id_ed25519"));
//! # let _ = argv;
//! ```
//!
//! Host probing goes through the [`HostFs`] trait; [`MemoryFs`] stands in
//! for the host when planning against an imagined filesystem.

mod error;
mod expose;
mod exports;
mod memory;
mod mode;
pub mod plan;
pub mod resolver;
mod table;
pub mod visibility;

pub use expose::DONT_EXPORT_IN;
pub use exports::Exports;
pub use memory::MemoryFs;
pub use mode::{AccessMode, ExportMode, FilesystemMode};
pub use plan::{HOST_ETC, HOST_USR, MountAction, MountPlan};
pub use resolver::{FileKind, HostFs, MAX_LINK_DEPTH, OsHostFs};
pub use table::{ExportEntry, ExportTable};
