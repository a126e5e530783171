//! An in-memory simulation of a UNIX-like hierarchical namespace for Rust.
//! Models directories and files with `touch`, `mkdir`, `cd`, `ls`, `pwd`, `rm` and `rmfs`
//! operations, without touching the host file system.
//!
//! ### Overview
//!
//! `fs-sim-kit` keeps the whole tree in memory. The `FsBackend` trait describes the
//! operations and `SimFS` implements them on index-addressed node pools.
//!
//! **Key ideas**:
//! - **Cursor**: the current directory is an explicit `Cursor` value passed to every operation,
//!   so several positions (or several namespaces) can coexist.
//! - **Order**: files and subdirectories of a directory are kept in sorted chains; `ls` merges
//!   them without sorting.
//! - **Safety**: removals never leave dangling links; stale cursors are reported as errors.
//! - **Shell**: `Shell` reads UNIX-like commands line by line and drives a `SimFS`.

mod core;
mod shell;
mod vfs;

pub use crate::core::{FsBackend, FsError, Result};
pub use crate::shell::{Flow, Shell, ShellError};
pub use crate::vfs::{Cursor, Entry, EntryType, Listing, Released, SimFS};
