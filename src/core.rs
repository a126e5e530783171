use std::collections::TryReserveError;

use thiserror::Error;

use crate::vfs::{Cursor, Listing, Released};

/// Operations of a mountable, cursor-driven namespace.
///
/// Every operation resolves its argument against the directory referenced by `cursor`.
/// Arguments are single path segments or one of the sentinel tokens (`.`, `..`, `/`);
/// multi-segment paths are rejected.
pub trait FsBackend {
    /// Allocates a fresh root and returns a cursor positioned at it.
    fn mkfs(&mut self) -> Result<Cursor>;
    /// Creates an empty file in the current directory.
    fn touch(&mut self, cursor: Cursor, name: &str) -> Result<()>;
    /// Creates an empty subdirectory in the current directory.
    fn mkdir(&mut self, cursor: Cursor, name: &str) -> Result<()>;
    /// Returns the cursor moved according to `arg`.
    fn cd(&self, cursor: Cursor, arg: &str) -> Result<Cursor>;
    fn ls(&self, cursor: Cursor, arg: &str) -> Result<Listing<'_>>;
    fn pwd(&self, cursor: Cursor) -> Result<String>;
    fn rm(&mut self, cursor: Cursor, name: &str) -> Result<Released>;
    /// Destroys the whole tree. Every cursor becomes invalid.
    fn rmfs(&mut self, cursor: Cursor) -> Result<Released>;
}

pub type Result<T> = std::result::Result<T, FsError>;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("invalid name: '{0}'")]
    InvalidArgument(String),

    #[error("'{0}' already exists")]
    NameCollision(String),

    #[error("'{0}' does not exist")]
    NotFound(String),

    #[error("'{0}' is a reserved name")]
    ReservedName(String),

    #[error("not enough memory: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("filesystem is not mounted")]
    Unmounted,

    #[error("cursor does not reference a live directory")]
    StaleCursor,

    #[error("filesystem is already mounted")]
    AlreadyMounted,
}

pub(crate) mod utils {
    pub const SEPARATOR: char = '/';

    /// Classification of a single argument token.
    #[derive(Debug, Copy, Clone, PartialEq)]
    pub enum Token<'a> {
        Empty,
        /// Contains a separator but is not the lone separator.
        Path,
        CurDir,
        ParentDir,
        Root,
        Name(&'a str),
    }

    pub fn classify(arg: &str) -> Token<'_> {
        match arg {
            "" => Token::Empty,
            "." => Token::CurDir,
            ".." => Token::ParentDir,
            "/" => Token::Root,
            _ if arg.contains(SEPARATOR) => Token::Path,
            name => Token::Name(name),
        }
    }

}
