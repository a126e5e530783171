//! This module provides an in-memory simulation of a UNIX-like directory namespace.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use super::node::{Chained, DirNode, FileNode, Position, chain, find, locate};
use super::pool::{Key, Pool};
use crate::core::utils::{self, SEPARATOR, Token};
use crate::core::{FsBackend, FsError, Result};
use crate::{Entry, EntryType, Listing};

/// Mount ids are unique across every `SimFS` of the process, so a cursor is only
/// ever accepted by the instance and mount that issued it.
static NEXT_MOUNT: AtomicU64 = AtomicU64::new(1);

/// Position of a caller inside a mounted [`SimFS`].
///
/// A cursor is a plain value: operations take it and `cd()` returns a new one.
/// It stays valid while the directory it references is alive and the namespace it
/// was issued for is still mounted. Using it afterwards yields
/// [`FsError::Unmounted`] or [`FsError::StaleCursor`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cursor {
    dir: Key,
    mount: u64,
}

/// Numbers of nodes released by a removal.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Released {
    pub dirs: usize,
    pub files: usize,
}

/// An in-memory hierarchical namespace of directories and files.
///
/// ### Internal state
///
/// * `dirs`, `files` — node pools. Links between nodes are pool keys, never references.
/// * `mount` — id of the current mount; cursors issued by earlier mounts or by other
///   instances are rejected.
///
/// ### Invariants
///
/// 1. **Unique names**: within one directory no two entries share a name, whatever their kind.
/// 2. **Sorted chains**: the file chain and the subdirectory chain of every directory are
///    strictly increasing by name.
/// 3. **Parent consistency**: only the root has no parent and no name; every other directory
///    has a non-empty name without a separator.
/// 4. **Ownership**: a directory owns both of its chains. Removing it releases everything
///    below it.
///
/// ### Lifecycle
///
/// - `new()` creates an unmounted engine; `mkfs()` allocates the root and returns the first
///   cursor.
/// - `rmfs()` releases the whole tree. A new `mkfs()` is required before further use.
///
/// ### Thread Safety
///
/// This struct is **not thread‑safe**. Wrap it in a synchronization primitive at the
/// application level if it must be shared.
///
/// ### Example
///
/// ```
/// use fs_sim_kit::{FsBackend, SimFS};
///
/// let mut fs = SimFS::new();
/// let root = fs.mkfs().unwrap();
///
/// fs.mkdir(root, "docs").unwrap();
/// let docs = fs.cd(root, "docs").unwrap();
/// fs.touch(docs, "note.txt").unwrap();
///
/// assert_eq!(fs.pwd(docs).unwrap(), "/docs");
/// assert_eq!(fs.ls(root, "docs").unwrap().lines(), vec!["note.txt"]);
///
/// fs.rmfs(docs).unwrap();
/// assert!(!fs.is_mounted());
/// ```
pub struct SimFS {
    dirs: Pool<DirNode>,
    files: Pool<FileNode>,
    mount: Option<u64>,
}

impl Default for SimFS {
    fn default() -> Self {
        Self::new()
    }
}

impl SimFS {
    /// Creates an unmounted instance. Call `mkfs()` before any other operation.
    pub fn new() -> Self {
        Self {
            dirs: Pool::new(),
            files: Pool::new(),
            mount: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    /// Returns the numbers of live directories (root included) and files.
    pub fn node_count(&self) -> (usize, usize) {
        (self.dirs.len(), self.files.len())
    }

    /// Checks if `name` is a file or a subdirectory of the current directory.
    pub fn exists(&self, cursor: Cursor, name: &str) -> Result<bool> {
        let dir = self.dir_of(cursor)?;
        Ok(self.check_name(dir, name))
    }

    /// Checks if `name` is a subdirectory of the current directory.
    pub fn is_dir(&self, cursor: Cursor, name: &str) -> Result<bool> {
        let dir = self.dir_of(cursor)?;
        Ok(self.find_subdir(dir, name).is_some())
    }

    /// Checks if `name` is a file in the current directory.
    pub fn is_file(&self, cursor: Cursor, name: &str) -> Result<bool> {
        let dir = self.dir_of(cursor)?;
        Ok(self.find_file(dir, name).is_some())
    }

    fn dir_of(&self, cursor: Cursor) -> Result<Key> {
        let mount = self.mount.ok_or(FsError::Unmounted)?;
        if cursor.mount != mount || !self.dirs.contains(cursor.dir) {
            return Err(FsError::StaleCursor);
        }
        Ok(cursor.dir)
    }

    fn cursor(&self, dir: Key) -> Result<Cursor> {
        let mount = self.mount.ok_or(FsError::Unmounted)?;
        Ok(Cursor { dir, mount })
    }

    fn root_of(&self, mut dir: Key) -> Key {
        while let Some(parent) = self.dirs[dir].parent {
            dir = parent;
        }
        dir
    }

    fn find_file(&self, dir: Key, name: &str) -> Option<Key> {
        find(&self.files, self.dirs[dir].files, name)
    }

    fn find_subdir(&self, dir: Key, name: &str) -> Option<Key> {
        find(&self.dirs, self.dirs[dir].sub, name)
    }

    /// True if either chain of `dir` holds `name`.
    fn check_name(&self, dir: Key, name: &str) -> bool {
        self.find_file(dir, name).is_some() || self.find_subdir(dir, name).is_some()
    }

    fn owned_name(name: &str) -> Result<String> {
        let mut owned = String::new();
        owned.try_reserve_exact(name.len())?;
        owned.push_str(name);
        Ok(owned)
    }

    /// Merges the two sorted chains of `dir` into one listing.
    fn list_dir(&self, dir: Key) -> Result<Listing<'_>> {
        let node = &self.dirs[dir];
        let mut files = chain(&self.files, node.files).peekable();
        let mut subs = chain(&self.dirs, node.sub).peekable();
        let mut listing = Listing::default();

        loop {
            let take_file = match (files.peek(), subs.peek()) {
                (Some(&f), Some(&d)) => self.files[f].name() < self.dirs[d].name(),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            if take_file {
                if let Some(f) = files.next() {
                    listing.try_push(Entry::new(self.files[f].name(), EntryType::File))?;
                }
            } else if let Some(d) = subs.next() {
                listing.try_push(Entry::new(self.dirs[d].name(), EntryType::Directory))?;
            }
        }
        Ok(listing)
    }

    /// Unlinks every directory of the chain starting at `head` from its siblings and its
    /// parent. Returns the now independent subtree roots in chain order.
    fn sever_sibling_chain(&mut self, head: Option<Key>) -> Vec<Key> {
        let mut roots = Vec::new();
        let mut curr = head;
        while let Some(dir) = curr {
            let node = &mut self.dirs[dir];
            curr = node.next.take();
            node.parent = None;
            roots.push(dir);
        }
        roots
    }

    fn destroy_files(&mut self, dir: Key) -> usize {
        let mut count = 0;
        let mut curr = self.dirs[dir].files.take();
        while let Some(file) = curr {
            curr = self.files.release(file).and_then(|node| node.next);
            count += 1;
        }
        count
    }

    /// Releases `top` and everything it owns, post-order: the subdirectory chain first
    /// (each subtree completely, in chain order), then the files, then the directory.
    /// `top` must already be unlinked from any surviving directory.
    fn destroy_subtree(&mut self, top: Key) -> Released {
        let mut released = Released::default();
        let mut stack = vec![(top, false)];

        while let Some((dir, expanded)) = stack.pop() {
            if expanded {
                released.files += self.destroy_files(dir);
                self.dirs.release(dir);
                released.dirs += 1;
                continue;
            }
            stack.push((dir, true));
            let head = self.dirs[dir].sub.take();
            let subtrees = self.sever_sibling_chain(head);
            stack.extend(subtrees.into_iter().rev().map(|sub| (sub, false)));
        }
        released
    }

    fn remove_file(&mut self, dir: Key, name: &str) -> Option<Released> {
        let Position { prev, at } = locate(&self.files, self.dirs[dir].files, name);
        let file = at.filter(|&key| self.files[key].name() == name)?;
        let next = self.files[file].next();
        match prev {
            Some(prev) => self.files[prev].set_next(next),
            None => self.dirs[dir].files = next,
        }
        self.files.release(file);
        Some(Released { dirs: 0, files: 1 })
    }

    fn remove_subdir(&mut self, dir: Key, name: &str) -> Option<Released> {
        let Position { prev, at } = locate(&self.dirs, self.dirs[dir].sub, name);
        let sub = at.filter(|&key| self.dirs[key].name() == name)?;
        let next = self.dirs[sub].next();
        match prev {
            Some(prev) => self.dirs[prev].set_next(next),
            None => self.dirs[dir].sub = next,
        }
        let node = &mut self.dirs[sub];
        node.next = None;
        node.parent = None;
        Some(self.destroy_subtree(sub))
    }
}

impl FsBackend for SimFS {
    /// Allocates the root directory and returns a cursor positioned at it.
    /// Fails if a namespace is already mounted or memory cannot be obtained.
    fn mkfs(&mut self) -> Result<Cursor> {
        if self.mount.is_some() {
            return Err(FsError::AlreadyMounted);
        }
        let root = self.dirs.try_insert(DirNode::root())?;
        let mount = NEXT_MOUNT.fetch_add(1, Ordering::Relaxed);
        self.mount = Some(mount);
        debug!(mount, "filesystem created");
        self.cursor(root)
    }

    /// Creates an empty file `name` in the current directory.
    ///
    /// `.`, `..` and `/` are accepted but create nothing. Empty names, names with a
    /// separator and names already used by a file or subdirectory are rejected.
    fn touch(&mut self, cursor: Cursor, name: &str) -> Result<()> {
        let dir = self.dir_of(cursor)?;
        let name = match utils::classify(name) {
            Token::Empty | Token::Path => return Err(FsError::InvalidArgument(name.to_string())),
            Token::CurDir | Token::ParentDir | Token::Root => return Ok(()),
            Token::Name(name) => name,
        };
        if self.check_name(dir, name) {
            return Err(FsError::NameCollision(name.to_string()));
        }

        let Position { prev, at } = locate(&self.files, self.dirs[dir].files, name);
        let owned = Self::owned_name(name)?;
        let file = self.files.try_insert(FileNode { name: owned, next: at })?;
        match prev {
            Some(prev) => self.files[prev].set_next(Some(file)),
            None => self.dirs[dir].files = Some(file),
        }
        debug!(name, "file created");
        Ok(())
    }

    /// Creates an empty subdirectory `name` in the current directory.
    ///
    /// Unlike `touch()`, the sentinel tokens `.`, `..` and `/` are errors.
    fn mkdir(&mut self, cursor: Cursor, name: &str) -> Result<()> {
        let dir = self.dir_of(cursor)?;
        let name = match utils::classify(name) {
            Token::Empty | Token::Path => return Err(FsError::InvalidArgument(name.to_string())),
            Token::CurDir | Token::ParentDir | Token::Root => {
                return Err(FsError::ReservedName(name.to_string()));
            }
            Token::Name(name) => name,
        };
        if self.check_name(dir, name) {
            return Err(FsError::NameCollision(name.to_string()));
        }

        let Position { prev, at } = locate(&self.dirs, self.dirs[dir].sub, name);
        let owned = Self::owned_name(name)?;
        let sub = self.dirs.try_insert(DirNode::child(owned, dir, at))?;
        match prev {
            Some(prev) => self.dirs[prev].set_next(Some(sub)),
            None => self.dirs[dir].sub = Some(sub),
        }
        debug!(name, "directory created");
        Ok(())
    }

    /// Returns the cursor moved according to `arg`:
    /// * `.` — stay;
    /// * `..` — parent, or stay at the root;
    /// * empty or `/` — the root;
    /// * a name — that subdirectory of the current directory (files are not navigable).
    fn cd(&self, cursor: Cursor, arg: &str) -> Result<Cursor> {
        let dir = self.dir_of(cursor)?;
        let target = match utils::classify(arg) {
            Token::Path => return Err(FsError::InvalidArgument(arg.to_string())),
            Token::CurDir => dir,
            Token::ParentDir => self.dirs[dir].parent.unwrap_or(dir),
            Token::Empty | Token::Root => self.root_of(dir),
            Token::Name(name) => self
                .find_subdir(dir, name)
                .ok_or_else(|| FsError::NotFound(name.to_string()))?,
        };
        trace!(arg, "directory changed");
        self.cursor(target)
    }

    /// Lists a directory in lexicographic order, directories suffixed with `/`:
    /// * `.` or empty — the current directory;
    /// * `..` — the parent, or the current directory at the root;
    /// * `/` — the root;
    /// * a file name — just that file;
    /// * a subdirectory name — the contents of that subdirectory.
    fn ls(&self, cursor: Cursor, arg: &str) -> Result<Listing<'_>> {
        let dir = self.dir_of(cursor)?;
        let target = match utils::classify(arg) {
            Token::Path => return Err(FsError::InvalidArgument(arg.to_string())),
            Token::CurDir | Token::Empty => dir,
            Token::ParentDir => self.dirs[dir].parent.unwrap_or(dir),
            Token::Root => self.root_of(dir),
            Token::Name(name) => {
                if let Some(file) = self.find_file(dir, name) {
                    let mut listing = Listing::default();
                    listing.try_push(Entry::new(self.files[file].name(), EntryType::File))?;
                    return Ok(listing);
                }
                self.find_subdir(dir, name)
                    .ok_or_else(|| FsError::NotFound(name.to_string()))?
            }
        };
        self.list_dir(target)
    }

    /// Returns the absolute path of the current directory, `/` for the root.
    fn pwd(&self, cursor: Cursor) -> Result<String> {
        let mut curr = self.dir_of(cursor)?;
        let mut names = Vec::new();
        let mut len = 0;
        while let Some(parent) = self.dirs[curr].parent {
            let name = self.dirs[curr].name();
            names.try_reserve(1)?;
            names.push(name);
            len += name.len() + 1;
            curr = parent;
        }
        if names.is_empty() {
            return Ok(SEPARATOR.to_string());
        }

        names.reverse();
        let mut path = String::new();
        path.try_reserve_exact(len)?;
        for name in names {
            path.push(SEPARATOR);
            path.push_str(name);
        }
        Ok(path)
    }

    /// Removes the file or subdirectory `name` from the current directory.
    /// A subdirectory is removed with everything it contains.
    fn rm(&mut self, cursor: Cursor, name: &str) -> Result<Released> {
        let dir = self.dir_of(cursor)?;
        let name = match utils::classify(name) {
            Token::CurDir | Token::ParentDir | Token::Root => {
                return Err(FsError::ReservedName(name.to_string()));
            }
            Token::Empty | Token::Path => return Err(FsError::InvalidArgument(name.to_string())),
            Token::Name(name) => name,
        };

        let released = self
            .remove_file(dir, name)
            .or_else(|| self.remove_subdir(dir, name))
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        debug!(name, dirs = released.dirs, files = released.files, "entry removed");
        Ok(released)
    }

    /// Releases every directory and file of the tree `cursor` belongs to and unmounts it.
    fn rmfs(&mut self, cursor: Cursor) -> Result<Released> {
        let dir = self.dir_of(cursor)?;
        let root = self.root_of(dir);

        let released = self.destroy_subtree(root);
        self.mount = None;
        debug!(dirs = released.dirs, files = released.files, "filesystem removed");
        Ok(released)
    }
}
