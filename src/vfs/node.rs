use super::pool::{Key, Pool};

/// A node that belongs to a sorted, singly-linked sibling chain.
pub(crate) trait Chained {
    fn name(&self) -> &str;
    fn next(&self) -> Option<Key>;
    fn set_next(&mut self, next: Option<Key>);
}

pub(crate) struct DirNode {
    pub name: Option<String>, // `None` only for the root
    pub parent: Option<Key>,  // non-owning
    pub sub: Option<Key>,     // head of the subdirectory chain
    pub files: Option<Key>,   // head of the file chain
    pub next: Option<Key>,    // next sibling in the parent's subdirectory chain
}

impl DirNode {
    pub fn root() -> Self {
        Self {
            name: None,
            parent: None,
            sub: None,
            files: None,
            next: None,
        }
    }

    pub fn child(name: String, parent: Key, next: Option<Key>) -> Self {
        Self {
            name: Some(name),
            parent: Some(parent),
            sub: None,
            files: None,
            next,
        }
    }
}

impl Chained for DirNode {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    fn next(&self) -> Option<Key> {
        self.next
    }

    fn set_next(&mut self, next: Option<Key>) {
        self.next = next;
    }
}

pub(crate) struct FileNode {
    pub name: String,
    pub next: Option<Key>,
}

impl Chained for FileNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn next(&self) -> Option<Key> {
        self.next
    }

    fn set_next(&mut self, next: Option<Key>) {
        self.next = next;
    }
}

/// Place of `name` in a sorted chain.
///
/// `at` is the first node whose name is not less than `name`, `prev` the node
/// before it. A new node goes between the two.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Position {
    pub prev: Option<Key>,
    pub at: Option<Key>,
}

pub(crate) fn locate<T: Chained>(pool: &Pool<T>, head: Option<Key>, name: &str) -> Position {
    let mut prev = None;
    let mut at = head;
    while let Some(key) = at {
        let node = &pool[key];
        if node.name() >= name {
            break;
        }
        prev = at;
        at = node.next();
    }
    Position { prev, at }
}

/// Returns the node named exactly `name`.
pub(crate) fn find<T: Chained>(pool: &Pool<T>, head: Option<Key>, name: &str) -> Option<Key> {
    locate(pool, head, name)
        .at
        .filter(|&key| pool[key].name() == name)
}

/// Iterates a chain from `head` following the `next` links.
pub(crate) fn chain<T: Chained>(pool: &Pool<T>, head: Option<Key>) -> impl Iterator<Item = Key> + '_ {
    std::iter::successors(head, move |&key| pool[key].next())
}
