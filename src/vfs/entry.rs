use std::collections::TryReserveError;
use std::fmt;

use crate::core::utils::SEPARATOR;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EntryType {
    File,
    Directory,
}

/// One line of a directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    name: &'a str,
    entry_type: EntryType,
}

impl<'a> Entry<'a> {
    pub fn new(name: &'a str, entry_type: EntryType) -> Entry<'a> {
        Entry { name, entry_type }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}

/// Directories are rendered with a trailing separator.
impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry_type {
            EntryType::File => write!(f, "{}", self.name),
            EntryType::Directory => write!(f, "{}{}", self.name, SEPARATOR),
        }
    }
}

/// Result of `ls()`: entries in lexicographic order, files and directories interleaved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> Listing<'a> {
    pub(crate) fn try_push(&mut self, entry: Entry<'a>) -> Result<(), TryReserveError> {
        self.entries.try_reserve(1)?;
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered lines, one per entry.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<'a>> {
        self.entries.iter()
    }
}

/// Every entry on its own line, each line newline-terminated.
impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
