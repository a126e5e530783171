mod entry;
mod node;
mod pool;
mod sim_fs;

pub use entry::{Entry, EntryType, Listing};
pub use sim_fs::{Cursor, Released, SimFS};
