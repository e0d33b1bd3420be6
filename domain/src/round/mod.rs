//! Rounds and the entries they own.

pub mod entities;
pub mod entry_pool;

pub use entities::{Entry, Round};
pub use entry_pool::EntryPool;
