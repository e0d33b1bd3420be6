//! Vote store adapters
//!
//! - [`InMemoryVoteStore`]: process-local, for tests and embedding
//! - [`JsonFileVoteStore`]: the same state persisted as a JSON snapshot

mod json_file;
mod memory;
mod state;

pub use json_file::JsonFileVoteStore;
pub use memory::InMemoryVoteStore;
pub use state::{RoundRecord, StoreState};
