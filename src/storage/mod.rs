//! Storage backends and the conversation history adapter.

pub mod adapter;
pub mod file;
pub mod memory;
pub mod traits;

pub use adapter::{DEFAULT_SLOT_KEY, HistoryAdapter};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::SlotStorage;
