//! Leased ID sequence for the burrow URL shortener.
//!
//! IDs are handed out from an in-memory window that is reserved in blocks
//! from a durable [`CounterStore`].

mod counter;
pub mod error;
mod sequence;

pub use counter::{CounterStore, MemoryCounter};
pub use error::Error;
pub use sequence::{Sequence, SequenceSettings, DEFAULT_BLOCK_SIZE};
