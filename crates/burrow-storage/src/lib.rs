//! Persistence for the burrow URL shortener.
//!
//! [`UrlStore`] is the contract the shortener needs from a key-value engine;
//! [`SledStore`] implements it on top of an embedded `sled` database, and
//! [`SledCounter`] keeps the durable ID sequence in the same dataset.

pub mod error;
pub mod repository;
pub mod sled_store;

pub use sled_store::{SledCounter, SledStore, StoreSettings, SEQUENCE_KEY};
pub use error::{Result, StorageError};
pub use repository::{id_key, UrlStore};
