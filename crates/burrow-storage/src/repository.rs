use crate::error::Result;

/// Durable `id -> url` mapping.
///
/// Implementations must be crash-consistent and allow exactly one owning
/// process per dataset. Records are write-once.
pub trait UrlStore: Send + Sync + 'static {
    /// Retrieves the URL stored under `id`.
    /// Returns `None` if no record exists.
    fn get(&self, id: u64) -> Result<Option<String>>;

    /// Stores `url` under `id`. Returns `Err(Conflict)` if the id is taken.
    fn insert(&self, id: u64, url: &str) -> Result<()>;

    /// Flushes outstanding writes and closes the store.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Fixed-width key for an id. The same byte order is used on write and
/// read, so lookups are exact matches.
pub fn id_key(id: u64) -> [u8; 8] {
    id.to_le_bytes()
}
