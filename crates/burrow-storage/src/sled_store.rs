use crate::error::{Result, StorageError};
use crate::repository::{id_key, UrlStore};
use burrow_sequence::CounterStore;
use sled::Db;
use std::path::PathBuf;
use tracing::{debug, error, info, trace};
use typed_builder::TypedBuilder;

/// Key of the durable sequence counter. Its length keeps it outside the
/// 8-byte id keyspace.
pub const SEQUENCE_KEY: &[u8] = b"seq";

/// Configures a [`SledStore`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct StoreSettings {
    /// Directory holding the sled dataset; created if missing.
    #[builder(setter(into))]
    pub path: PathBuf,
    /// Flush every URL insert before acknowledging it.
    #[builder(default = true)]
    pub sync_writes: bool,
    /// Page cache size in bytes.
    #[builder(default = 64 * 1024 * 1024)]
    pub cache_capacity: u64,
}

/// [`UrlStore`] backed by an embedded sled database.
///
/// sled holds an exclusive lock on the dataset directory, so a second
/// process (or a second open in this one) fails instead of sharing it.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: Db,
    sync_writes: bool,
}

impl SledStore {
    pub fn open(settings: &StoreSettings) -> Result<Self> {
        let db = sled::Config::new()
            .path(&settings.path)
            .cache_capacity(settings.cache_capacity)
            .open()
            .map_err(|e| {
                error!(path = %settings.path.display(), error = %e, "failed to open sled store");
                map_sled_error(e)
            })?;

        info!(path = %settings.path.display(), "opened sled store");

        Ok(Self {
            db,
            sync_writes: settings.sync_writes,
        })
    }

    /// Returns the durable sequence counter living in this dataset.
    pub fn counter(&self) -> SledCounter {
        SledCounter {
            db: self.db.clone(),
        }
    }

    fn flush(&self) -> Result<()> {
        self.db.flush().map(|_| ()).map_err(map_sled_error)
    }
}

fn map_sled_error(err: sled::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sled::Error::Io(_) => StorageError::Unavailable(message),
        sled::Error::Corruption { .. } => StorageError::InvalidData(message),
        _ => StorageError::Operation(message),
    }
}

impl UrlStore for SledStore {
    fn get(&self, id: u64) -> Result<Option<String>> {
        trace!(id, "fetching url record");

        let Some(value) = self.db.get(id_key(id)).map_err(map_sled_error)? else {
            return Ok(None);
        };

        String::from_utf8(value.to_vec())
            .map(Some)
            .map_err(|e| StorageError::InvalidData(format!("url for id {id} is not utf-8: {e}")))
    }

    fn insert(&self, id: u64, url: &str) -> Result<()> {
        let swapped = self
            .db
            .compare_and_swap(id_key(id), None::<&[u8]>, Some(url.as_bytes()))
            .map_err(map_sled_error)?;

        if swapped.is_err() {
            return Err(StorageError::Conflict(id));
        }

        if self.sync_writes {
            self.flush()?;
        }

        trace!(id, "stored url record");
        Ok(())
    }

    /// Flushes the dataset. sled drops its directory lock only once every
    /// handle is gone, including each [`SledCounter`] from
    /// [`counter`](SledStore::counter); those must not outlive this call
    /// if the dataset is to be reopened.
    fn close(self) -> Result<()> {
        self.flush().inspect_err(|e| {
            error!(error = %e, "failed to flush sled store on close");
        })?;
        debug!("closed sled store");
        Ok(())
    }
}

/// Durable sequence counter stored under [`SEQUENCE_KEY`].
///
/// Every write is flushed before returning; the sequence relies on the
/// stored bound surviving a crash. The counter shares the database handle,
/// so it keeps the dataset locked until it is dropped.
#[derive(Debug, Clone)]
pub struct SledCounter {
    db: Db,
}

impl SledCounter {
    fn read(&self) -> Result<u64> {
        let Some(value) = self.db.get(SEQUENCE_KEY).map_err(map_sled_error)? else {
            return Ok(0);
        };

        let bytes = <[u8; 8]>::try_from(&value[..]).map_err(|_| {
            StorageError::InvalidData(format!(
                "sequence counter must be 8 bytes, got {}",
                value.len()
            ))
        })?;

        Ok(u64::from_be_bytes(bytes))
    }

    fn write(&self, value: u64) -> Result<()> {
        self.db
            .insert(SEQUENCE_KEY, &value.to_be_bytes()[..])
            .map_err(map_sled_error)?;
        self.db.flush().map_err(map_sled_error)?;
        Ok(())
    }
}

impl CounterStore for SledCounter {
    fn load(&self) -> std::result::Result<u64, burrow_sequence::Error> {
        self.read()
            .map_err(|e| burrow_sequence::Error::Counter(e.to_string()))
    }

    fn store(&self, value: u64) -> std::result::Result<(), burrow_sequence::Error> {
        self.write(value)
            .map_err(|e| burrow_sequence::Error::Counter(e.to_string()))
    }
}
