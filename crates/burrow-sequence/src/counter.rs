use crate::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

/// Durable home of the sequence lease bound.
///
/// The value stored is the first ID that has *not* been leased out. A store
/// that has never been written must load as `0`.
pub trait CounterStore: Send + Sync {
    /// Reads the persisted counter value.
    fn load(&self) -> Result<u64, Error>;
    /// Persists `value`; must not return before the write is durable.
    fn store(&self, value: u64) -> Result<(), Error>;
}

impl<C: CounterStore + ?Sized> CounterStore for Arc<C> {
    fn load(&self) -> Result<u64, Error> {
        (**self).load()
    }

    fn store(&self, value: u64) -> Result<(), Error> {
        (**self).store(value)
    }
}

/// A volatile counter, handy for tests and for embedding the sequence in
/// processes that do not need persistence.
///
/// Clones share the same underlying value, so a clone can be handed to a
/// [`Sequence`](crate::Sequence) while the original is kept to inspect
/// what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryCounter {
    inner: Arc<Mutex<u64>>,
}

impl MemoryCounter {
    pub fn new(value: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    /// Returns the last stored value. A poisoned lock still holds a
    /// complete `u64`, so it is read through.
    pub fn value(&self) -> u64 {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CounterStore for MemoryCounter {
    fn load(&self) -> Result<u64, Error> {
        self.inner
            .lock()
            .map(|value| *value)
            .map_err(|_| Error::StatePoisoned)
    }

    fn store(&self, value: u64) -> Result<(), Error> {
        let mut current = self.inner.lock().map_err(|_| Error::StatePoisoned)?;
        *current = value;
        Ok(())
    }
}
