use burrow_sequence::CounterStore;
use burrow_storage::{StorageError, UrlStore};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An operation that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Reading the durable counter.
    CounterLoad,
    /// Writing the durable counter (lease extension and release).
    CounterStore,
    /// Writing a URL record.
    Insert,
    /// Reading a URL record.
    Get,
    /// Closing the store.
    Close,
}

const FAULT_COUNT: usize = 5;

impl Fault {
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Fault::CounterLoad => "counter load",
            Fault::CounterStore => "counter store",
            Fault::Insert => "insert",
            Fault::Get => "get",
            Fault::Close => "close",
        };
        f.write_str(name)
    }
}

/// Shared switchboard of injected faults.
///
/// Clones share state, so a test keeps one handle and gives clones to the
/// wrapped dependencies.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    flags: Arc<[AtomicBool; FAULT_COUNT]>,
}

impl Faults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self, fault: Fault) {
        self.flags[fault.index()].store(true, Ordering::SeqCst);
    }

    pub fn disable(&self, fault: Fault) {
        self.flags[fault.index()].store(false, Ordering::SeqCst);
    }

    pub fn is_enabled(&self, fault: Fault) -> bool {
        self.flags[fault.index()].load(Ordering::SeqCst)
    }

    /// Message carried by every injected error.
    pub fn message(fault: Fault) -> String {
        format!("injected {fault} fault")
    }
}

/// Wraps a [`CounterStore`] and fails the operations switched on in
/// [`Faults`].
pub struct FaultyCounter<C> {
    inner: C,
    faults: Faults,
}

impl<C: CounterStore> FaultyCounter<C> {
    pub fn new(inner: C, faults: Faults) -> Self {
        Self { inner, faults }
    }
}

impl<C: CounterStore> CounterStore for FaultyCounter<C> {
    fn load(&self) -> Result<u64, burrow_sequence::Error> {
        if self.faults.is_enabled(Fault::CounterLoad) {
            return Err(burrow_sequence::Error::Counter(Faults::message(
                Fault::CounterLoad,
            )));
        }
        self.inner.load()
    }

    fn store(&self, value: u64) -> Result<(), burrow_sequence::Error> {
        if self.faults.is_enabled(Fault::CounterStore) {
            return Err(burrow_sequence::Error::Counter(Faults::message(
                Fault::CounterStore,
            )));
        }
        self.inner.store(value)
    }
}

/// Wraps a [`UrlStore`] and fails the operations switched on in [`Faults`].
///
/// An injected close fault still closes the inner store, the way a real
/// engine may report an error after releasing its files.
pub struct FaultyStore<S> {
    inner: S,
    faults: Faults,
}

impl<S: UrlStore> FaultyStore<S> {
    pub fn new(inner: S, faults: Faults) -> Self {
        Self { inner, faults }
    }
}

impl<S: UrlStore> UrlStore for FaultyStore<S> {
    fn get(&self, id: u64) -> burrow_storage::Result<Option<String>> {
        if self.faults.is_enabled(Fault::Get) {
            return Err(StorageError::Operation(Faults::message(Fault::Get)));
        }
        self.inner.get(id)
    }

    fn insert(&self, id: u64, url: &str) -> burrow_storage::Result<()> {
        if self.faults.is_enabled(Fault::Insert) {
            return Err(StorageError::Operation(Faults::message(Fault::Insert)));
        }
        self.inner.insert(id, url)
    }

    fn close(self) -> burrow_storage::Result<()> {
        let result = self.inner.close();
        if self.faults.is_enabled(Fault::Close) {
            return Err(StorageError::Operation(Faults::message(Fault::Close)));
        }
        result
    }
}
