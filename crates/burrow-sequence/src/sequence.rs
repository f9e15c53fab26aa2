use crate::{counter::CounterStore, error::Error};
use std::sync::Mutex;
use tracing::{debug, error, info};
use typed_builder::TypedBuilder;

pub const DEFAULT_BLOCK_SIZE: u64 = 100;

/// Configures a [`Sequence`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct SequenceSettings {
    /// Number of IDs leased from the durable counter per write.
    ///
    /// Larger blocks mean fewer durable writes but a larger gap in the ID
    /// space whenever the process stops without releasing.
    #[builder(default = DEFAULT_BLOCK_SIZE)]
    pub block_size: u64,
}

impl Default for SequenceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The in-memory part of the lease: IDs in `[next, bound)` are owned by
/// this process and can be handed out without touching the counter.
#[derive(Debug)]
struct Window {
    next: u64,
    bound: u64,
}

/// Monotonic ID sequence that leases blocks of IDs from a durable counter.
///
/// The counter always holds an upper bound of every ID ever handed out, so a
/// restart after a crash starts past the last lease: some IDs may be skipped
/// but none is handed out twice.
pub struct Sequence<C: CounterStore> {
    counter: C,
    block_size: u64,
    window: Mutex<Window>,
}

impl<C: CounterStore> Sequence<C> {
    /// Loads the counter and leases the first block.
    pub fn new(counter: C, settings: SequenceSettings) -> Result<Self, Error> {
        if settings.block_size == 0 {
            return Err(Error::InvalidBlockSize(settings.block_size));
        }

        let next = counter.load()?;
        let bound = next.saturating_add(settings.block_size);
        counter.store(bound).inspect_err(|e| {
            error!(next, bound, error = %e, "failed to lease initial sequence window");
        })?;

        info!(next, bound, "leased sequence window");

        Ok(Self {
            counter,
            block_size: settings.block_size,
            window: Mutex::new(Window { next, bound }),
        })
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Hands out the next ID.
    ///
    /// When the window is used up the lease is extended while the lock is
    /// held, so concurrent callers queue behind a single durable write.
    pub fn next_id(&self) -> Result<u64, Error> {
        let mut window = self.window.lock().map_err(|_| Error::StatePoisoned)?;

        if window.next == window.bound {
            if window.bound == u64::MAX {
                return Err(Error::Exhausted);
            }

            let bound = window.bound.saturating_add(self.block_size);
            self.counter.store(bound).inspect_err(|e| {
                error!(next = window.next, bound, error = %e, "failed to extend sequence lease");
            })?;
            debug!(next = window.next, bound, "extended sequence lease");
            window.bound = bound;
        }

        let id = window.next;
        window.next += 1;

        Ok(id)
    }

    /// Gives the unused part of the window back to the counter.
    ///
    /// After a successful release the counter points at the next unused ID,
    /// so a clean restart skips nothing. The window is left empty: a later
    /// [`next_id`](Self::next_id) leases a fresh block.
    pub fn release(&self) -> Result<(), Error> {
        let mut window = self.window.lock().map_err(|_| Error::StatePoisoned)?;

        self.counter.store(window.next).inspect_err(|e| {
            error!(next = window.next, error = %e, "failed to release sequence window");
        })?;

        info!(
            next = window.next,
            returned = window.bound - window.next,
            "released sequence window"
        );
        window.bound = window.next;

        Ok(())
    }
}
