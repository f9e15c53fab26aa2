use crate::error::{OpenStage, Result, ShortenerError};
use burrow_codec::{CodeCodec, CodecSettings, ShortCode};
use burrow_sequence::{CounterStore, Sequence, SequenceSettings};
use burrow_storage::{SledCounter, SledStore, StoreSettings, UrlStore};
use tracing::{debug, error, info, warn};
use typed_builder::TypedBuilder;

/// Configures a [`ShortenerStore`] independently of where its data lives.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ShortenerSettings {
    #[builder(default)]
    pub sequence: SequenceSettings,
    #[builder(default)]
    pub codec: CodecSettings,
}

/// Saves URLs under freshly allocated IDs and resolves short codes back.
///
/// The store is shared by all concurrent callers; only lease extension in
/// the sequence is serialized. [`close`](Self::close) consumes the store and
/// must only run once every in-flight call has finished.
pub struct ShortenerStore<S = SledStore, C = SledCounter>
where
    S: UrlStore,
    C: CounterStore,
{
    store: S,
    sequence: Sequence<C>,
    codec: CodeCodec,
}

impl ShortenerStore<SledStore, SledCounter> {
    /// Opens the sled dataset described by `store_settings` and keeps the
    /// sequence counter in it.
    pub fn open(store_settings: &StoreSettings, settings: &ShortenerSettings) -> Result<Self> {
        let store = SledStore::open(store_settings)
            .map_err(|e| ShortenerError::open(OpenStage::Store, e))?;
        let counter = store.counter();
        Self::from_parts(store, counter, settings)
    }
}

impl<S: UrlStore, C: CounterStore> ShortenerStore<S, C> {
    /// Builds a store from already opened dependencies.
    ///
    /// On failure everything acquired so far is released and closed before
    /// returning; the original error is reported, cleanup errors are only
    /// logged.
    pub fn from_parts(store: S, counter: C, settings: &ShortenerSettings) -> Result<Self> {
        let sequence = match Sequence::new(counter, settings.sequence) {
            Ok(sequence) => sequence,
            Err(e) => {
                error!(error = %e, "failed to acquire sequence");
                close_quietly(store);
                return Err(ShortenerError::open(OpenStage::Sequence, e));
            }
        };

        let codec = match CodeCodec::new(settings.codec.clone()) {
            Ok(codec) => codec,
            Err(e) => {
                error!(error = %e, "failed to build code codec");
                if let Err(release_err) = sequence.release() {
                    warn!(error = %release_err, "failed to release sequence during cleanup");
                }
                close_quietly(store);
                return Err(ShortenerError::open(OpenStage::Codec, e));
            }
        };

        info!(
            block_size = sequence.block_size(),
            min_length = codec.min_length(),
            "shortener store opened"
        );

        Ok(Self {
            store,
            sequence,
            codec,
        })
    }

    /// Returns the codec used to turn IDs into short codes.
    pub fn codec(&self) -> &CodeCodec {
        &self.codec
    }

    /// Stores `url` under a new ID and returns its short code.
    ///
    /// Allocation and the write are not one transaction: if the write
    /// fails the allocated ID is simply never used.
    pub fn save(&self, url: &str) -> Result<ShortCode> {
        let id = self.sequence.next_id().map_err(|e| {
            error!(error = %e, "failed to allocate id for url");
            ShortenerError::Allocation(e)
        })?;

        let code = self.codec.encode(id);

        self.store.insert(id, url).map_err(|e| {
            error!(id, error = %e, "failed to store url");
            ShortenerError::Persistence(e)
        })?;

        debug!(id, code = %code, "saved url");
        Ok(code)
    }

    /// Returns the URL saved under `code`.
    ///
    /// A code this codec could not have produced is
    /// [`InvalidCode`](ShortenerError::InvalidCode); a valid code with no
    /// record is [`NotFound`](ShortenerError::NotFound).
    pub fn resolve(&self, code: &str) -> Result<String> {
        let id = self
            .codec
            .decode(code)
            .map_err(ShortenerError::InvalidCode)?;

        match self.store.get(id) {
            Ok(Some(url)) => Ok(url),
            Ok(None) => Err(ShortenerError::NotFound(code.to_string())),
            Err(e) => {
                error!(id, code, error = %e, "failed to retrieve url");
                Err(ShortenerError::Persistence(e))
            }
        }
    }

    /// Releases the sequence, then closes the underlying store.
    ///
    /// Both steps always run. A release failure takes precedence over a
    /// close failure in the returned error.
    pub fn close(self) -> Result<()> {
        info!("closing shortener store");

        let released = self.sequence.release();
        if let Err(e) = &released {
            error!(error = %e, "failed to release sequence");
            warn!("closing store anyway");
        }

        let closed = self.store.close();
        if let Err(e) = &closed {
            error!(error = %e, "failed to close store");
        }

        released.map_err(ShortenerError::Release)?;
        closed.map_err(ShortenerError::Persistence)?;

        info!("shortener store closed");
        Ok(())
    }
}

fn close_quietly<S: UrlStore>(store: S) {
    if let Err(e) = store.close() {
        warn!(error = %e, "failed to close store during cleanup");
    }
}
