use crate::error::{Result, ShortenerError};
use crate::shortener::Shortener;
use crate::store::ShortenerStore;
use async_trait::async_trait;
use burrow_codec::ShortCode;
use burrow_sequence::CounterStore;
use burrow_storage::{SledCounter, SledStore, UrlStore};
use std::sync::Arc;
use tracing::{debug, error};

/// Async front of a [`ShortenerStore`].
///
/// Store calls block on disk I/O, so each one runs on tokio's blocking
/// pool. Clones share the same store.
pub struct ShortenerService<S = SledStore, C = SledCounter>
where
    S: UrlStore,
    C: CounterStore,
{
    store: Arc<ShortenerStore<S, C>>,
}

impl<S: UrlStore, C: CounterStore> Clone for ShortenerService<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: UrlStore, C: CounterStore + 'static> ShortenerService<S, C> {
    pub fn new(store: ShortenerStore<S, C>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Validates that the URL can be stored.
    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&ShortenerStore<S, C>) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| {
                error!(error = %e, "blocking store task failed");
                ShortenerError::Runtime(e.to_string())
            })?
    }

    /// Closes the store once this is the last handle to it.
    pub async fn shutdown(self) -> Result<()> {
        let store = Arc::try_unwrap(self.store).map_err(|shared| {
            let others = Arc::strong_count(&shared) - 1;
            error!(others, "cannot close store while it is still shared");
            ShortenerError::InUse(others)
        })?;

        tokio::task::spawn_blocking(move || store.close())
            .await
            .map_err(|e| ShortenerError::Runtime(e.to_string()))?
    }
}

#[async_trait]
impl<S: UrlStore, C: CounterStore + 'static> Shortener for ShortenerService<S, C> {
    async fn shorten(&self, url: &str) -> Result<ShortCode> {
        Self::validate_url(url)?;

        let url = url.to_owned();
        let code = self.run_blocking(move |store| store.save(&url)).await?;

        debug!(code = %code, "shortened url");
        Ok(code)
    }

    async fn resolve(&self, code: &str) -> Result<String> {
        let code = code.to_owned();
        self.run_blocking(move |store| store.resolve(&code)).await
    }
}
