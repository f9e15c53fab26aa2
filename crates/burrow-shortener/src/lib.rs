//! URL shortener store and service.
//!
//! [`ShortenerStore`] ties together the leased ID sequence, the short code
//! codec and the durable URL store. [`ShortenerService`] exposes it through
//! the async [`Shortener`] trait for request handlers.

pub mod error;
pub mod service;
pub mod shortener;
pub mod store;

pub use burrow_codec::ShortCode;
pub use error::{OpenStage, Result, ShortenerError};
pub use service::ShortenerService;
pub use shortener::Shortener;
pub use store::{ShortenerSettings, ShortenerStore};
