//! Reversible short codes for the burrow URL shortener.
//!
//! Sequential IDs are turned into short salted Hashids strings. Codes are
//! deterministic and decodable; they are not meant to be unguessable.

mod codec;
pub mod error;
mod hashids;
mod shortcode;

pub use codec::{CodeCodec, CodecSettings, DEFAULT_ALPHABET, DEFAULT_MIN_LENGTH};
pub use error::Error;
pub use shortcode::ShortCode;
