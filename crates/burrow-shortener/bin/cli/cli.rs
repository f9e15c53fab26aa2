use burrow_codec::{CodecSettings, DEFAULT_MIN_LENGTH};
use burrow_sequence::{SequenceSettings, DEFAULT_BLOCK_SIZE};
use burrow_shortener::ShortenerSettings;
use burrow_storage::StoreSettings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "BURROW_DATA_DIR";
pub const SALT_ENV: &str = "BURROW_SALT";
pub const MIN_LENGTH_ENV: &str = "BURROW_MIN_LENGTH";
pub const BLOCK_SIZE_ENV: &str = "BURROW_BLOCK_SIZE";
pub const BASE_URL_ENV: &str = "BURROW_BASE_URL";

pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Parser)]
#[command(name = "burrow", about = "Shorten and resolve URLs in a local dataset")]
pub struct CLI {
    #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    #[arg(long, env = SALT_ENV, default_value = "")]
    pub salt: String,

    #[arg(long, env = MIN_LENGTH_ENV, default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,

    #[arg(long, env = BLOCK_SIZE_ENV, default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: u64,

    /// Print full short URLs under this base instead of bare codes.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a URL and print its short code.
    Shorten { url: String },
    /// Print the URL stored under a short code.
    Resolve { code: String },
}

impl CLI {
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings::builder().path(self.data_dir.clone()).build()
    }

    pub fn shortener_settings(&self) -> ShortenerSettings {
        ShortenerSettings::builder()
            .sequence(
                SequenceSettings::builder()
                    .block_size(self.block_size)
                    .build(),
            )
            .codec(
                CodecSettings::builder()
                    .salt(self.salt.clone())
                    .min_length(self.min_length)
                    .build(),
            )
            .build()
    }
}
