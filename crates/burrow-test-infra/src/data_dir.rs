use crate::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct DataDirConfig {
    #[builder(default = "burrow-".to_string(), setter(into))]
    prefix: String,
    /// Name of the dataset directory inside the temporary root.
    #[builder(default = "db".to_string(), setter(into))]
    dataset: String,
}

/// Test fixture for a disposable dataset directory.
///
/// The directory and everything in it is removed when the fixture drops,
/// so keep it alive for as long as any store opened on it.
pub struct TempDataDir {
    root: TempDir,
    dataset: PathBuf,
}

impl TempDataDir {
    pub fn new(config: DataDirConfig) -> Result<Self> {
        let root = tempfile::Builder::new().prefix(&config.prefix).tempdir()?;
        let dataset = root.path().join(&config.dataset);
        Ok(Self { root, dataset })
    }

    /// Returns the temporary root directory.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Returns the path the dataset should be opened at. It does not exist
    /// until a store creates it.
    pub fn dataset_path(&self) -> &Path {
        &self.dataset
    }
}
