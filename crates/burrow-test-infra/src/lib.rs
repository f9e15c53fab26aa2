//! Fixtures shared by the burrow test suites: disposable dataset
//! directories and fault-injecting wrappers for the storage dependencies.

pub mod data_dir;
pub mod error;
pub mod faults;

pub use data_dir::{DataDirConfig, TempDataDir};
pub use error::{Result, TestInfraError};
pub use faults::{Fault, FaultyCounter, FaultyStore, Faults};
