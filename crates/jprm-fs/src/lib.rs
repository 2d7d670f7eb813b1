//! Filesystem primitives for the plugin repository manager
//!
//! Provides atomic writes, format-aware config loading, MD5 checksums and
//! zip archive handling. Nothing in here knows about plugins.

pub mod archive;
pub mod checksum;
pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
