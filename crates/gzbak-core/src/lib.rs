//! # gzbak-core
//!
//! Core library for the gzbak CLI providing:
//! - Configuration file parsing (gzbak.yaml)
//! - Absolute, slash-normalized path resolution shared by the archive codec
//! - Error types for configuration and path handling

pub mod config;
pub mod error;
pub mod paths;

pub use config::{GzbakConfig, GzbakConfigFile};
pub use error::{Error, Result};
pub use paths::{relative_name, resolve_absolute, to_slash};
