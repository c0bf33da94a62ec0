//! Shared utilities for the ballot workspace.

pub mod error;
pub mod logging;

pub use error::UtilsError;
pub use logging::{init_logging, LogFormat};
