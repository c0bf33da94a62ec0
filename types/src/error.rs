//! Errors raised while constructing or parsing core types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("unknown workflow status code {0}")]
    UnknownStatus(u8),
}
