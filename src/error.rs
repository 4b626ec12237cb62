//! Error types for the session store.

use sea_orm::DbErr;

/// Errors produced by the store engine and its codec.
///
/// The write path (`save`, `delete`) surfaces all of these to the caller.
/// `lookup` swallows everything and falls back to a fresh session; the
/// `Expired` and `NotFound` variants exist so the swallow points can log
/// a distinguishable reason.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serializing or signing a payload failed.
    #[error("session encode error: {0}")]
    Encode(String),

    /// A token failed authentication or a payload failed to deserialize.
    #[error("session decode error: {0}")]
    Decode(String),

    /// The underlying database operation failed.
    #[error("session backend error: {0}")]
    Backend(#[from] DbErr),

    /// The row exists but its `expires_on` has passed.
    #[error("session expired")]
    Expired,

    /// No row matches the session identifier.
    #[error("session not found")]
    NotFound,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
