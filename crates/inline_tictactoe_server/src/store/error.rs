//! Failures of the key-value store.
//!
//! Every backend problem (SQLite connection, query, lock poisoning, a
//! counter that cannot be parsed or bumped, a game record that cannot be
//! decoded) collapses into one [`StoreError`]. Callers never branch on the
//! cause; they report it and drop the event.

use derive_more::{Display, Error};
use tracing::instrument;

/// A key-value operation failed.
///
/// Carries the store-side location that raised it, so a log line points at
/// the failing read, write or increment.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// What went wrong, including the key where one is involved.
    pub message: String,
    /// Line of the store operation that failed.
    pub line: u32,
    /// File of the store operation that failed.
    pub file: &'static str,
}

impl StoreError {
    /// Records a failure at the calling store operation.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("SQLite query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("SQLite connection failed: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Game record could not be decoded: {}", err))
    }
}
