//! Error taxonomy for tracker operations.
//!
//! Three failure classes exist at the façade boundary:
//!
//! * [`TrackerError::InvalidTotal`]: a rejected argument. The original
//!   "must be a number" half of validation is enforced statically by the
//!   `u64` parameter types; only positivity remains a runtime check.
//! * [`TrackerError::BarNotFound`]: an unknown registry identifier.
//! * [`TrackerError::Engine`]: the underlying rendering engine call failed.
//!   The variant carries the name of the tracker operation that issued the
//!   call plus the engine failure as its source.
//!
//! All errors surface synchronously to the immediate caller; the trackers
//! perform no retry or recovery of their own.

use thiserror::Error;

use crate::engine::EngineError;
use crate::multi::BarId;

/// An error raised by a [`SingleTracker`](crate::SingleTracker) or
/// [`MultiTracker`](crate::MultiTracker) operation.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The declared total was not a positive number.
    #[error("total must be a positive number, got {given}")]
    InvalidTotal {
        /// The rejected total.
        given: u64,
    },

    /// No bar is registered under the given identifier.
    #[error("bar with id {id} does not exist")]
    BarNotFound {
        /// The identifier that missed the registry.
        id: BarId,
    },

    /// A rendering engine call failed.
    #[error("failed to {op} progress bar: {source}")]
    Engine {
        /// The tracker operation that issued the engine call.
        op: &'static str,
        /// The underlying engine failure.
        #[source]
        source: EngineError,
    },
}

impl TrackerError {
    /// Wraps an engine failure with the name of the operation that hit it.
    #[must_use]
    pub(crate) fn engine(op: &'static str, source: EngineError) -> Self {
        Self::Engine { op, source }
    }
}
