//! Error types shared by every construction path.

use std::collections::TryReserveError;
use thiserror::Error;

/// Allocation failure while growing a table, scope, or module.
///
/// This is the only recoverable error in the core; lookup misses are
/// reported as `None`, not as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// A backing vector could not reserve the requested number of slots.
    #[error("failed to reserve {requested} slots: {source}")]
    Reserve {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
    /// The requested capacity does not fit the table's 32-bit slot handles.
    #[error("capacity {0} exceeds the maximum table size")]
    CapacityOverflow(usize),
}

impl AllocError {
    /// Wrap a failed `try_reserve` call for `requested` additional slots.
    pub fn reserve(requested: usize, source: TryReserveError) -> Self {
        AllocError::Reserve { requested, source }
    }
}
