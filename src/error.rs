use thiserror::Error;

/// Errors returned when building a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A cache must be able to hold at least one entry.
    #[error("capacity must be greater than 0")]
    ZeroCapacity,
}
