/// Errors from memory region and stream operations.
///
/// Every variant is fatal for the encode in progress: the region is left in
/// an unspecified state and must be discarded.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InteropError {
    /// The allocator (or the configured capacity ceiling) refused to grow.
    #[error("out of memory: cannot grow region to {requested} bytes")]
    OutOfMemory { requested: usize },

    /// The requested size does not fit the protocol's signed 32-bit lengths.
    #[error("capacity overflow: {requested} bytes exceeds the protocol limit of {limit}")]
    CapacityOverflow { requested: usize, limit: usize },

    /// A logical length larger than the current capacity was published.
    #[error("length {length} exceeds capacity {capacity}")]
    LengthOutOfBounds { length: usize, capacity: usize },
}

/// Result alias for interop operations.
pub type InteropResult<T> = Result<T, InteropError>;
