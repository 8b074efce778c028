use tracing::debug;

use crate::config::MemoryConfig;
use crate::error::{InteropError, InteropResult};

/// Largest region the protocol can address: lengths and offsets are `i32`.
pub const MAX_REGION_CAPACITY: usize = i32::MAX as usize;

/// A contiguous, growable byte region an encoder writes into.
///
/// The region may be owned by this process or shared with another runtime;
/// the encoder only relies on this contract:
/// - `data()`/`data_mut()` cover the whole capacity. They borrow the region,
///   so no view can outlive a call to `reallocate`.
/// - `reallocate` preserves existing bytes at their offsets.
/// - `len()` is the logical length published by the last `set_len`, and
///   never exceeds `capacity()`.
pub trait InteropMemory {
    /// Bytes currently allocated.
    fn capacity(&self) -> usize;

    /// Logical number of valid bytes.
    fn len(&self) -> usize;

    /// Returns `true` if no bytes have been published.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Publish the logical length.
    fn set_len(&mut self, length: usize) -> InteropResult<()>;

    /// The whole allocation.
    fn data(&self) -> &[u8];

    /// The whole allocation, mutably.
    fn data_mut(&mut self) -> &mut [u8];

    /// Grow to at least `capacity` bytes.
    ///
    /// Returns `Err` when the allocation cannot be satisfied.
    fn reallocate(&mut self, capacity: usize) -> InteropResult<()>;
}

/// Heap-backed memory region.
pub struct HeapMemory {
    buf: Vec<u8>,
    length: usize,
    limit: usize,
}

impl HeapMemory {
    /// Create an empty region with no allocation.
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            length: 0,
            limit: MAX_REGION_CAPACITY,
        }
    }

    /// Create a region with `capacity` bytes allocated up front.
    pub fn with_capacity(capacity: usize) -> InteropResult<Self> {
        Self::from_config(&MemoryConfig {
            initial_capacity: capacity,
            max_capacity: None,
        })
    }

    /// Create a region sized by `config`.
    pub fn from_config(config: &MemoryConfig) -> InteropResult<Self> {
        config.validate()?;
        let mut mem = Self {
            buf: Vec::new(),
            length: 0,
            limit: config.capacity_limit(),
        };
        mem.reallocate(config.initial_capacity)?;
        Ok(mem)
    }

    /// Growth ceiling of this region.
    pub fn capacity_limit(&self) -> usize {
        self.limit
    }

    /// The published bytes (`..len()`).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.length]
    }

    /// Hand the published bytes to the caller, releasing the headroom.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.truncate(self.length);
        self.buf
    }
}

impl Default for HeapMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl InteropMemory for HeapMemory {
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn len(&self) -> usize {
        self.length
    }

    fn set_len(&mut self, length: usize) -> InteropResult<()> {
        if length > self.buf.len() {
            return Err(InteropError::LengthOutOfBounds {
                length,
                capacity: self.buf.len(),
            });
        }
        self.length = length;
        Ok(())
    }

    fn data(&self) -> &[u8] {
        &self.buf
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn reallocate(&mut self, capacity: usize) -> InteropResult<()> {
        let current = self.buf.len();
        if capacity <= current {
            return Ok(());
        }
        if capacity > MAX_REGION_CAPACITY {
            return Err(InteropError::CapacityOverflow {
                requested: capacity,
                limit: MAX_REGION_CAPACITY,
            });
        }
        if capacity > self.limit {
            return Err(InteropError::OutOfMemory {
                requested: capacity,
            });
        }
        self.buf
            .try_reserve_exact(capacity - current)
            .map_err(|_| InteropError::OutOfMemory {
                requested: capacity,
            })?;
        self.buf.resize(capacity, 0);
        debug!(from = current, to = capacity, "memory region grown");
        Ok(())
    }
}

impl std::fmt::Debug for HeapMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapMemory")
            .field("capacity", &self.buf.len())
            .field("length", &self.length)
            .field("limit", &self.limit)
            .finish()
    }
}

/// A fixed, caller-provided region that cannot grow.
///
/// Models memory lent by an owner that does not support reallocation: any
/// growth request past the slice fails with [`InteropError::OutOfMemory`].
pub struct SliceMemory<'a> {
    buf: &'a mut [u8],
    length: usize,
}

impl<'a> SliceMemory<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, length: 0 }
    }

    /// The published bytes (`..len()`).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.length]
    }
}

impl InteropMemory for SliceMemory<'_> {
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn len(&self) -> usize {
        self.length
    }

    fn set_len(&mut self, length: usize) -> InteropResult<()> {
        if length > self.buf.len() {
            return Err(InteropError::LengthOutOfBounds {
                length,
                capacity: self.buf.len(),
            });
        }
        self.length = length;
        Ok(())
    }

    fn data(&self) -> &[u8] {
        &*self.buf
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.buf
    }

    fn reallocate(&mut self, capacity: usize) -> InteropResult<()> {
        if capacity <= self.buf.len() {
            return Ok(());
        }
        Err(InteropError::OutOfMemory {
            requested: capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_region_is_empty() {
        let mem = HeapMemory::new();
        assert_eq!(mem.capacity(), 0);
        assert!(mem.is_empty());
        assert!(mem.as_bytes().is_empty());
    }

    #[test]
    fn from_config_allocates_initial_capacity() {
        let mem = HeapMemory::from_config(&MemoryConfig::default()).unwrap();
        assert_eq!(mem.capacity(), 1024);
        assert_eq!(mem.len(), 0);
    }

    #[test]
    fn reallocate_preserves_bytes() {
        let mut mem = HeapMemory::with_capacity(4).unwrap();
        mem.data_mut().copy_from_slice(&[1, 2, 3, 4]);
        mem.reallocate(16).unwrap();
        assert_eq!(mem.capacity(), 16);
        assert_eq!(&mem.data()[..4], &[1, 2, 3, 4]);
        assert!(mem.data()[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn reallocate_never_shrinks() {
        let mut mem = HeapMemory::with_capacity(64).unwrap();
        mem.reallocate(8).unwrap();
        assert_eq!(mem.capacity(), 64);
    }

    #[test]
    fn reallocate_past_limit_fails() {
        let mut mem = HeapMemory::from_config(&MemoryConfig {
            initial_capacity: 8,
            max_capacity: Some(32),
        })
        .unwrap();
        mem.reallocate(32).unwrap();
        let err = mem.reallocate(33).unwrap_err();
        assert_eq!(err, InteropError::OutOfMemory { requested: 33 });
        assert_eq!(mem.capacity(), 32);
    }

    #[test]
    fn reallocate_past_protocol_limit_overflows() {
        let mut mem = HeapMemory::new();
        let err = mem.reallocate(MAX_REGION_CAPACITY + 1).unwrap_err();
        assert!(matches!(err, InteropError::CapacityOverflow { .. }));
    }

    #[test]
    fn set_len_bounds() {
        let mut mem = HeapMemory::with_capacity(8).unwrap();
        mem.set_len(8).unwrap();
        assert_eq!(mem.len(), 8);
        assert_eq!(
            mem.set_len(9).unwrap_err(),
            InteropError::LengthOutOfBounds {
                length: 9,
                capacity: 8
            }
        );
    }

    #[test]
    fn into_bytes_truncates_to_length() {
        let mut mem = HeapMemory::with_capacity(8).unwrap();
        mem.data_mut()[..3].copy_from_slice(b"abc");
        mem.set_len(3).unwrap();
        assert_eq!(mem.into_bytes(), b"abc");
    }

    #[test]
    fn slice_memory_cannot_grow() {
        let mut backing = [0u8; 4];
        let mut mem = SliceMemory::new(&mut backing);
        assert!(mem.reallocate(4).is_ok());
        assert_eq!(
            mem.reallocate(5).unwrap_err(),
            InteropError::OutOfMemory { requested: 5 }
        );
    }
}
