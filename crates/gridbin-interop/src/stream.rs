use tracing::trace;

use crate::error::{InteropError, InteropResult};
use crate::memory::{InteropMemory, MAX_REGION_CAPACITY};
use crate::scalar::Scalar;

/// Sequential and random-access writer over an [`InteropMemory`] region.
///
/// Append writes go to the cursor and advance it. Patch writes
/// (`write_at`) go to an absolute offset and leave the cursor alone. Both
/// grow the region first when it is too small: capacity doubles, or jumps
/// straight to the requirement when doubling is not enough or is refused.
pub struct OutputStream<'a> {
    memory: &'a mut dyn InteropMemory,
    position: usize,
}

impl<'a> OutputStream<'a> {
    /// Start writing at offset 0 of `memory`.
    pub fn new(memory: &'a mut dyn InteropMemory) -> Self {
        Self {
            memory,
            position: 0,
        }
    }

    /// Append one scalar.
    pub fn write<T: Scalar>(&mut self, value: T) -> InteropResult<()> {
        let end = checked_end(self.position, T::WIDTH)?;
        self.ensure_capacity(end)?;
        value.write_le(&mut self.memory.data_mut()[self.position..end]);
        self.position = end;
        Ok(())
    }

    /// Write one scalar at `offset` without moving the cursor.
    pub fn write_at<T: Scalar>(&mut self, offset: usize, value: T) -> InteropResult<()> {
        let end = checked_end(offset, T::WIDTH)?;
        self.ensure_capacity(end)?;
        value.write_le(&mut self.memory.data_mut()[offset..end]);
        Ok(())
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> InteropResult<()> {
        let end = checked_end(self.position, bytes.len())?;
        self.ensure_capacity(end)?;
        self.memory.data_mut()[self.position..end].copy_from_slice(bytes);
        self.position = end;
        Ok(())
    }

    /// Append every element of `values`, each in its own little-endian layout.
    ///
    /// Capacity is checked once for the whole slice.
    pub fn write_array<T: Scalar>(&mut self, values: &[T]) -> InteropResult<()> {
        let len = values
            .len()
            .checked_mul(T::WIDTH)
            .ok_or(InteropError::CapacityOverflow {
                requested: usize::MAX,
                limit: MAX_REGION_CAPACITY,
            })?;
        let end = checked_end(self.position, len)?;
        self.ensure_capacity(end)?;
        let dst = &mut self.memory.data_mut()[self.position..end];
        for (chunk, value) in dst.chunks_exact_mut(T::WIDTH).zip(values) {
            value.write_le(chunk);
        }
        self.position = end;
        Ok(())
    }

    /// Current cursor.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor, growing the region if it lands past the capacity.
    pub fn set_position(&mut self, position: usize) -> InteropResult<()> {
        self.ensure_capacity(position)?;
        self.position = position;
        Ok(())
    }

    /// Skip `len` bytes and return the offset where they start.
    ///
    /// The skipped bytes are a placeholder for a later `write_at`.
    pub fn reserve(&mut self, len: usize) -> InteropResult<usize> {
        let start = self.position;
        let end = checked_end(start, len)?;
        self.ensure_capacity(end)?;
        self.position = end;
        Ok(start)
    }

    /// Publish the cursor as the region's logical length.
    ///
    /// Call once per encoded unit, after every patch write.
    pub fn synchronize(&mut self) -> InteropResult<()> {
        self.memory.set_len(self.position)?;
        trace!(length = self.position, "stream synchronized");
        Ok(())
    }

    /// Capacity of the underlying region.
    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }

    /// Bytes written so far (`..position()`).
    pub fn written(&self) -> &[u8] {
        &self.memory.data()[..self.position]
    }

    fn ensure_capacity(&mut self, required: usize) -> InteropResult<()> {
        let capacity = self.memory.capacity();
        if required <= capacity {
            return Ok(());
        }
        if required > MAX_REGION_CAPACITY {
            return Err(InteropError::CapacityOverflow {
                requested: required,
                limit: MAX_REGION_CAPACITY,
            });
        }
        let grown = capacity
            .saturating_mul(2)
            .min(MAX_REGION_CAPACITY)
            .max(required);
        if let Err(err) = self.memory.reallocate(grown) {
            if grown == required {
                return Err(err);
            }
            // The region may cap growth below the doubled size; the exact
            // requirement can still fit.
            trace!(grown, required, error = %err, "doubling refused, growing to requirement");
            self.memory.reallocate(required)?;
        }
        if self.memory.capacity() < required {
            return Err(InteropError::OutOfMemory {
                requested: required,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for OutputStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("position", &self.position)
            .field("capacity", &self.memory.capacity())
            .finish()
    }
}

fn checked_end(start: usize, len: usize) -> InteropResult<usize> {
    start
        .checked_add(len)
        .ok_or(InteropError::CapacityOverflow {
            requested: usize::MAX,
            limit: MAX_REGION_CAPACITY,
        })
}
