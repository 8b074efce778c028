use serde::{Deserialize, Serialize};

use crate::error::{InteropError, InteropResult};
use crate::memory::MAX_REGION_CAPACITY;

/// Sizing of heap-backed memory regions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Capacity allocated up front, in bytes.
    pub initial_capacity: usize,
    /// Ceiling the region may grow to. `None` means the protocol limit.
    pub max_capacity: Option<usize>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_capacity: None,
        }
    }
}

impl MemoryConfig {
    /// Effective growth ceiling.
    pub fn capacity_limit(&self) -> usize {
        self.max_capacity
            .unwrap_or(MAX_REGION_CAPACITY)
            .min(MAX_REGION_CAPACITY)
    }

    /// Check that the initial capacity fits under the ceiling.
    pub fn validate(&self) -> InteropResult<()> {
        if self.initial_capacity > MAX_REGION_CAPACITY {
            return Err(InteropError::CapacityOverflow {
                requested: self.initial_capacity,
                limit: MAX_REGION_CAPACITY,
            });
        }
        if self.initial_capacity > self.capacity_limit() {
            return Err(InteropError::OutOfMemory {
                requested: self.initial_capacity,
            });
        }
        Ok(())
    }
}
