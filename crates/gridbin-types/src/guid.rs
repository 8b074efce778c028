use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A 128-bit UUID as the wire format stores it: two signed 64-bit halves,
/// most-significant first.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Guid {
    most: i64,
    least: i64,
}

impl Guid {
    /// Create from the two 64-bit halves.
    pub const fn new(most: i64, least: i64) -> Self {
        Self { most, least }
    }

    /// A random (v4) guid.
    pub fn random() -> Self {
        Uuid::new_v4().into()
    }

    /// Most-significant 64 bits.
    pub const fn most_significant_bits(&self) -> i64 {
        self.most
    }

    /// Least-significant 64 bits.
    pub const fn least_significant_bits(&self) -> i64 {
        self.least
    }

    pub fn to_uuid(&self) -> Uuid {
        Uuid::from_u64_pair(self.most as u64, self.least as u64)
    }
}

impl From<Uuid> for Guid {
    fn from(uuid: Uuid) -> Self {
        let (hi, lo) = uuid.as_u64_pair();
        Self {
            most: hi as i64,
            least: lo as i64,
        }
    }
}

impl From<Guid> for Uuid {
    fn from(guid: Guid) -> Self {
        guid.to_uuid()
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.to_uuid())
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uuid())
    }
}
