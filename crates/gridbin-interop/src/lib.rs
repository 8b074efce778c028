//! Memory regions and the output stream for the gridbin encoder.
//!
//! An encode writes into an [`InteropMemory`] region through an
//! [`OutputStream`]. The region may live on this process's heap
//! ([`HeapMemory`]) or be lent by another runtime; the stream only needs the
//! capacity/grow/view/publish contract of the trait.
//!
//! All scalars are little-endian. [`Scalar`] is the single encoding path for
//! every fixed-width type.

pub mod config;
pub mod error;
pub mod memory;
pub mod scalar;
pub mod stream;

pub use config::MemoryConfig;
pub use error::{InteropError, InteropResult};
pub use memory::{HeapMemory, InteropMemory, SliceMemory, MAX_REGION_CAPACITY};
pub use scalar::Scalar;
pub use stream::OutputStream;
