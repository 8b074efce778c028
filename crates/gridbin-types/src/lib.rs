//! Foundation types for the gridbin binary object format.
//!
//! Everything in this crate is a protocol constant or a plain value type:
//! the encoder crates build on it, and any decoder in another language has to
//! agree with it bit for bit.
//!
//! # Key Items
//!
//! - [`TypeCode`]: type code written before every encoded value
//! - [`HeaderFlags`] and [`protocol::offsets`]: the 24-byte object header
//! - [`field_id`], [`type_id`], [`SchemaIdHasher`]: identifier hashing
//! - [`Guid`], [`Date`], [`Timestamp`], [`Time`]: non-primitive scalar values

pub mod error;
pub mod guid;
pub mod hash;
pub mod protocol;
pub mod temporal;

pub use error::TypeError;
pub use guid::Guid;
pub use hash::{data_hash_code, field_id, schema_id, type_id, SchemaIdHasher};
pub use protocol::{HeaderFlags, OffsetWidth, TypeCode, HEADER_LEN, PROTOCOL_VERSION};
pub use temporal::{Date, Time, Timestamp};
