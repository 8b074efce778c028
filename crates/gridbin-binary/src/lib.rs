//! Field-oriented binary object writer.
//!
//! Encodes user types into the grid's platform-neutral binary object format:
//! a 24-byte header, named fields each carrying a type code, an optional raw
//! tail addressed only by position, and a schema block mapping field ids to
//! offsets so readers can locate fields without knowing the write order.
//!
//! # Architecture
//!
//! - **BinaryWriter**: named, schema-tracked writes for one object
//! - **BinaryRawWriter**: positional writes after the one-way switch to raw mode
//! - **StringArrayWriter**: streams array elements, patching the count on close
//! - **BinaryType**: implemented by user types; `encode` drives it
//! - **TypeMetadata**: field names and type codes observed while writing

pub mod array;
pub mod error;
pub mod metadata;
pub mod object;
pub mod raw;
pub mod schema;
pub mod value;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use array::StringArrayWriter;
pub use error::{BinaryError, BinaryResult};
pub use metadata::{FieldMetadata, MetadataRegistry, TypeMetadata};
pub use object::{encode, encode_to_vec, BinaryType, EncodedObject};
pub use raw::BinaryRawWriter;
pub use schema::{BinarySchema, SchemaField};
pub use value::BinaryValue;
pub use writer::BinaryWriter;
