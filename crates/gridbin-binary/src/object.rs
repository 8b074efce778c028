use gridbin_interop::{HeapMemory, MemoryConfig, OutputStream};
use gridbin_types::HeaderFlags;

use crate::error::BinaryResult;
use crate::metadata::TypeMetadata;
use crate::writer::BinaryWriter;

/// A user type that can write itself as a binary object.
///
/// Implementations write their fields through the [`BinaryWriter`] they are
/// handed; the header and footer are the caller's business.
pub trait BinaryType {
    fn type_name(&self) -> &str;

    /// Type id written to the header. Defaults to the hash of the type name.
    fn type_id(&self) -> i32 {
        gridbin_types::type_id(self.type_name())
    }

    fn write_binary(&self, writer: &mut BinaryWriter<'_, '_>) -> BinaryResult<()>;
}

/// Summary of one finished object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedObject {
    /// Offset of the header in the stream.
    pub start: usize,
    /// Total length, header through footer.
    pub length: usize,
    pub type_id: i32,
    pub hash_code: i32,
    /// `0` when the object has no named fields.
    pub schema_id: i32,
    pub flags: HeaderFlags,
    /// Metadata of this object's type first, then of every nested object.
    pub types: Vec<TypeMetadata>,
}

impl EncodedObject {
    /// Offset just past the object.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn has_schema(&self) -> bool {
        self.flags.contains(HeaderFlags::HAS_SCHEMA)
    }

    pub fn has_raw(&self) -> bool {
        self.flags.contains(HeaderFlags::HAS_RAW)
    }
}

/// Write one object at the cursor without publishing the stream length.
pub(crate) fn write_nested<T: BinaryType + ?Sized>(
    out: &mut OutputStream<'_>,
    value: &T,
) -> BinaryResult<EncodedObject> {
    let mut writer = BinaryWriter::with_type_id(out, value.type_id(), value.type_name())?;
    value.write_binary(&mut writer)?;
    writer.finish()
}

/// Write one top-level object at the cursor and publish the stream length.
pub fn encode<T: BinaryType + ?Sized>(
    out: &mut OutputStream<'_>,
    value: &T,
) -> BinaryResult<EncodedObject> {
    let encoded = write_nested(out, value)?;
    out.synchronize()?;
    Ok(encoded)
}

/// Encode `value` into a fresh [`HeapMemory`] sized by `config` and return
/// the published bytes.
pub fn encode_to_vec<T: BinaryType + ?Sized>(
    value: &T,
    config: &MemoryConfig,
) -> BinaryResult<Vec<u8>> {
    let mut memory = HeapMemory::from_config(config)?;
    let mut out = OutputStream::new(&mut memory);
    encode(&mut out, value)?;
    Ok(memory.into_bytes())
}
