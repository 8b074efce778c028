use crate::array::StringArrayWriter;
use crate::error::BinaryResult;
use crate::object::BinaryType;
use crate::value::{write_code, BinaryValue};
use crate::writer::{for_each_typed_write, BinaryWriter};

use gridbin_types::{Date, Guid, Time, Timestamp, TypeCode};

macro_rules! raw_writes {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            #[doc = concat!("Append a `", stringify!($ty), "` value.")]
            pub fn $method(&mut self, value: $ty) -> BinaryResult<()> {
                self.write(&value)
            }
        )*
    };
}

/// Positional view of an object's raw segment.
///
/// Values use the same type code + payload encoding as named fields but get
/// no schema entry; readers walk them in order from the raw offset stored in
/// the footer.
pub struct BinaryRawWriter<'w, 's, 'a> {
    writer: &'w mut BinaryWriter<'s, 'a>,
}

impl<'w, 's, 'a> BinaryRawWriter<'w, 's, 'a> {
    pub(crate) fn new(writer: &'w mut BinaryWriter<'s, 'a>) -> Self {
        Self { writer }
    }

    /// Append any [`BinaryValue`].
    pub fn write<V: BinaryValue + ?Sized>(&mut self, value: &V) -> BinaryResult<()> {
        value.write_binary(self.writer.stream())?;
        Ok(())
    }

    for_each_typed_write!(raw_writes);

    /// Append the null code.
    pub fn write_null(&mut self) -> BinaryResult<()> {
        write_code(self.writer.stream(), TypeCode::Null)?;
        Ok(())
    }

    /// Start a string array whose count is patched when the returned writer
    /// is closed or dropped.
    pub fn write_string_array(&mut self) -> BinaryResult<StringArrayWriter<'_, 'a>> {
        StringArrayWriter::begin(self.writer.stream())
    }

    /// Append a nested object, or the null code for `None`.
    pub fn write_object<T: BinaryType + ?Sized>(&mut self, value: Option<&T>) -> BinaryResult<()> {
        self.writer.write_object_value(value)
    }
}
