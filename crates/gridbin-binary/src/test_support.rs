//! Minimal object reader used by tests to check wire layouts.

use gridbin_interop::Scalar;
use gridbin_types::protocol::offsets;
use gridbin_types::{field_id, HeaderFlags, OffsetWidth, TypeCode};

pub(crate) struct ObjectView<'b> {
    bytes: &'b [u8],
}

impl<'b> ObjectView<'b> {
    /// View of the object starting at `bytes[0]`.
    pub(crate) fn new(bytes: &'b [u8]) -> Self {
        assert_eq!(bytes[0], TypeCode::Object.code(), "not an object header");
        Self { bytes }
    }

    pub(crate) fn i32_at(&self, offset: usize) -> i32 {
        i32::read_le(&self.bytes[offset..])
    }

    pub(crate) fn flags(&self) -> HeaderFlags {
        HeaderFlags::from_bits(u16::read_le(&self.bytes[offsets::FLAGS..]))
    }

    pub(crate) fn type_id(&self) -> i32 {
        self.i32_at(offsets::TYPE_ID)
    }

    pub(crate) fn hash_code(&self) -> i32 {
        self.i32_at(offsets::HASH_CODE)
    }

    pub(crate) fn length(&self) -> usize {
        self.i32_at(offsets::LENGTH) as usize
    }

    pub(crate) fn schema_id(&self) -> i32 {
        self.i32_at(offsets::SCHEMA_ID)
    }

    fn offset_slot(&self) -> usize {
        self.i32_at(offsets::SCHEMA_OR_RAW_OFFSET) as usize
    }

    pub(crate) fn offset_width(&self) -> OffsetWidth {
        let flags = self.flags();
        if flags.contains(HeaderFlags::OFFSET_ONE_BYTE) {
            OffsetWidth::OneByte
        } else if flags.contains(HeaderFlags::OFFSET_TWO_BYTES) {
            OffsetWidth::TwoBytes
        } else {
            OffsetWidth::FourBytes
        }
    }

    /// Schema entries as `(field_id, offset)`.
    pub(crate) fn schema(&self) -> Vec<(i32, usize)> {
        let flags = self.flags();
        if !flags.contains(HeaderFlags::HAS_SCHEMA) {
            return Vec::new();
        }
        let mut end = self.length();
        if flags.contains(HeaderFlags::HAS_RAW) {
            end -= 4;
        }
        let width = self.offset_width();
        let mut entries = Vec::new();
        let mut pos = self.offset_slot();
        while pos < end {
            let id = self.i32_at(pos);
            let offset = match width {
                OffsetWidth::OneByte => usize::from(self.bytes[pos + 4]),
                OffsetWidth::TwoBytes => usize::from(u16::read_le(&self.bytes[pos + 4..])),
                OffsetWidth::FourBytes => self.i32_at(pos + 4) as usize,
            };
            entries.push((id, offset));
            pos += 4 + width.size();
        }
        entries
    }

    pub(crate) fn raw_offset(&self) -> Option<usize> {
        let flags = self.flags();
        if !flags.contains(HeaderFlags::HAS_RAW) {
            None
        } else if flags.contains(HeaderFlags::HAS_SCHEMA) {
            Some(self.i32_at(self.length() - 4) as usize)
        } else {
            Some(self.offset_slot())
        }
    }

    /// Offset of the named field's type code.
    pub(crate) fn field(&self, name: &str) -> Option<usize> {
        let id = field_id(name);
        self.schema()
            .into_iter()
            .find(|(field, _)| *field == id)
            .map(|(_, offset)| offset)
    }

    pub(crate) fn code_at(&self, offset: usize) -> u8 {
        self.bytes[offset]
    }

    /// Read a string or null value; returns the value and the offset past it.
    pub(crate) fn string_at(&self, offset: usize) -> (Option<String>, usize) {
        match TypeCode::from_code(self.bytes[offset]) {
            Ok(TypeCode::Null) => (None, offset + 1),
            Ok(TypeCode::String) => {
                let len = self.i32_at(offset + 1) as usize;
                let start = offset + 5;
                let text = std::str::from_utf8(&self.bytes[start..start + len])
                    .expect("valid utf-8")
                    .to_owned();
                (Some(text), start + len)
            }
            other => panic!("expected string or null at {offset}, found {other:?}"),
        }
    }

    /// Read a string array (code, count, framed elements).
    pub(crate) fn string_array_at(&self, offset: usize) -> Vec<Option<String>> {
        assert_eq!(self.bytes[offset], TypeCode::StringArray.code());
        let count = self.i32_at(offset + 1) as usize;
        let mut pos = offset + 5;
        (0..count)
            .map(|_| {
                let (value, next) = self.string_at(pos);
                pos = next;
                value
            })
            .collect()
    }

    pub(crate) fn i32_field(&self, name: &str) -> i32 {
        let offset = self.field(name).expect("field present");
        assert_eq!(self.bytes[offset], TypeCode::Int.code());
        self.i32_at(offset + 1)
    }

    /// Nested object starting at `offset`.
    pub(crate) fn object_at(&self, offset: usize) -> ObjectView<'b> {
        ObjectView::new(&self.bytes[offset..])
    }
}
