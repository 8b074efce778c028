use std::collections::HashSet;

use gridbin_interop::{InteropResult, OutputStream};
use gridbin_types::{OffsetWidth, SchemaIdHasher};

/// One entry of an object's schema block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaField {
    /// Hash of the field name.
    pub field_id: i32,
    /// Offset of the field's type code, relative to the object start.
    pub offset: u32,
}

/// Field ids and offsets of one object, in write order.
///
/// The schema id is folded incrementally as fields are added, so it always
/// matches the order in which the block will be written.
#[derive(Clone, Debug, Default)]
pub struct BinarySchema {
    fields: Vec<SchemaField>,
    ids: HashSet<i32>,
    hasher: SchemaIdHasher,
}

impl BinarySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Returns `false`, leaving the schema untouched, if the
    /// field id is already present.
    pub fn add(&mut self, field_id: i32, offset: u32) -> bool {
        if !self.ids.insert(field_id) {
            return false;
        }
        self.hasher.update(field_id);
        self.fields.push(SchemaField { field_id, offset });
        true
    }

    pub fn contains(&self, field_id: i32) -> bool {
        self.ids.contains(&field_id)
    }

    /// Schema id (FNV-1 over the field ids); `0` for an empty schema.
    pub fn id(&self) -> i32 {
        self.hasher.finish()
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Narrowest offset width that can hold every recorded offset.
    pub fn offset_width(&self) -> OffsetWidth {
        let max = self.fields.iter().map(|f| f.offset).max().unwrap_or(0);
        OffsetWidth::for_max_offset(max)
    }

    /// Size of the encoded block in bytes.
    pub fn encoded_len(&self) -> usize {
        self.fields.len() * (4 + self.offset_width().size())
    }

    /// Write the block: `i32` field id followed by the offset, per field.
    pub fn write(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        let width = self.offset_width();
        for field in &self.fields {
            out.write(field.field_id)?;
            match width {
                OffsetWidth::OneByte => out.write(field.offset as u8)?,
                OffsetWidth::TwoBytes => out.write(field.offset as u16)?,
                OffsetWidth::FourBytes => out.write(field.offset as i32)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbin_interop::{HeapMemory, Scalar};
    use gridbin_types::schema_id;

    fn written(schema: &BinarySchema) -> Vec<u8> {
        let mut mem = HeapMemory::new();
        let mut out = OutputStream::new(&mut mem);
        schema.write(&mut out).unwrap();
        out.written().to_vec()
    }

    #[test]
    fn empty_schema() {
        let schema = BinarySchema::new();
        assert!(schema.is_empty());
        assert_eq!(schema.id(), 0);
        assert!(written(&schema).is_empty());
    }

    #[test]
    fn id_matches_batch_hash() {
        let mut schema = BinarySchema::new();
        schema.add(97, 24);
        schema.add(98, 29);
        schema.add(99, 36);
        assert_eq!(schema.id(), schema_id([97, 98, 99]));
    }

    #[test]
    fn duplicate_is_rejected() {
        let mut schema = BinarySchema::new();
        assert!(schema.add(5, 24));
        let id = schema.id();
        assert!(!schema.add(5, 40));
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.id(), id);
        assert!(schema.contains(5));
    }

    #[test]
    fn one_byte_offsets() {
        let mut schema = BinarySchema::new();
        schema.add(97, 24);
        schema.add(98, 255);
        assert_eq!(schema.offset_width(), OffsetWidth::OneByte);
        let bytes = written(&schema);
        assert_eq!(bytes.len(), schema.encoded_len());
        assert_eq!(bytes, vec![97, 0, 0, 0, 24, 98, 0, 0, 0, 255]);
    }

    #[test]
    fn two_byte_offsets() {
        let mut schema = BinarySchema::new();
        schema.add(1, 24);
        schema.add(2, 300);
        assert_eq!(schema.offset_width(), OffsetWidth::TwoBytes);
        let bytes = written(&schema);
        assert_eq!(bytes.len(), 12);
        assert_eq!(u16::read_le(&bytes[4..]), 24);
        assert_eq!(u16::read_le(&bytes[10..]), 300);
    }

    #[test]
    fn four_byte_offsets() {
        let mut schema = BinarySchema::new();
        schema.add(-7, 70_000);
        assert_eq!(schema.offset_width(), OffsetWidth::FourBytes);
        let bytes = written(&schema);
        assert_eq!(i32::read_le(&bytes[0..]), -7);
        assert_eq!(i32::read_le(&bytes[4..]), 70_000);
    }
}
