use gridbin_interop::OutputStream;
use gridbin_types::protocol::offsets;
use gridbin_types::{
    data_hash_code, field_id, type_id, Date, Guid, HeaderFlags, Time, Timestamp, TypeCode,
    HEADER_LEN, PROTOCOL_VERSION,
};
use tracing::{debug, trace};

use crate::array::StringArrayWriter;
use crate::error::{BinaryError, BinaryResult};
use crate::metadata::TypeMetadata;
use crate::object::{write_nested, BinaryType, EncodedObject};
use crate::raw::BinaryRawWriter;
use crate::schema::BinarySchema;
use crate::value::{write_code, BinaryValue};

/// Invokes `$m!` with the typed write operations shared by the named and raw
/// writers: method name and argument type.
macro_rules! for_each_typed_write {
    ($m:ident) => {
        $m! {
            write_i8(i8),
            write_bool(bool),
            write_i16(i16),
            write_u16(u16),
            write_i32(i32),
            write_i64(i64),
            write_f32(f32),
            write_f64(f64),
            write_guid(Guid),
            write_date(Date),
            write_timestamp(Timestamp),
            write_time(Time),
            write_i8_array(&[i8]),
            write_bool_array(&[bool]),
            write_i16_array(&[i16]),
            write_u16_array(&[u16]),
            write_i32_array(&[i32]),
            write_i64_array(&[i64]),
            write_f32_array(&[f32]),
            write_f64_array(&[f64]),
            write_guid_array(&[Guid]),
            write_date_array(&[Date]),
            write_timestamp_array(&[Timestamp]),
            write_time_array(&[Time]),
            write_string(Option<&str>),
        }
    };
}
pub(crate) use for_each_typed_write;

macro_rules! named_writes {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            #[doc = concat!("Write a named `", stringify!($ty), "` field.")]
            pub fn $method(&mut self, name: &str, value: $ty) -> BinaryResult<()> {
                self.write(name, &value)
            }
        )*
    };
}

/// Writes one binary object: a 24-byte header, named fields, an optional raw
/// tail, and the schema block that lets readers find fields by id.
///
/// The writer starts in structured mode, where every write takes a field
/// name and records a schema entry. [`raw_writer`](Self::raw_writer) switches
/// to raw mode for the rest of the object. [`finish`](Self::finish) consumes
/// the writer, writes the footer and patches the header.
pub struct BinaryWriter<'s, 'a> {
    out: &'s mut OutputStream<'a>,
    start: usize,
    schema: BinarySchema,
    raw_position: Option<usize>,
    metadata: TypeMetadata,
    nested: Vec<TypeMetadata>,
}

impl<'s, 'a> BinaryWriter<'s, 'a> {
    /// Begin an object of the named type at the stream cursor.
    pub fn new(out: &'s mut OutputStream<'a>, type_name: &str) -> BinaryResult<Self> {
        Self::with_type_id(out, type_id(type_name), type_name)
    }

    /// Begin an object with an explicit type id, for types registered under
    /// an id that is not the hash of their name.
    pub fn with_type_id(
        out: &'s mut OutputStream<'a>,
        type_id: i32,
        type_name: &str,
    ) -> BinaryResult<Self> {
        let start = out.position();
        out.write(TypeCode::Object.code())?;
        out.write(PROTOCOL_VERSION)?;
        out.write(HeaderFlags::USER_TYPE.bits())?;
        out.write(type_id)?;
        // Hash code, length, schema id and offset are patched by `finish`.
        out.reserve(HEADER_LEN - offsets::HASH_CODE)?;

        Ok(Self {
            out,
            start,
            schema: BinarySchema::new(),
            raw_position: None,
            metadata: TypeMetadata::new(type_id, type_name),
            nested: Vec::new(),
        })
    }

    /// Offset of the object header in the stream.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Whether raw mode has been entered.
    pub fn is_raw(&self) -> bool {
        self.raw_position.is_some()
    }

    /// Schema entries recorded so far.
    pub fn schema(&self) -> &BinarySchema {
        &self.schema
    }

    /// Field names and type codes recorded so far.
    pub fn metadata(&self) -> &TypeMetadata {
        &self.metadata
    }

    /// Write a named field of any [`BinaryValue`] type.
    pub fn write<V: BinaryValue + ?Sized>(&mut self, name: &str, value: &V) -> BinaryResult<()> {
        self.begin_field(name, V::TYPE_CODE)?;
        value.write_binary(self.out)?;
        Ok(())
    }

    for_each_typed_write!(named_writes);

    /// Write a field holding only the null code.
    pub fn write_null(&mut self, name: &str) -> BinaryResult<()> {
        self.begin_field(name, TypeCode::Object)?;
        write_code(self.out, TypeCode::Null)?;
        Ok(())
    }

    /// Start a string array field whose length is not known yet.
    ///
    /// The schema entry points at the array's type code; the element count
    /// is patched when the returned writer is closed or dropped.
    pub fn write_string_array(&mut self, name: &str) -> BinaryResult<StringArrayWriter<'_, 'a>> {
        self.begin_field(name, TypeCode::StringArray)?;
        StringArrayWriter::begin(self.out)
    }

    /// Write a nested object field. `None` writes the null code.
    pub fn write_object<T: BinaryType + ?Sized>(
        &mut self,
        name: &str,
        value: Option<&T>,
    ) -> BinaryResult<()> {
        self.begin_field(name, TypeCode::Object)?;
        self.write_object_value(value)
    }

    /// Switch to raw mode and return the raw view.
    ///
    /// The switch is permanent for this object: named writes made after it
    /// fail with [`BinaryError::RawMode`]. Calling it again returns a new
    /// view over the same raw segment.
    pub fn raw_writer(&mut self) -> BinaryRawWriter<'_, 's, 'a> {
        if self.raw_position.is_none() {
            let position = self.out.position();
            trace!(offset = position - self.start, "entering raw mode");
            self.raw_position = Some(position);
        }
        BinaryRawWriter::new(self)
    }

    /// Write the footer and patch the header.
    pub fn finish(self) -> BinaryResult<EncodedObject> {
        let Self {
            out,
            start,
            schema,
            raw_position,
            metadata,
            nested,
        } = self;

        let body_end = out.position();
        let raw_offset = raw_position
            .map(|position| relative(position - start))
            .transpose()?;

        let mut flags = HeaderFlags::USER_TYPE;
        let offset_slot = if schema.is_empty() {
            None
        } else {
            let schema_offset = relative(body_end - start)?;
            flags.insert(HeaderFlags::HAS_SCHEMA);
            flags.insert(schema.offset_width().flag());
            schema.write(out)?;
            if let Some(raw_offset) = raw_offset {
                out.write(raw_offset)?;
            }
            Some(schema_offset)
        };
        if raw_offset.is_some() {
            flags.insert(HeaderFlags::HAS_RAW);
        }

        let length = relative(out.position() - start)?;
        let hash_code = data_hash_code(&out.written()[start + HEADER_LEN..body_end]);
        let schema_id = schema.id();

        out.write_at(start + offsets::FLAGS, flags.bits())?;
        out.write_at(start + offsets::HASH_CODE, hash_code)?;
        out.write_at(start + offsets::LENGTH, length)?;
        out.write_at(start + offsets::SCHEMA_ID, schema_id)?;
        out.write_at(
            start + offsets::SCHEMA_OR_RAW_OFFSET,
            offset_slot.or(raw_offset).unwrap_or(length),
        )?;

        debug!(
            type_name = %metadata.type_name,
            length,
            fields = schema.len(),
            schema_id,
            raw = raw_offset.is_some(),
            "object written"
        );

        let type_id = metadata.type_id;
        let mut types = Vec::with_capacity(nested.len() + 1);
        types.push(metadata);
        types.extend(nested);

        Ok(EncodedObject {
            start,
            length: length as usize,
            type_id,
            hash_code,
            schema_id,
            flags,
            types,
        })
    }

    pub(crate) fn stream(&mut self) -> &mut OutputStream<'a> {
        &mut *self.out
    }

    pub(crate) fn write_object_value<T: BinaryType + ?Sized>(
        &mut self,
        value: Option<&T>,
    ) -> BinaryResult<()> {
        match value {
            None => write_code(self.out, TypeCode::Null)?,
            Some(value) => {
                let nested = write_nested(self.out, value)?;
                self.nested.extend(nested.types);
            }
        }
        Ok(())
    }

    fn begin_field(&mut self, name: &str, type_code: TypeCode) -> BinaryResult<()> {
        if self.raw_position.is_some() {
            return Err(BinaryError::RawMode {
                field: name.to_owned(),
            });
        }

        let id = field_id(name);
        let offset = relative(self.out.position() - self.start)?;
        if !self.schema.add(id, offset as u32) {
            return Err(BinaryError::DuplicateField {
                name: name.to_owned(),
                field_id: id,
            });
        }
        self.metadata.record(name, id, type_code);
        trace!(field = name, field_id = id, offset, %type_code, "field");
        Ok(())
    }
}

impl std::fmt::Debug for BinaryWriter<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryWriter")
            .field("type_name", &self.metadata.type_name)
            .field("start", &self.start)
            .field("fields", &self.schema.len())
            .field("raw_position", &self.raw_position)
            .finish()
    }
}

/// Offset or length relative to the object start, as stored on the wire.
fn relative(len: usize) -> BinaryResult<i32> {
    i32::try_from(len).map_err(|_| BinaryError::ObjectTooLarge { length: len })
}
