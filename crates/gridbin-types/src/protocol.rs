//! Wire-level constants shared by every implementation of the binary object
//! format. Changing any value here breaks cross-platform decoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Protocol version written into every object header.
pub const PROTOCOL_VERSION: u8 = 1;

/// Size of the fixed object header in bytes.
pub const HEADER_LEN: usize = 24;

/// Byte offsets of the header fields, relative to the object start.
pub mod offsets {
    pub const TYPE_CODE: usize = 0;
    pub const VERSION: usize = 1;
    pub const FLAGS: usize = 2;
    pub const TYPE_ID: usize = 4;
    pub const HASH_CODE: usize = 8;
    pub const LENGTH: usize = 12;
    pub const SCHEMA_ID: usize = 16;
    pub const SCHEMA_OR_RAW_OFFSET: usize = 20;
}

/// Type code prefixed to every encoded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TypeCode {
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    Char = 7,
    Bool = 8,
    String = 9,
    Uuid = 10,
    Date = 11,
    ByteArray = 12,
    ShortArray = 13,
    IntArray = 14,
    LongArray = 15,
    FloatArray = 16,
    DoubleArray = 17,
    CharArray = 18,
    BoolArray = 19,
    StringArray = 20,
    UuidArray = 21,
    DateArray = 22,
    Timestamp = 33,
    TimestampArray = 34,
    Time = 36,
    TimeArray = 37,
    Null = 101,
    Object = 103,
}

impl TypeCode {
    /// The byte written on the wire.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parse a wire byte.
    pub fn from_code(code: u8) -> Result<Self, TypeError> {
        let tc = match code {
            1 => Self::Byte,
            2 => Self::Short,
            3 => Self::Int,
            4 => Self::Long,
            5 => Self::Float,
            6 => Self::Double,
            7 => Self::Char,
            8 => Self::Bool,
            9 => Self::String,
            10 => Self::Uuid,
            11 => Self::Date,
            12 => Self::ByteArray,
            13 => Self::ShortArray,
            14 => Self::IntArray,
            15 => Self::LongArray,
            16 => Self::FloatArray,
            17 => Self::DoubleArray,
            18 => Self::CharArray,
            19 => Self::BoolArray,
            20 => Self::StringArray,
            21 => Self::UuidArray,
            22 => Self::DateArray,
            33 => Self::Timestamp,
            34 => Self::TimestampArray,
            36 => Self::Time,
            37 => Self::TimeArray,
            101 => Self::Null,
            103 => Self::Object,
            other => return Err(TypeError::UnknownTypeCode(other)),
        };
        Ok(tc)
    }

    /// Human-readable name, used in metadata dumps and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::ByteArray => "byte[]",
            Self::ShortArray => "short[]",
            Self::IntArray => "int[]",
            Self::LongArray => "long[]",
            Self::FloatArray => "float[]",
            Self::DoubleArray => "double[]",
            Self::CharArray => "char[]",
            Self::BoolArray => "bool[]",
            Self::StringArray => "string[]",
            Self::UuidArray => "uuid[]",
            Self::DateArray => "date[]",
            Self::Timestamp => "timestamp",
            Self::TimestampArray => "timestamp[]",
            Self::Time => "time",
            Self::TimeArray => "time[]",
            Self::Null => "null",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Object header flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HeaderFlags(u16);

impl HeaderFlags {
    pub const USER_TYPE: Self = Self(0x0001);
    pub const HAS_SCHEMA: Self = Self(0x0002);
    pub const HAS_RAW: Self = Self(0x0004);
    pub const OFFSET_ONE_BYTE: Self = Self(0x0008);
    pub const OFFSET_TWO_BYTES: Self = Self(0x0010);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for HeaderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for HeaderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::USER_TYPE, "USER_TYPE"),
            (Self::HAS_SCHEMA, "HAS_SCHEMA"),
            (Self::HAS_RAW, "HAS_RAW"),
            (Self::OFFSET_ONE_BYTE, "OFFSET_ONE_BYTE"),
            (Self::OFFSET_TWO_BYTES, "OFFSET_TWO_BYTES"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "HeaderFlags({})", set.join(" | "))
    }
}

/// Width used for the offsets in a schema block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OffsetWidth {
    OneByte,
    TwoBytes,
    FourBytes,
}

impl OffsetWidth {
    /// The narrowest width able to hold `max_offset`.
    pub fn for_max_offset(max_offset: u32) -> Self {
        if max_offset < 0x100 {
            Self::OneByte
        } else if max_offset < 0x1_0000 {
            Self::TwoBytes
        } else {
            Self::FourBytes
        }
    }

    /// Bytes per offset.
    pub fn size(self) -> usize {
        match self {
            Self::OneByte => 1,
            Self::TwoBytes => 2,
            Self::FourBytes => 4,
        }
    }

    /// Header flag announcing this width; four-byte offsets carry no flag.
    pub fn flag(self) -> HeaderFlags {
        match self {
            Self::OneByte => HeaderFlags::OFFSET_ONE_BYTE,
            Self::TwoBytes => HeaderFlags::OFFSET_TWO_BYTES,
            Self::FourBytes => HeaderFlags::empty(),
        }
    }
}
