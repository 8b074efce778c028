//! Wire encoding of individual values: a type code followed by the payload.

use gridbin_interop::{InteropError, InteropResult, OutputStream, Scalar, MAX_REGION_CAPACITY};
use gridbin_types::{Date, Guid, Time, Timestamp, TypeCode};

/// A value that knows its own type code and payload layout.
///
/// `write_binary` emits the type code and then the payload, so the same
/// encoding serves named fields, raw writes, and array elements.
pub trait BinaryValue {
    /// Type code recorded in type metadata for fields holding this value.
    const TYPE_CODE: TypeCode;

    /// Write the type code and payload at the stream cursor.
    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()>;
}

/// Count or byte-length prefix, which the protocol stores as `i32`.
pub(crate) fn length_prefix(len: usize) -> InteropResult<i32> {
    i32::try_from(len).map_err(|_| InteropError::CapacityOverflow {
        requested: len,
        limit: MAX_REGION_CAPACITY,
    })
}

pub(crate) fn write_code(out: &mut OutputStream<'_>, code: TypeCode) -> InteropResult<()> {
    out.write(code.code())
}

/// Type code, `i32` byte length, UTF-8 bytes.
pub(crate) fn write_str(out: &mut OutputStream<'_>, value: &str) -> InteropResult<()> {
    write_code(out, TypeCode::String)?;
    out.write(length_prefix(value.len())?)?;
    out.write_bytes(value.as_bytes())
}

fn write_scalar_array<T: Scalar>(
    out: &mut OutputStream<'_>,
    code: TypeCode,
    values: &[T],
) -> InteropResult<()> {
    write_code(out, code)?;
    out.write(length_prefix(values.len())?)?;
    out.write_array(values)
}

/// Arrays whose elements each carry their own type code.
fn write_framed_array<V: BinaryValue>(
    out: &mut OutputStream<'_>,
    code: TypeCode,
    values: &[V],
) -> InteropResult<()> {
    write_code(out, code)?;
    out.write(length_prefix(values.len())?)?;
    values.iter().try_for_each(|v| v.write_binary(out))
}

macro_rules! scalar_value {
    ($ty:ty, $code:ident, $array_code:ident) => {
        impl BinaryValue for $ty {
            const TYPE_CODE: TypeCode = TypeCode::$code;

            fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
                write_code(out, Self::TYPE_CODE)?;
                out.write(*self)
            }
        }

        impl BinaryValue for [$ty] {
            const TYPE_CODE: TypeCode = TypeCode::$array_code;

            fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
                write_scalar_array(out, Self::TYPE_CODE, self)
            }
        }
    };
}

scalar_value!(i8, Byte, ByteArray);
scalar_value!(u8, Byte, ByteArray);
scalar_value!(i16, Short, ShortArray);
scalar_value!(u16, Char, CharArray);
scalar_value!(i32, Int, IntArray);
scalar_value!(i64, Long, LongArray);
scalar_value!(f32, Float, FloatArray);
scalar_value!(f64, Double, DoubleArray);
scalar_value!(bool, Bool, BoolArray);

impl BinaryValue for Guid {
    const TYPE_CODE: TypeCode = TypeCode::Uuid;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        write_code(out, Self::TYPE_CODE)?;
        out.write(self.most_significant_bits())?;
        out.write(self.least_significant_bits())
    }
}

impl BinaryValue for Date {
    const TYPE_CODE: TypeCode = TypeCode::Date;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        write_code(out, Self::TYPE_CODE)?;
        out.write(self.millis())
    }
}

impl BinaryValue for Timestamp {
    const TYPE_CODE: TypeCode = TypeCode::Timestamp;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        write_code(out, Self::TYPE_CODE)?;
        out.write(self.millis())?;
        out.write(self.sub_millis_nanos())
    }
}

impl BinaryValue for Time {
    const TYPE_CODE: TypeCode = TypeCode::Time;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        write_code(out, Self::TYPE_CODE)?;
        out.write(self.millis())
    }
}

macro_rules! framed_array_value {
    ($ty:ty, $array_code:ident) => {
        impl BinaryValue for [$ty] {
            const TYPE_CODE: TypeCode = TypeCode::$array_code;

            fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
                write_framed_array(out, Self::TYPE_CODE, self)
            }
        }
    };
}

framed_array_value!(Guid, UuidArray);
framed_array_value!(Date, DateArray);
framed_array_value!(Timestamp, TimestampArray);
framed_array_value!(Time, TimeArray);
framed_array_value!(String, StringArray);
framed_array_value!(&str, StringArray);

impl BinaryValue for str {
    const TYPE_CODE: TypeCode = TypeCode::String;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        write_str(out, self)
    }
}

impl BinaryValue for String {
    const TYPE_CODE: TypeCode = TypeCode::String;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        write_str(out, self)
    }
}

impl<V: BinaryValue + ?Sized> BinaryValue for &V {
    const TYPE_CODE: TypeCode = V::TYPE_CODE;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        (**self).write_binary(out)
    }
}

impl<V> BinaryValue for Vec<V>
where
    [V]: BinaryValue,
{
    const TYPE_CODE: TypeCode = <[V] as BinaryValue>::TYPE_CODE;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        self.as_slice().write_binary(out)
    }
}

/// `None` encodes as the null type code with no payload.
impl<V: BinaryValue> BinaryValue for Option<V> {
    const TYPE_CODE: TypeCode = V::TYPE_CODE;

    fn write_binary(&self, out: &mut OutputStream<'_>) -> InteropResult<()> {
        match self {
            Some(value) => value.write_binary(out),
            None => write_code(out, TypeCode::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbin_interop::HeapMemory;

    fn encode<V: BinaryValue + ?Sized>(value: &V) -> Vec<u8> {
        let mut mem = HeapMemory::new();
        let mut out = OutputStream::new(&mut mem);
        value.write_binary(&mut out).unwrap();
        out.written().to_vec()
    }

    #[test]
    fn int_is_code_then_le_payload() {
        assert_eq!(encode(&42i32), vec![3, 42, 0, 0, 0]);
    }

    #[test]
    fn char_uses_char_code() {
        assert_eq!(encode(&0x41u16), vec![7, 0x41, 0]);
    }

    #[test]
    fn bool_and_byte() {
        assert_eq!(encode(&true), vec![8, 1]);
        assert_eq!(encode(&-1i8), vec![1, 0xFF]);
    }

    #[test]
    fn string_is_length_prefixed_utf8() {
        assert_eq!(encode("hi"), vec![9, 2, 0, 0, 0, b'h', b'i']);
        let bytes = encode("é");
        assert_eq!(&bytes[1..5], &2i32.to_le_bytes());
    }

    #[test]
    fn none_is_null_code() {
        assert_eq!(encode(&None::<&str>), vec![101]);
        assert_eq!(encode(&Some(5i64))[0], 4);
    }

    #[test]
    fn int_array_layout() {
        let bytes = encode(&[1i32, -1][..]);
        assert_eq!(bytes, vec![14, 2, 0, 0, 0, 1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn double_array_keeps_bits() {
        let values = vec![f64::NAN, -0.0, f64::INFINITY];
        let bytes = encode(&values);
        assert_eq!(bytes[0], TypeCode::DoubleArray.code());
        for (i, v) in values.iter().enumerate() {
            let at = 5 + i * 8;
            assert_eq!(f64::read_le(&bytes[at..]).to_bits(), v.to_bits());
        }
    }

    #[test]
    fn guid_is_two_longs() {
        let bytes = encode(&Guid::new(1, -2));
        assert_eq!(bytes[0], 10);
        assert_eq!(i64::read_le(&bytes[1..]), 1);
        assert_eq!(i64::read_le(&bytes[9..]), -2);
        assert_eq!(bytes.len(), 17);
    }

    #[test]
    fn timestamp_is_millis_then_nanos() {
        let ts = Timestamp::new(2, 3_000_004).unwrap();
        let bytes = encode(&ts);
        assert_eq!(bytes[0], 33);
        assert_eq!(i64::read_le(&bytes[1..]), 2_003);
        assert_eq!(i32::read_le(&bytes[9..]), 4);
    }

    #[test]
    fn timestamp_extremes_encode() {
        let max = Timestamp::from_millis(i64::MAX);
        let bytes = encode(&max);
        assert_eq!(i64::read_le(&bytes[1..]), i64::MAX);
        assert_eq!(i32::read_le(&bytes[9..]), 0);

        let min = Timestamp::new(-9_223_372_036_854_776, 192_000_001).unwrap();
        let bytes = encode(&min);
        assert_eq!(i64::read_le(&bytes[1..]), i64::MIN);
        assert_eq!(i32::read_le(&bytes[9..]), 1);
    }

    #[test]
    fn date_and_time_are_millis() {
        assert_eq!(encode(&Date::from_millis(-5))[1..], (-5i64).to_le_bytes());
        assert_eq!(encode(&Time::from_millis(7))[0], 36);
    }

    #[test]
    fn framed_arrays_tag_each_element() {
        let bytes = encode(&[Date::from_millis(1), Date::from_millis(2)][..]);
        assert_eq!(bytes[0], TypeCode::DateArray.code());
        assert_eq!(i32::read_le(&bytes[1..]), 2);
        assert_eq!(bytes[5], TypeCode::Date.code());
        assert_eq!(bytes[14], TypeCode::Date.code());
        assert_eq!(bytes.len(), 5 + 2 * 9);
    }

    #[test]
    fn string_slice_array() {
        let bytes = encode(&["x", "yz"][..]);
        assert_eq!(
            bytes,
            vec![20, 2, 0, 0, 0, 9, 1, 0, 0, 0, b'x', 9, 2, 0, 0, 0, b'y', b'z']
        );
    }

    #[test]
    fn type_codes_follow_through_wrappers() {
        assert_eq!(<Vec<i64> as BinaryValue>::TYPE_CODE, TypeCode::LongArray);
        assert_eq!(<Option<&str> as BinaryValue>::TYPE_CODE, TypeCode::String);
        assert_eq!(<&[Guid] as BinaryValue>::TYPE_CODE, TypeCode::UuidArray);
    }
}
