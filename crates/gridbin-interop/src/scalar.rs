//! Fixed-width values with a little-endian wire layout.

/// A value with a fixed little-endian encoding of `WIDTH` bytes.
///
/// Floating-point values are bit-cast to the unsigned integer of the same
/// width and encoded through the integer path, so NaN payloads and signed
/// zeros survive unchanged.
pub trait Scalar: Copy {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Write `WIDTH` bytes into `dst`. `dst.len()` must equal `WIDTH`.
    fn write_le(self, dst: &mut [u8]);

    /// Read a value back from the first `WIDTH` bytes of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than `WIDTH`.
    fn read_le(src: &[u8]) -> Self;
}

macro_rules! impl_int_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn write_le(self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(src: &[u8]) -> Self {
                    let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                    bytes.copy_from_slice(&src[..Self::WIDTH]);
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_int_scalar!(i8, u8, i16, u16, i32, u32, i64, u64);

impl Scalar for f32 {
    const WIDTH: usize = 4;

    #[inline]
    fn write_le(self, dst: &mut [u8]) {
        self.to_bits().write_le(dst);
    }

    #[inline]
    fn read_le(src: &[u8]) -> Self {
        f32::from_bits(u32::read_le(src))
    }
}

impl Scalar for f64 {
    const WIDTH: usize = 8;

    #[inline]
    fn write_le(self, dst: &mut [u8]) {
        self.to_bits().write_le(dst);
    }

    #[inline]
    fn read_le(src: &[u8]) -> Self {
        f64::from_bits(u64::read_le(src))
    }
}

impl Scalar for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn write_le(self, dst: &mut [u8]) {
        u8::from(self).write_le(dst);
    }

    #[inline]
    fn read_le(src: &[u8]) -> Self {
        src[0] != 0
    }
}
