use thiserror::Error;

/// Errors produced when constructing protocol value types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("nanosecond component out of range: {0} (expected 0..1_000_000_000)")]
    NanosOutOfRange(i64),

    #[error("seconds out of range: {0} (milliseconds must fit in an i64)")]
    SecondsOutOfRange(i64),

    #[error("time of day out of range: {hour:02}:{minute:02}:{second:02}")]
    TimeOfDayOutOfRange { hour: u32, minute: u32, second: u32 },

    #[error("unknown type code: {0}")]
    UnknownTypeCode(u8),
}
