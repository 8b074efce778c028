use std::fmt;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const NANOS_PER_MILLI: i32 = 1_000_000;
const NANOS_PER_MILLI_U32: u32 = NANOS_PER_MILLI as u32;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Calendar date: milliseconds since the UNIX epoch (UTC).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Date {
    millis: i64,
}

impl Date {
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Milliseconds since the UNIX epoch.
    pub const fn millis(&self) -> i64 {
        self.millis
    }

    /// `None` when outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.millis)
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_millis(dt.timestamp_millis())
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({}ms)", self.millis)
    }
}

/// Point in time with nanosecond precision.
///
/// On the wire a timestamp is the millisecond part followed by the
/// nanoseconds left over within that millisecond, so only instants whose
/// millisecond count fits in an `i64` are representable.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "TimestampParts")]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

impl Timestamp {
    /// Create from seconds since the epoch and a `0..1e9` nanosecond fraction.
    pub fn new(seconds: i64, nanos: i32) -> Result<Self, TypeError> {
        if !(0..NANOS_PER_SECOND).contains(&i64::from(nanos)) {
            return Err(TypeError::NanosOutOfRange(i64::from(nanos)));
        }
        if i64::try_from(wide_millis(seconds, nanos)).is_err() {
            return Err(TypeError::SecondsOutOfRange(seconds));
        }
        Ok(Self { seconds, nanos })
    }

    /// Create from milliseconds since the epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1000),
            nanos: (millis.rem_euclid(1000) as i32) * NANOS_PER_MILLI,
        }
    }

    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanosecond fraction of the current second.
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Milliseconds since the epoch, truncating sub-millisecond precision.
    pub fn millis(&self) -> i64 {
        // In range: checked by `new`, and `from_millis` round-trips.
        wide_millis(self.seconds, self.nanos) as i64
    }

    /// Nanoseconds within the current millisecond.
    pub fn sub_millis_nanos(&self) -> i32 {
        self.nanos % NANOS_PER_MILLI
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.seconds, self.nanos as u32)
    }
}

fn wide_millis(seconds: i64, nanos: i32) -> i128 {
    i128::from(seconds) * 1000 + i128::from(nanos / NANOS_PER_MILLI)
}

#[derive(Deserialize)]
struct TimestampParts {
    seconds: i64,
    nanos: i32,
}

impl TryFrom<TimestampParts> for Timestamp {
    type Error = TypeError;

    fn try_from(parts: TimestampParts) -> Result<Self, TypeError> {
        Self::new(parts.seconds, parts.nanos)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        // Leap seconds report nanos >= 1e9; clamp into the last nanosecond.
        let nanos = dt.timestamp_subsec_nanos().min(999_999_999);
        Self {
            seconds: dt.timestamp(),
            nanos: nanos as i32,
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}s.{:09})", self.seconds, self.nanos)
    }
}

/// Time of day, in milliseconds.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time {
    millis: i64,
}

impl Time {
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Create from hour, minute and second of the day.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, TypeError> {
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or(TypeError::TimeOfDayOutOfRange { hour, minute, second })?;
        Ok(time.into())
    }

    pub const fn millis(&self) -> i64 {
        self.millis
    }

    /// Time of day, if the value lies within one day.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        if !(0..MILLIS_PER_DAY).contains(&self.millis) {
            return None;
        }
        let secs = (self.millis / 1000) as u32;
        let nanos = (self.millis % 1000) as u32 * NANOS_PER_MILLI_U32;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
    }
}

impl From<NaiveTime> for Time {
    fn from(time: NaiveTime) -> Self {
        let millis = i64::from(time.num_seconds_from_midnight()) * 1000
            + i64::from(time.nanosecond() / NANOS_PER_MILLI_U32);
        Self { millis }
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time({}ms)", self.millis)
    }
}
