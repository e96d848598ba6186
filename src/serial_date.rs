//! Spreadsheet serial date decoding
//!
//! Spreadsheets store dates as a floating-point count of days since
//! 1899-12-30, with the time of day in the fractional part. Serial `25569`
//! is 1970-01-01.
//!
//! Decoding reads the serial as a UTC wall clock and then labels those same
//! digits with the caller's timezone. No conversion between zones happens:
//! `25569.5` decoded for `+09:00` is `1970-01-01T12:00:00+09:00`, not 21:00.

use crate::error::{Result, SheetError};
use crate::types::CellValue;
use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone, Utc};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch
pub const UNIX_EPOCH_SERIAL: f64 = 25569.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// A serial date as stored in a sheet
///
/// Deserializes from a plain JSON number only, so it can sit inside a larger
/// document (or a struct filled by [`shape_into`](crate::records::shape_into)).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SerialDate(f64);

impl SerialDate {
    /// Wrap a raw serial number
    pub fn new(serial: f64) -> Self {
        SerialDate(serial)
    }

    /// The raw serial number
    pub fn serial(&self) -> f64 {
        self.0
    }

    /// Wall-clock digits of the serial, truncated to whole seconds
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        let secs = (self.0 - UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY;
        if !secs.is_finite() {
            return Err(SheetError::SerialDateOutOfRange(self.0));
        }
        // `as` truncates toward zero and saturates at the i64 bounds
        DateTime::<Utc>::from_timestamp(secs as i64, 0)
            .map(|utc| utc.naive_utc())
            .ok_or(SheetError::SerialDateOutOfRange(self.0))
    }

    /// Decode into `tz`, keeping the wall-clock digits
    ///
    /// The offset is found in two steps: first the offset in force at the
    /// wall-clock digits read as UTC, then the offset in force at the instant
    /// that first guess produces. Near a transition this decides which side
    /// wins:
    ///
    /// - a repeated local time takes whichever offset the second lookup
    ///   lands on (EDT for 01:30 in New York, CET for 02:15 in Berlin);
    /// - a skipped local time is shown with the offset actually in force at
    ///   the resulting instant, so 02:15 in New York reads 01:15 EST while
    ///   02:15 in Berlin reads 03:15 CEST.
    pub fn to_datetime<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Tz>> {
        let naive = self.to_naive()?;
        let out_of_range = || SheetError::SerialDateOutOfRange(self.0);

        let guess = offset_seconds(tz.offset_from_utc_datetime(&naive));
        let utc = naive.checked_sub_signed(guess).ok_or_else(out_of_range)?;
        let offset = offset_seconds(tz.offset_from_utc_datetime(&utc));
        let instant = naive.checked_sub_signed(offset).ok_or_else(out_of_range)?;
        Ok(tz.from_utc_datetime(&instant))
    }
}

fn offset_seconds<O: Offset>(offset: O) -> Duration {
    Duration::seconds(i64::from(offset.fix().local_minus_utc()))
}

impl From<f64> for SerialDate {
    fn from(serial: f64) -> Self {
        SerialDate(serial)
    }
}

impl TryFrom<&CellValue> for SerialDate {
    type Error = SheetError;

    fn try_from(cell: &CellValue) -> Result<Self> {
        match cell {
            CellValue::Int(i) => Ok(SerialDate(*i as f64)),
            CellValue::Float(f) => Ok(SerialDate(*f)),
            other => Err(SheetError::DocumentDecode(format!(
                "expected a number, found {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for SerialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SerialDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

struct SerialDateVisitor;

impl<'de> Visitor<'de> for SerialDateVisitor {
    type Value = SerialDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a serial date number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<SerialDate, E> {
        Ok(SerialDate(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<SerialDate, E> {
        Ok(SerialDate(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<SerialDate, E> {
        Ok(SerialDate(v))
    }
}

impl<'de> Deserialize<'de> for SerialDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_f64(SerialDateVisitor)
    }
}

/// Decode a raw serial into `tz` (see [`SerialDate::to_datetime`])
pub fn decode_serial_date<Tz: TimeZone>(serial: f64, tz: &Tz) -> Result<DateTime<Tz>> {
    SerialDate(serial).to_datetime(tz)
}

/// Read a serial date out of a document field
///
/// # Errors
///
/// [`SheetError::DocumentDecode`] unless the value is a JSON number.
pub fn decode_serial_date_from_document(value: &serde_json::Value) -> Result<SerialDate> {
    SerialDate::deserialize(value).map_err(|e| SheetError::DocumentDecode(e.to_string()))
}
