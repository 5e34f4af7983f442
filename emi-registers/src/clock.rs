//! Device clock record.
//!
//! The clock object is a packed 12-byte block:
//!
//! | offset | size | field                 |
//! |--------|------|-----------------------|
//! | 0      | 2    | year (big-endian)     |
//! | 2      | 1    | month                 |
//! | 3      | 1    | day of month          |
//! | 4      | 1    | day of week           |
//! | 5      | 1    | hour                  |
//! | 6      | 1    | minute                |
//! | 7      | 1    | second                |
//! | 8      | 1    | hundredths of second  |
//! | 9      | 2    | deviation (big-endian)|
//! | 11     | 1    | clock status flags    |

use chrono::{NaiveDate, NaiveDateTime};

use crate::codec::{ByteCursor, BytesCountError, Encode, Word};

/// Bits of the clock status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    InvalidValue = 0x01,
    DoubtfulValue = 0x02,
    DifferentClockBase = 0x04,
    InvalidClockStatus = 0x08,
    DaylightSavingActive = 0x80,
}

impl ClockStatus {
    pub const ALL: [ClockStatus; 5] = [
        ClockStatus::InvalidValue,
        ClockStatus::DoubtfulValue,
        ClockStatus::DifferentClockBase,
        ClockStatus::InvalidClockStatus,
        ClockStatus::DaylightSavingActive,
    ];

    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Collect the flags set in a status byte. Unknown bits are ignored.
    pub fn from_byte(byte: u8) -> Vec<ClockStatus> {
        Self::ALL
            .into_iter()
            .filter(|status| byte & status.bit() != 0)
            .collect()
    }
}

/// Calendar and clock fields exactly as the device reports them.
///
/// Values are not range checked: a month of 13 on the wire is a month of 13 here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockRecord {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
    /// Deviation of local time from UTC, in minutes.
    pub deviation: i16,
    pub clock_status: u8,
}

impl ClockRecord {
    pub const WIRE_SIZE: usize = 12;

    /// Decode the record from the first [`Self::WIRE_SIZE`] bytes of `bytes`.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, BytesCountError> {
        if bytes.len() < Self::WIRE_SIZE {
            return Err(BytesCountError {
                expected: Self::WIRE_SIZE,
                actual: bytes.len(),
            });
        }

        let mut cursor = ByteCursor::new(bytes);
        Ok(Self {
            year: cursor.read::<u16>()?,
            month: cursor.read_u8()?,
            day: cursor.read_u8()?,
            weekday: cursor.read_u8()?,
            hour: cursor.read_u8()?,
            minute: cursor.read_u8()?,
            second: cursor.read_u8()?,
            hundredths: cursor.read_u8()?,
            deviation: cursor.read::<u16>()? as i16,
            clock_status: cursor.read_u8()?,
        })
    }

    pub fn to_wire(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::WIRE_SIZE);
        bytes.extend_from_slice(&self.year.to_be_bytes());
        bytes.extend_from_slice(&[
            self.month,
            self.day,
            self.weekday,
            self.hour,
            self.minute,
            self.second,
            self.hundredths,
        ]);
        bytes.extend_from_slice(&self.deviation.to_be_bytes());
        bytes.push(self.clock_status);
        bytes
    }

    pub fn has_status(&self, status: ClockStatus) -> bool {
        self.clock_status & status.bit() != 0
    }

    pub fn statuses(&self) -> Vec<ClockStatus> {
        ClockStatus::from_byte(self.clock_status)
    }

    /// Calendar value of the record, ignoring deviation and weekday.
    ///
    /// `None` when a field is out of range for a calendar date or time.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?
            .and_hms_milli_opt(
                self.hour.into(),
                self.minute.into(),
                self.second.into(),
                u32::from(self.hundredths) * 10,
            )
    }
}

impl Encode for ClockRecord {
    fn to_be_words(self) -> Vec<Word> {
        crate::codec::bytes_to_words(&self.to_wire())
    }
}
