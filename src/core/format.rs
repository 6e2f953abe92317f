// Data structures for AR4 format

use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar fields as the unit stores them, year first.
///
/// Field order makes the derived `Ord` compare chronologically. Values are not
/// guaranteed to form a real calendar date: garbled archives can produce
/// month 13 or day 32, see [`UnitDatetime::to_naive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitDatetime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl UnitDatetime {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn date(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }
}

impl fmt::Display for UnitDatetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}.{:02}.{} {:02}:{:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute, self.second
        )
    }
}

/// One undecoded record as carved out of a data chunk, with the chunk index
/// and byte offset it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    bytes: Vec<u8>,
    chunk: usize,
    offset: usize,
}

impl RawRecord {
    /// Callers guarantee at least [`MIN_RECORD_SIZE`] bytes; the splitter
    /// never emits shorter slices.
    pub fn new(bytes: Vec<u8>, chunk: usize, offset: usize) -> Self {
        debug_assert!(bytes.len() >= MIN_RECORD_SIZE);
        Self {
            bytes,
            chunk,
            offset,
        }
    }

    pub fn chunk(&self) -> usize {
        self.chunk
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn timestamp_bytes(&self) -> [u8; 4] {
        let o = RECORD_TIMESTAMP_OFFSET;
        [self.bytes[o], self.bytes[o + 1], self.bytes[o + 2], self.bytes[o + 3]]
    }

    pub fn timestamp_raw(&self) -> u32 {
        u32::from_le_bytes(self.timestamp_bytes())
    }

    /// Timestamp bytes reordered to big-endian, so that comparing keys
    /// byte-wise orders records chronologically.
    pub fn timestamp_key(&self) -> [u8; 4] {
        let [a, b, c, d] = self.timestamp_bytes();
        [d, c, b, a]
    }

    /// Packed date (bytes 4-5) without the lowest flag bit.
    pub fn date_key(&self) -> u16 {
        let o = RECORD_DATE_OFFSET;
        u16::from_le_bytes([self.bytes[o], self.bytes[o + 1]]) >> 1
    }

    /// False for prefix records written before logging started.
    pub fn has_timestamp(&self, sentinel: u8) -> bool {
        self.timestamp_bytes() != [sentinel; 4]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub creation_timestamp_raw: u32,
    pub unit_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub unit_number: u32,
    pub creation_datetime: UnitDatetime,
    pub min_datetime: Option<UnitDatetime>,
    pub max_datetime: Option<UnitDatetime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRecord {
    pub datetime: UnitDatetime,
    pub readings: Vec<Option<f32>>,
    pub errors: Vec<bool>,
    pub limits: Vec<bool>,
    pub secondary_limit: u8,
    pub checksum: u8,
}

impl DecodedRecord {
    pub fn channels(&self) -> usize {
        self.readings.len()
    }
}
