// Record decoding

use crate::core::constants::*;
use crate::core::error::{Ar4Error, Result};
use crate::core::format::{DecodedRecord, RawRecord};
use crate::core::timestamp::unpack;
use std::time::Instant;
use tracing::{debug, warn};

/// Bits of `byte` in LSB-first order: element `i` is bit `i`.
pub fn bits_le(byte: u8, n: usize) -> Vec<bool> {
    (0..n).map(|i| i < 8 && (byte >> i) & 1 == 1).collect()
}

/// Decodes one record laid out for `channels` readings.
///
/// Only 1-8 channels are representable: error and limit flags are one byte
/// each. Neither the checksum nor the secondary limit byte is interpreted.
pub fn decode(record: &RawRecord, channels: usize) -> Result<DecodedRecord> {
    let bytes = record.as_bytes();
    let corrupt = |reason: String| Ar4Error::CorruptRecord {
        chunk: record.chunk(),
        offset: record.offset(),
        length: bytes.len(),
        reason,
    };

    if channels == 0 || channels > MAX_FLAG_CHANNELS {
        return Err(Ar4Error::InvalidConfig(format!(
            "unsupported channel count {}",
            channels
        )));
    }
    let expected = record_size(channels);
    if bytes.len() < expected {
        return Err(corrupt(format!(
            "expected {} bytes for {} channels",
            expected, channels
        )));
    }

    let errors = bits_le(bytes[RECORD_ERRORS_OFFSET], channels);
    let limits = bits_le(bytes[RECORD_LIMITS_OFFSET], channels);

    let readings = bytes[RECORD_READINGS_OFFSET..RECORD_READINGS_OFFSET + channels * READING_SIZE]
        .chunks_exact(READING_SIZE)
        .zip(&errors)
        .map(|(raw, &failed)| {
            if failed {
                None
            } else {
                Some(f32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
            }
        })
        .collect();

    Ok(DecodedRecord {
        datetime: unpack(record.timestamp_raw()),
        readings,
        errors,
        limits,
        secondary_limit: bytes[RECORD_SECONDARY_LIMIT_OFFSET],
        checksum: bytes[expected - 1],
    })
}

/// Decodes `records` and sorts them chronologically (stable).
///
/// Records too short for the channel layout are skipped with a warning.
pub fn decode_all<'a, I>(records: I, channels: usize) -> Result<Vec<DecodedRecord>>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let started = Instant::now();
    let mut decoded = Vec::new();

    for record in records {
        match decode(record, channels) {
            Ok(d) => decoded.push(d),
            Err(e @ Ar4Error::CorruptRecord { .. }) => warn!("Skipping record: {}", e),
            Err(e) => return Err(e),
        }
    }
    debug!(
        "{} records were decoded in {:.2} ms",
        decoded.len(),
        started.elapsed().as_secs_f64() * 1e3
    );

    let started = Instant::now();
    decoded.sort_by(|a, b| a.datetime.cmp(&b.datetime));
    debug!(
        "{} records were sorted in {:.2} ms",
        decoded.len(),
        started.elapsed().as_secs_f64() * 1e3
    );

    Ok(decoded)
}
