// Splitting data chunks into variable-length records

use crate::core::constants::{MIN_RECORD_SIZE, RECORD_LENGTH_OFFSET};
use crate::core::error::Ar4Error;
use crate::core::format::RawRecord;

/// Records carved from one chunk, plus the corruption that stopped the scan
/// early, if any.
#[derive(Debug)]
pub struct Split {
    pub records: Vec<RawRecord>,
    pub corruption: Option<Ar4Error>,
}

/// Walks `run` by embedded length bytes, skipping single sentinel bytes.
///
/// On a bad length the remainder of the run is abandoned; records found
/// before it are kept. `chunk` labels the records and the error.
pub fn extract_records(run: &[u8], sentinel: u8, chunk: usize) -> Split {
    let mut records = Vec::new();
    let mut i = 0;

    while i < run.len() {
        if run[i] == sentinel {
            i += 1;
            continue;
        }

        let corrupt = |length: usize, reason: &str| Ar4Error::CorruptRecord {
            chunk,
            offset: i,
            length,
            reason: reason.to_string(),
        };

        let Some(&length) = run.get(i + RECORD_LENGTH_OFFSET) else {
            return Split {
                records,
                corruption: Some(corrupt(0, "length byte missing at end of chunk")),
            };
        };
        let length = usize::from(length);

        if length < MIN_RECORD_SIZE {
            return Split {
                records,
                corruption: Some(corrupt(length, "length shorter than record header")),
            };
        }
        if i + length > run.len() {
            return Split {
                records,
                corruption: Some(corrupt(length, "record runs past end of chunk")),
            };
        }

        records.push(RawRecord::new(run[i..i + length].to_vec(), chunk, i));
        i += length;
    }

    Split {
        records,
        corruption: None,
    }
}
