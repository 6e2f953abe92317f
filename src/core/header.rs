// Header chunk decoding

use crate::core::constants::{HEADER_MIN_SIZE, HEADER_TIMESTAMP_OFFSET, HEADER_UNIT_OFFSET};
use crate::core::error::{Ar4Error, Result};
use crate::core::format::ArchiveHeader;

fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

pub fn decode_header(chunk: &[u8]) -> Result<ArchiveHeader> {
    if chunk.len() < HEADER_MIN_SIZE {
        return Err(Ar4Error::MalformedHeader {
            expected: HEADER_MIN_SIZE,
            got: chunk.len(),
        });
    }

    Ok(ArchiveHeader {
        creation_timestamp_raw: read_u32_le(chunk, HEADER_TIMESTAMP_OFFSET),
        unit_number: read_u32_le(chunk, HEADER_UNIT_OFFSET),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_header() {
        let mut chunk = vec![0u8; 256];
        chunk[22..26].copy_from_slice(&0x5C8A_E1F0u32.to_le_bytes());
        chunk[26..30].copy_from_slice(&100_514u32.to_le_bytes());

        let header = decode_header(&chunk).unwrap();
        assert_eq!(header.creation_timestamp_raw, 0x5C8A_E1F0);
        assert_eq!(header.unit_number, 100_514);
    }

    #[test]
    fn test_decode_header_exact_minimum() {
        let mut chunk = vec![0u8; 30];
        chunk[26] = 42;
        assert_eq!(decode_header(&chunk).unwrap().unit_number, 42);
    }

    #[test]
    fn test_decode_header_too_short() {
        let err = decode_header(&[0u8; 29]).unwrap_err();
        assert!(matches!(
            err,
            Ar4Error::MalformedHeader { expected: 30, got: 29 }
        ));
    }
}
