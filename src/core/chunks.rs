// Fixed-size chunk reading

use crate::core::error::{Ar4Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Reads the whole archive and splits it into `chunk_size` blocks.
///
/// A short final chunk is returned as read.
pub fn read_chunks(path: &Path, chunk_size: usize) -> Result<Vec<Vec<u8>>> {
    if chunk_size == 0 {
        return Err(Ar4Error::InvalidConfig("chunk size must be non-zero".into()));
    }

    let started = Instant::now();
    let access = |source: std::io::Error| Ar4Error::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(access)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).map_err(access)?;

    let chunks: Vec<Vec<u8>> = data.chunks(chunk_size).map(<[u8]>::to_vec).collect();

    debug!(
        "Read {} ({} bytes, {} chunks) in {:.2} ms",
        path.display(),
        data.len(),
        chunks.len(),
        started.elapsed().as_secs_f64() * 1e3
    );

    Ok(chunks)
}

fn is_sentinel_chunk(chunk: &[u8], chunk_size: usize, sentinel: u8) -> bool {
    chunk.len() == chunk_size && chunk.iter().all(|&b| b == sentinel)
}

/// Drops the trailing run of chunks made entirely of `sentinel`.
pub fn trim_trailing_sentinel_chunks(
    chunks: &[Vec<u8>],
    chunk_size: usize,
    sentinel: u8,
) -> &[Vec<u8>] {
    let keep = chunks
        .iter()
        .rposition(|chunk| !is_sentinel_chunk(chunk, chunk_size, sentinel))
        .map_or(0, |last| last + 1);
    &chunks[..keep]
}
