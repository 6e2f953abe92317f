// Main AR4 reader implementation

use crate::core::chunks::{read_chunks, trim_trailing_sentinel_chunks};
use crate::core::error::{Ar4Error, Result};
use crate::core::export::export_records;
use crate::core::format::*;
use crate::core::header::decode_header;
use crate::core::query;
use crate::core::record::decode_all;
use crate::core::splitter::extract_records;
use crate::core::timestamp::unpack;
use crate::models::parser_config::ParserConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of parsing one archive file. Records stay undecoded until a query
/// has narrowed them down.
#[derive(Debug)]
pub struct ParsedArchive {
    pub path: PathBuf,
    pub header: ArchiveHeader,
    pub metadata: Metadata,
    pub prefix: Vec<RawRecord>,
    pub records: Vec<RawRecord>,
    /// Non-fatal problems: truncated file, corrupt chunks.
    pub warnings: Vec<Ar4Error>,
}

/// Splits off the leading run of records that carry no timestamp yet.
fn split_prefix(mut records: Vec<RawRecord>, sentinel: u8) -> (Vec<RawRecord>, Vec<RawRecord>) {
    let split = records
        .iter()
        .position(|r| r.has_timestamp(sentinel))
        .unwrap_or(records.len());
    let genuine = records.split_off(split);
    (records, genuine)
}

pub fn parse(path: &Path, config: &ParserConfig) -> Result<ParsedArchive> {
    let started = Instant::now();
    let sentinel = config.empty_byte;
    let mut warnings = Vec::new();

    let chunks = read_chunks(path, config.chunk_size)?;
    if let Some(last) = chunks.last().filter(|c| c.len() != config.chunk_size) {
        let len = (chunks.len() - 1) * config.chunk_size + last.len();
        let truncated = Ar4Error::TruncatedArchive {
            len,
            chunk_size: config.chunk_size,
        };
        warn!("{}: {}", path.display(), truncated);
        warnings.push(truncated);
    }

    let chunks = trim_trailing_sentinel_chunks(&chunks, config.chunk_size, sentinel);
    let Some((header_chunk, data_chunks)) = chunks.split_first() else {
        return Err(Ar4Error::EmptyArchive {
            path: path.to_path_buf(),
        });
    };
    let header = decode_header(header_chunk)?;

    let mut all_records = Vec::new();
    for (index, chunk) in data_chunks.iter().enumerate() {
        // Chunk 0 is the header
        let split = extract_records(chunk, sentinel, index + 1);
        all_records.extend(split.records);
        if let Some(corruption) = split.corruption {
            warn!("{}: {}", path.display(), corruption);
            warnings.push(corruption);
        }
    }

    let (prefix, records) = split_prefix(all_records, sentinel);
    let bounds = query::timestamp_bounds(&records);
    let metadata = Metadata {
        unit_number: header.unit_number,
        creation_datetime: unpack(header.creation_timestamp_raw),
        min_datetime: bounds.map(|(min, _)| unpack(min)),
        max_datetime: bounds.map(|(_, max)| unpack(max)),
    };

    debug!(
        "Parsed {}: {} prefix records, {} records in {:.2} ms",
        path.display(),
        prefix.len(),
        records.len(),
        started.elapsed().as_secs_f64() * 1e3
    );

    Ok(ParsedArchive {
        path: path.to_path_buf(),
        header,
        metadata,
        prefix,
        records,
        warnings,
    })
}

fn show_metadata(metadata: &Metadata) {
    let or_none = |dt: Option<UnitDatetime>| {
        dt.map_or_else(|| "none".to_string(), |d| d.to_string())
    };

    info!("Unit number: {}", metadata.unit_number);
    info!("Creation datetime: {}", metadata.creation_datetime);
    info!("Minimum datetime:  {}", or_none(metadata.min_datetime));
    info!("Maximum datetime:  {}", or_none(metadata.max_datetime));
}

pub struct Ar4Reader {
    config: ParserConfig,
    archive: ParsedArchive,
}

impl Ar4Reader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, ParserConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: ParserConfig) -> Result<Self> {
        config.validate()?;
        let archive = parse(path.as_ref(), &config)?;
        show_metadata(&archive.metadata);

        Ok(Self { config, archive })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn archive(&self) -> &ParsedArchive {
        &self.archive
    }

    pub fn metadata(&self) -> &Metadata {
        &self.archive.metadata
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.archive.records
    }

    pub fn prefix(&self) -> &[RawRecord] {
        &self.archive.prefix
    }

    pub fn warnings(&self) -> &[Ar4Error] {
        &self.archive.warnings
    }

    pub fn extract_time_period(
        &self,
        start: &UnitDatetime,
        end: &UnitDatetime,
    ) -> Result<Vec<&RawRecord>> {
        query::filter_by_time_period(&self.archive.records, start, end)
    }

    pub fn extract_day(&self, reference: &UnitDatetime) -> Result<Vec<&RawRecord>> {
        query::extract_day(&self.archive.records, reference)
    }

    pub fn extract_last_day(&self) -> Result<Vec<&RawRecord>> {
        query::extract_last_day(&self.archive.records, &self.archive.metadata)
    }

    pub fn partition_by_day(&self) -> BTreeMap<u16, Vec<&RawRecord>> {
        query::partition_by_day(&self.archive.records)
    }

    pub fn decode_time_period(
        &self,
        start: &UnitDatetime,
        end: &UnitDatetime,
    ) -> Result<Vec<DecodedRecord>> {
        let records = self.extract_time_period(start, end)?;
        decode_all(records, self.config.channels_amount)
    }

    pub fn decode_last_day(&self) -> Result<Vec<DecodedRecord>> {
        let records = self.extract_last_day()?;
        decode_all(records, self.config.channels_amount)
    }

    /// Filters, decodes, sorts and writes `[start, end)` into `dir`.
    /// Returns the written file, or `None` when the range holds no records.
    pub fn export_range(
        &self,
        start: &UnitDatetime,
        end: &UnitDatetime,
        dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let decoded = self.decode_time_period(start, end)?;
        export_records(&decoded, self.archive.metadata.unit_number, dir, &self.config)
    }

    pub fn export_last_day(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let decoded = self.decode_last_day()?;
        export_records(&decoded, self.archive.metadata.unit_number, dir, &self.config)
    }
}
