// Delimiter-separated text export of decoded records

use crate::core::error::{Ar4Error, Result};
use crate::core::format::{DecodedRecord, UnitDatetime};
use crate::models::parser_config::ParserConfig;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn format_reading(value: Option<f32>, config: &ParserConfig) -> String {
    match value {
        Some(v) => format!("{:.*}", config.precision, v)
            .replace('.', &config.decimal_separator.to_string()),
        None => config.null_token.clone(),
    }
}

/// `DD.MM.YYYY<sep>HH:MM:SS<sep>v0<sep>...`
pub fn format_record(record: &DecodedRecord, config: &ParserConfig) -> String {
    let dt = &record.datetime;
    let sep = config.file_sep.as_str();
    let mut line = format!(
        "{:02}.{:02}.{}{sep}{:02}:{:02}:{:02}",
        dt.day, dt.month, dt.year, dt.hour, dt.minute, dt.second
    );
    for reading in &record.readings {
        line.push_str(sep);
        line.push_str(&format_reading(*reading, config));
    }
    line
}

/// `<unit>_<first>-<last>.<ext>` with datetimes rendered by `datetime_format`.
pub fn output_filename(
    unit_number: u32,
    first: &UnitDatetime,
    last: &UnitDatetime,
    config: &ParserConfig,
) -> Result<String> {
    let mut name = format!("{}_", unit_number);
    let bad_format = |_: std::fmt::Error| {
        Ar4Error::InvalidConfig(format!("datetime_format {:?}", config.datetime_format))
    };

    write!(name, "{}", first.to_naive()?.format(&config.datetime_format)).map_err(bad_format)?;
    name.push('-');
    write!(name, "{}", last.to_naive()?.format(&config.datetime_format)).map_err(bad_format)?;
    name.push('.');
    name.push_str(&config.file_ext);
    Ok(name)
}

pub fn write_records(records: &[DecodedRecord], path: &Path, config: &ParserConfig) -> Result<()> {
    let access = |source: std::io::Error| Ar4Error::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(access)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{}", format_record(record, config)).map_err(access)?;
    }
    writer.flush().map_err(access)?;
    Ok(())
}

/// Writes chronologically sorted `records` into `dir`, naming the file after
/// the unit and the first/last record. Nothing is written for an empty set.
pub fn export_records(
    records: &[DecodedRecord],
    unit_number: u32,
    dir: &Path,
    config: &ParserConfig,
) -> Result<Option<PathBuf>> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        warn!("No records to export for unit {}", unit_number);
        return Ok(None);
    };

    let path = dir.join(output_filename(unit_number, &first.datetime, &last.datetime, config)?);
    write_records(records, &path, config)?;

    info!("{} records exported to {}", records.len(), path.display());
    Ok(Some(path))
}
