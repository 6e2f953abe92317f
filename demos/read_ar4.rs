// Example usage of the AR4 reader

use ar4_reader::core::timestamp::unpack_date_only;
use ar4_reader::{Ar4Reader, Result, UnitDatetime};
use std::path::Path;
use tracing::{debug, info, Level};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Open an archive with the default 256-byte chunks and 0xFF sentinel
    let reader = Ar4Reader::open("data/TM100514_B.AR4")?;

    // Records per day
    info!("Days in archive:");
    for (key, records) in reader.partition_by_day() {
        let (year, month, day) = unpack_date_only(key);
        info!("  {:02}.{:02}.{}: {} records", day, month, year, records.len());
    }

    // Last day, decoded
    let last_day = reader.decode_last_day()?;
    info!("Records on the last day: {}", last_day.len());
    if let Some(last) = last_day.last() {
        info!("Last record: {} {:?}", last.datetime, last.readings);
    }

    // Arbitrary window, half-open
    let start = UnitDatetime::date(2023, 8, 1);
    let end = UnitDatetime::date(2023, 10, 6);
    let window = reader.decode_time_period(&start, &end)?;
    info!("Records in [{}, {}): {}", start, end, window.len());
    for record in window.iter().take(3) {
        debug!("  {} errors={:?}", record.datetime, record.errors);
    }

    if let Some(path) = reader.export_range(&start, &end, Path::new("."))? {
        info!("Exported to {}", path.display());
    }

    Ok(())
}
