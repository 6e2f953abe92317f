// Time-range queries over undecoded records

use crate::core::error::Result;
use crate::core::format::{Metadata, RawRecord, UnitDatetime};
use crate::core::timestamp::range_key;
use std::collections::BTreeMap;

/// Records with `start <= t < end`.
///
/// Both bounds must be real calendar datetimes; otherwise the whole query
/// fails with `InvalidTimestamp`. Bounds past either end of the packed year
/// range are clamped.
pub fn filter_by_time_period<'a>(
    records: &'a [RawRecord],
    start: &UnitDatetime,
    end: &UnitDatetime,
) -> Result<Vec<&'a RawRecord>> {
    start.to_naive()?;
    end.to_naive()?;

    let start_key = range_key(start);
    let end_key = range_key(end);

    Ok(records
        .iter()
        .filter(|r| {
            let key = u64::from(u32::from_be_bytes(r.timestamp_key()));
            start_key <= key && key < end_key
        })
        .collect())
}

/// Records on the calendar date of `reference`.
pub fn extract_day<'a>(
    records: &'a [RawRecord],
    reference: &UnitDatetime,
) -> Result<Vec<&'a RawRecord>> {
    let (start, end) = reference.day_bounds()?;
    filter_by_time_period(records, &start, &end)
}

/// Records on the date of the newest record; empty when there is none.
pub fn extract_last_day<'a>(
    records: &'a [RawRecord],
    metadata: &Metadata,
) -> Result<Vec<&'a RawRecord>> {
    match &metadata.max_datetime {
        Some(max) => extract_day(records, max),
        None => Ok(Vec::new()),
    }
}

/// Groups records by packed date. Keys iterate in chronological order.
pub fn partition_by_day(records: &[RawRecord]) -> BTreeMap<u16, Vec<&RawRecord>> {
    let mut days: BTreeMap<u16, Vec<&RawRecord>> = BTreeMap::new();
    for record in records {
        days.entry(record.date_key()).or_default().push(record);
    }
    days
}

/// Smallest and largest record timestamps by big-endian key.
pub fn timestamp_bounds(records: &[RawRecord]) -> Option<(u32, u32)> {
    let mut keys = records.iter().map(RawRecord::timestamp_key);
    let first = keys.next()?;
    let (min, max) = keys.fold((first, first), |(lo, hi), k| (lo.min(k), hi.max(k)));
    Some((u32::from_be_bytes(min), u32::from_be_bytes(max)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Ar4Error;
    use crate::core::timestamp::{date_key, pack, unpack, unpack_date_only};

    fn rec(dt: UnitDatetime) -> RawRecord {
        let mut bytes = vec![0x01, 6];
        bytes.extend_from_slice(&pack(&dt).to_le_bytes());
        RawRecord::new(bytes, 1, 0)
    }

    fn dt(y: u16, mo: u8, d: u8, h: u8, mi: u8, s: u8) -> UnitDatetime {
        UnitDatetime::new(y, mo, d, h, mi, s)
    }

    fn times(found: &[&RawRecord]) -> Vec<UnitDatetime> {
        found.iter().map(|r| unpack(r.timestamp_raw())).collect()
    }

    #[test]
    fn test_filter_start_inclusive_end_exclusive() {
        let start = dt(2023, 10, 5, 10, 0, 0);
        let end = dt(2023, 10, 5, 12, 0, 0);
        let records = vec![
            rec(dt(2023, 10, 5, 9, 59, 59)),
            rec(start),
            rec(dt(2023, 10, 5, 11, 0, 0)),
            rec(end),
        ];

        let found = filter_by_time_period(&records, &start, &end).unwrap();
        assert_eq!(times(&found), vec![start, dt(2023, 10, 5, 11, 0, 0)]);
    }

    #[test]
    fn test_filter_rejects_invalid_bounds() {
        let records = vec![rec(dt(2023, 10, 5, 0, 0, 0))];
        let err = filter_by_time_period(
            &records,
            &dt(2023, 10, 32, 0, 0, 0),
            &dt(2023, 11, 1, 0, 0, 0),
        )
        .unwrap_err();
        assert!(matches!(err, Ar4Error::InvalidTimestamp(_)));
    }

    #[test]
    fn test_filter_inverted_range_is_empty() {
        let records = vec![rec(dt(2023, 10, 5, 0, 0, 0))];
        let found = filter_by_time_period(
            &records,
            &dt(2023, 10, 6, 0, 0, 0),
            &dt(2023, 10, 4, 0, 0, 0),
        )
        .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_filter_bounds_outside_year_field() {
        let records = vec![
            rec(dt(2023, 10, 5, 12, 0, 0)),
            rec(dt(2063, 12, 31, 12, 0, 0)),
        ];

        let found = filter_by_time_period(
            &records,
            &dt(1999, 1, 1, 0, 0, 0),
            &dt(2030, 1, 1, 0, 0, 0),
        )
        .unwrap();
        assert_eq!(times(&found), vec![dt(2023, 10, 5, 12, 0, 0)]);

        let found = filter_by_time_period(
            &records,
            &dt(2020, 1, 1, 0, 0, 0),
            &dt(2100, 1, 1, 0, 0, 0),
        )
        .unwrap();
        assert_eq!(found.len(), 2);

        let found = extract_day(&records, &dt(2063, 12, 31, 0, 0, 0)).unwrap();
        assert_eq!(times(&found), vec![dt(2063, 12, 31, 12, 0, 0)]);
    }

    #[test]
    fn test_extract_day_month_rollover() {
        let records = vec![
            rec(dt(2023, 1, 30, 23, 59, 59)),
            rec(dt(2023, 1, 31, 0, 0, 0)),
            rec(dt(2023, 1, 31, 23, 59, 59)),
            rec(dt(2023, 2, 1, 0, 0, 0)),
        ];
        let found = extract_day(&records, &dt(2023, 1, 31, 15, 0, 0)).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_extract_last_day() {
        let records = vec![
            rec(dt(2023, 12, 30, 8, 0, 0)),
            rec(dt(2023, 12, 31, 8, 0, 0)),
            rec(dt(2023, 12, 31, 9, 0, 0)),
        ];
        let metadata = Metadata {
            unit_number: 1,
            creation_datetime: dt(2023, 12, 1, 0, 0, 0),
            min_datetime: Some(dt(2023, 12, 30, 8, 0, 0)),
            max_datetime: Some(dt(2023, 12, 31, 9, 0, 0)),
        };
        assert_eq!(extract_last_day(&records, &metadata).unwrap().len(), 2);

        let no_records = Metadata {
            max_datetime: None,
            ..metadata
        };
        assert!(extract_last_day(&records, &no_records).unwrap().is_empty());
    }

    #[test]
    fn test_partition_groups_in_key_order() {
        let records = vec![
            rec(dt(2023, 10, 6, 1, 0, 0)),
            rec(dt(2023, 10, 5, 8, 0, 0)),
            rec(dt(2023, 10, 5, 20, 0, 0)),
        ];
        let days = partition_by_day(&records);
        let sizes: Vec<_> = days.values().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1]);

        let keys: Vec<_> = days.keys().copied().collect();
        assert_eq!(keys[0], date_key(&dt(2023, 10, 5, 0, 0, 0)));
        assert_eq!(unpack_date_only(keys[1]), (2023, 10, 6));
        assert_eq!(
            times(&days[&keys[0]]),
            vec![dt(2023, 10, 5, 8, 0, 0), dt(2023, 10, 5, 20, 0, 0)]
        );
    }

    #[test]
    fn test_day_extraction_matches_partition() {
        let mut records = Vec::new();
        for day in [28u8, 29, 1, 2] {
            let month = if day > 20 { 2 } else { 3 };
            for hour in [0u8, 6, 23] {
                records.push(rec(dt(2024, month, day, hour, 15, 0)));
            }
        }

        let days = partition_by_day(&records);
        let mut total = 0;
        for (key, group) in &days {
            let (y, m, d) = unpack_date_only(*key);
            let by_day = extract_day(&records, &UnitDatetime::date(y, m, d)).unwrap();
            assert_eq!(&by_day, group);
            total += by_day.len();
        }
        assert_eq!(total, records.len());
        assert_eq!(days.len(), 4);
    }

    #[test]
    fn test_timestamp_bounds() {
        let a = dt(2023, 5, 1, 0, 0, 0);
        let b = dt(2022, 12, 31, 23, 0, 0);
        let c = dt(2023, 4, 30, 12, 0, 0);
        let records = vec![rec(a), rec(b), rec(c)];

        let (min, max) = timestamp_bounds(&records).unwrap();
        assert_eq!(unpack(min), b);
        assert_eq!(unpack(max), a);
        assert!(timestamp_bounds(&[]).is_none());
    }
}
