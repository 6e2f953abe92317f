// Packed timestamp codec

use crate::core::constants::*;
use crate::core::error::{Ar4Error, Result};
use crate::core::format::UnitDatetime;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

fn field(raw: u32, (shift, mask): (u32, u32)) -> u32 {
    raw >> shift & mask
}

fn place(value: u32, (shift, mask): (u32, u32)) -> u32 {
    (value & mask) << shift
}

/// Decodes a packed 32-bit timestamp. Total over `u32`; no calendar checks.
pub fn unpack(raw: u32) -> UnitDatetime {
    UnitDatetime {
        year: BASE_YEAR + field(raw, YEAR_FIELD) as u16,
        month: field(raw, MONTH_FIELD) as u8 + 1,
        day: field(raw, DAY_FIELD) as u8 + 1,
        hour: field(raw, HOUR_FIELD) as u8,
        minute: field(raw, MINUTE_FIELD) as u8,
        second: field(raw, SECOND_FIELD) as u8,
    }
}

/// Inverse of [`unpack`] for fields inside the device ranges.
pub fn pack(dt: &UnitDatetime) -> u32 {
    place(u32::from(dt.year.wrapping_sub(BASE_YEAR)), YEAR_FIELD)
        | place(u32::from(dt.month.wrapping_sub(1)), MONTH_FIELD)
        | place(u32::from(dt.day.wrapping_sub(1)), DAY_FIELD)
        | place(u32::from(dt.hour), HOUR_FIELD)
        | place(u32::from(dt.minute), MINUTE_FIELD)
        | place(u32::from(dt.second), SECOND_FIELD)
}

/// Decodes the 16-bit date found at record offset 4-5 (already shifted).
pub fn unpack_date_only(raw: u16) -> (u16, u8, u8) {
    let get = |(shift, mask): (u16, u16)| raw >> shift & mask;
    (
        BASE_YEAR + get(DATE_YEAR_FIELD),
        get(DATE_MONTH_FIELD) as u8 + 1,
        get(DATE_DAY_FIELD) as u8 + 1,
    )
}

/// Packed-date key of a datetime, matching [`crate::core::format::RawRecord::date_key`].
pub fn date_key(dt: &UnitDatetime) -> u16 {
    let put = |value: u16, (shift, mask): (u16, u16)| (value & mask) << shift;
    put(dt.year.wrapping_sub(BASE_YEAR), DATE_YEAR_FIELD)
        | put(u16::from(dt.month.wrapping_sub(1)), DATE_MONTH_FIELD)
        | put(u16::from(dt.day.wrapping_sub(1)), DATE_DAY_FIELD)
}

/// Range-query key of a bound.
///
/// Years the 6-bit field cannot hold clamp below or above every packed
/// timestamp instead of wrapping.
pub fn range_key(dt: &UnitDatetime) -> u64 {
    if dt.year < BASE_YEAR {
        0
    } else if dt.year > MAX_YEAR {
        u64::from(u32::MAX) + 1
    } else {
        u64::from(pack(dt))
    }
}

impl UnitDatetime {
    /// Converts to a calendar datetime, rejecting impossible dates and times.
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
            .and_then(|d| {
                d.and_hms_opt(
                    u32::from(self.hour),
                    u32::from(self.minute),
                    u32::from(self.second),
                )
            })
            .ok_or_else(|| Ar4Error::InvalidTimestamp(self.to_string()))
    }

    /// Fails for years outside `0..=65535`.
    pub fn from_naive(dt: &NaiveDateTime) -> Result<Self> {
        let year = u16::try_from(dt.year())
            .map_err(|_| Ar4Error::InvalidTimestamp(format!("year out of range: {}", dt)))?;
        Ok(Self {
            year,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
        })
    }

    /// Midnight of this date and midnight of the following calendar day.
    pub fn day_bounds(&self) -> Result<(UnitDatetime, UnitDatetime)> {
        let start = UnitDatetime::date(self.year, self.month, self.day);
        let next = start
            .to_naive()?
            .date()
            .succ_opt()
            .ok_or_else(|| Ar4Error::InvalidTimestamp(format!("no day after {}", start)))?;
        let year = u16::try_from(next.year())
            .map_err(|_| Ar4Error::InvalidTimestamp(format!("no day after {}", start)))?;
        let end = UnitDatetime::date(year, next.month() as u8, next.day() as u8);
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_unpack_known_value() {
        let dt = UnitDatetime::new(2023, 10, 5, 14, 30, 7);
        let raw = (23 << 26) | (9 << 22) | (4 << 17) | (14 << 12) | (30 << 6) | 7;
        assert_eq!(pack(&dt), raw);
        assert_eq!(unpack(raw), dt);
    }

    #[test]
    fn test_unpack_zero() {
        assert_eq!(unpack(0), UnitDatetime::date(2000, 1, 1));
    }

    #[test]
    fn test_unpack_all_ones_is_lax() {
        // Device field widths exceed calendar ranges
        let dt = unpack(u32::MAX);
        assert_eq!(dt, UnitDatetime::new(2063, 16, 32, 31, 63, 63));
        assert!(dt.to_naive().is_err());
    }

    #[test]
    fn test_round_trip_random() {
        let mut rng = StdRng::seed_from_u64(0x0A4);
        for _ in 0..10_000 {
            let dt = UnitDatetime::new(
                rng.gen_range(2000..=2063),
                rng.gen_range(1..=16),
                rng.gen_range(1..=32),
                rng.gen_range(0..=31),
                rng.gen_range(0..=59),
                rng.gen_range(0..=59),
            );
            assert_eq!(unpack(pack(&dt)), dt);
        }
    }

    #[test]
    fn test_packed_order_is_chronological() {
        let earlier = UnitDatetime::new(2023, 12, 31, 23, 59, 59);
        let later = UnitDatetime::date(2024, 1, 1);
        assert!(range_key(&earlier) < range_key(&later));
        assert!(pack(&earlier).to_be_bytes() < pack(&later).to_be_bytes());
    }

    #[test]
    fn test_date_only_matches_full_timestamp() {
        let dt = UnitDatetime::new(2041, 7, 19, 8, 0, 0);
        let raw = pack(&dt);
        let from_record = (raw >> 16) as u16 >> 1;
        assert_eq!(from_record, date_key(&dt));
        assert_eq!(unpack_date_only(from_record), (2041, 7, 19));
    }

    #[test]
    fn test_to_naive_rejects_invalid() {
        assert!(UnitDatetime::date(2023, 2, 29).to_naive().is_err());
        assert!(UnitDatetime::new(2023, 1, 1, 24, 0, 0).to_naive().is_err());
        assert!(UnitDatetime::date(2024, 2, 29).to_naive().is_ok());
    }

    #[test]
    fn test_day_bounds_rollover() {
        let (start, end) = UnitDatetime::new(2023, 1, 31, 17, 4, 2).day_bounds().unwrap();
        assert_eq!(start, UnitDatetime::date(2023, 1, 31));
        assert_eq!(end, UnitDatetime::date(2023, 2, 1));

        let (_, end) = UnitDatetime::date(2023, 12, 31).day_bounds().unwrap();
        assert_eq!(end, UnitDatetime::date(2024, 1, 1));

        let (_, end) = UnitDatetime::date(2063, 12, 31).day_bounds().unwrap();
        assert_eq!(end, UnitDatetime::date(2064, 1, 1));
        assert!(range_key(&end) > u64::from(u32::MAX));
    }

    #[test]
    fn test_range_key_clamps_years() {
        let last = UnitDatetime::new(2063, 12, 31, 23, 59, 59);
        assert_eq!(range_key(&last), u64::from(pack(&last)));
        assert_eq!(range_key(&UnitDatetime::date(1999, 12, 31)), 0);
        assert!(range_key(&UnitDatetime::date(2064, 1, 1)) > range_key(&last));
        assert!(range_key(&UnitDatetime::date(2100, 1, 1)) > u64::from(u32::MAX));
    }

    #[test]
    fn test_naive_round_trip() {
        let dt = UnitDatetime::new(2024, 2, 29, 12, 1, 2);
        assert_eq!(UnitDatetime::from_naive(&dt.to_naive().unwrap()).unwrap(), dt);
    }

    #[test]
    fn test_from_naive_rejects_unrepresentable_year() {
        let before_zero = NaiveDate::from_ymd_opt(-5, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(matches!(
            UnitDatetime::from_naive(&before_zero),
            Err(Ar4Error::InvalidTimestamp(_))
        ));

        let far = NaiveDate::from_ymd_opt(70_000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(UnitDatetime::from_naive(&far).is_err());
    }
}
