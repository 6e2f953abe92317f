// Format constants for AR4 archives

pub const DEFAULT_CHUNK_SIZE: usize = 256;
pub const DEFAULT_SENTINEL: u8 = 0xFF;
pub const DEFAULT_CHANNELS: usize = 8;

// Header chunk: creation timestamp(u32 LE) at 22, unit number(u32 LE) at 26
pub const HEADER_TIMESTAMP_OFFSET: usize = 22;
pub const HEADER_UNIT_OFFSET: usize = 26;
pub const HEADER_MIN_SIZE: usize = HEADER_UNIT_OFFSET + 4; // 30 bytes

// Record layout: reserved(u8) len(u8) ts(u32 LE) lim(u8) lim2(u8) err(u8) ch[n](f32 BE) cs(u8)
pub const RECORD_LENGTH_OFFSET: usize = 1;
pub const RECORD_TIMESTAMP_OFFSET: usize = 2;
pub const RECORD_DATE_OFFSET: usize = 4;
pub const RECORD_LIMITS_OFFSET: usize = 6;
pub const RECORD_SECONDARY_LIMIT_OFFSET: usize = 7;
pub const RECORD_ERRORS_OFFSET: usize = 8;
pub const RECORD_READINGS_OFFSET: usize = 9;
pub const READING_SIZE: usize = 4;

// Shortest slice the splitter accepts: length header + packed timestamp
pub const MIN_RECORD_SIZE: usize = RECORD_TIMESTAMP_OFFSET + 4; // 6 bytes

// Error and limit flags are packed one bit per channel into a single byte
pub const MAX_FLAG_CHANNELS: usize = 8;

pub const fn record_size(channels: usize) -> usize {
    RECORD_READINGS_OFFSET + channels * READING_SIZE + 1
}

// Packed timestamp fields, LSB first: (shift, mask)
pub const SECOND_FIELD: (u32, u32) = (0, 0b11_1111);
pub const MINUTE_FIELD: (u32, u32) = (6, 0b11_1111);
pub const HOUR_FIELD: (u32, u32) = (12, 0b1_1111);
pub const DAY_FIELD: (u32, u32) = (17, 0b1_1111);
pub const MONTH_FIELD: (u32, u32) = (22, 0b1111);
pub const YEAR_FIELD: (u32, u32) = (26, 0b11_1111);

// Packed date (record bytes 4-5 as u16 LE, shifted right by one)
pub const DATE_DAY_FIELD: (u16, u16) = (0, 0b1_1111);
pub const DATE_MONTH_FIELD: (u16, u16) = (5, 0b1111);
pub const DATE_YEAR_FIELD: (u16, u16) = (9, 0b11_1111);

pub const BASE_YEAR: u16 = 2000;
/// Last year the 6-bit year field can hold.
pub const MAX_YEAR: u16 = BASE_YEAR + 63;

pub const CONFIG_FILE_NAME: &str = "ar4_parser_config.json";
