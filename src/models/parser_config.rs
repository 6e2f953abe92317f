use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::constants::{
    DEFAULT_CHANNELS, DEFAULT_CHUNK_SIZE, DEFAULT_SENTINEL, HEADER_MIN_SIZE, MAX_FLAG_CHANNELS,
};
use crate::core::error::{Ar4Error, Result};

/// Device and export settings. Missing keys in a config file fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub chunk_size: usize,
    #[serde(with = "hex_byte")]
    pub empty_byte: u8,
    pub channels_amount: usize,
    pub file_sep: String,
    pub datetime_format: String,
    pub file_ext: String,
    pub precision: usize,
    pub decimal_separator: char,
    pub null_token: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            empty_byte: DEFAULT_SENTINEL,
            channels_amount: DEFAULT_CHANNELS,
            file_sep: ";".to_string(),
            datetime_format: "%Y%m%d%H%M%S".to_string(),
            file_ext: "csv".to_string(),
            precision: 6,
            decimal_separator: ',',
            null_token: "None".to_string(),
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < HEADER_MIN_SIZE {
            return Err(Ar4Error::InvalidConfig(format!(
                "chunk_size {} is smaller than the {}-byte header",
                self.chunk_size, HEADER_MIN_SIZE
            )));
        }
        if self.channels_amount == 0 || self.channels_amount > MAX_FLAG_CHANNELS {
            return Err(Ar4Error::InvalidConfig(format!(
                "channels_amount must be 1..={}, got {}",
                MAX_FLAG_CHANNELS, self.channels_amount
            )));
        }
        if self.file_sep.is_empty() {
            return Err(Ar4Error::InvalidConfig("file_sep is empty".into()));
        }
        if StrftimeItems::new(&self.datetime_format).any(|item| matches!(item, Item::Error)) {
            return Err(Ar4Error::InvalidConfig(format!(
                "invalid datetime_format {:?}",
                self.datetime_format
            )));
        }
        Ok(())
    }
}

// Stored as a two-digit hex string, e.g. "ff"
mod hex_byte {
    use super::*;

    pub fn serialize<S: Serializer>(byte: &u8, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:02x}", byte))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u8, D::Error> {
        let s = String::deserialize(deserializer)?;
        u8::from_str_radix(s.trim(), 16).map_err(serde::de::Error::custom)
    }
}
