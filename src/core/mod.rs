pub mod chunks;
pub mod constants;
pub mod error;
pub mod export;
pub mod format;
pub mod header;
pub mod query;
pub mod reader;
pub mod record;
pub mod splitter;
pub mod timestamp;
