// AR4 archive reader
// Main library entry point

pub mod core;
pub mod models;
pub mod utils;

// Re-export main types
pub use core::error::{Ar4Error, Result};
pub use core::reader::{parse, Ar4Reader, ParsedArchive};
pub use core::format::{DecodedRecord, Metadata, RawRecord, UnitDatetime};
pub use models::parser_config::ParserConfig;
