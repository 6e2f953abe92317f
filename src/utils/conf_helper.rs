use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::constants::CONFIG_FILE_NAME;
use crate::core::error::{Ar4Error, Result};
use crate::models::parser_config::ParserConfig;

/// Reads a JSON config; keys absent from the file keep their defaults.
pub fn load_config(path: &Path) -> Result<ParserConfig> {
    let data = fs::read_to_string(path).map_err(|source| Ar4Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ParserConfig = serde_json::from_str(&data)?;
    config.validate()?;

    info!("Config was read from {}", path.display());
    Ok(config)
}

/// Writes `config` as `ar4_parser_config.json` into `dir`.
pub fn export_config(config: &ParserConfig, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    let data = serde_json::to_string_pretty(config)?;

    fs::write(&path, data).map_err(|source| Ar4Error::FileAccess {
        path: path.clone(),
        source,
    })?;

    info!("Config is saved at {}", path.display());
    Ok(path)
}
