use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use tracing::{info, warn, Level};

use ar4_reader::utils::conf_helper::load_config;
use ar4_reader::{Ar4Reader, ParserConfig, UnitDatetime};

const USAGE: &str = "usage: ar4_reader <archive.AR4> [config.json] [START END]\n\
                     START/END as YYYY-MM-DDTHH:MM:SS; without them the last day is exported";

fn parse_datetime(arg: &str) -> Result<UnitDatetime> {
    let dt = NaiveDateTime::parse_from_str(arg, "%Y-%m-%dT%H:%M:%S")
        .with_context(|| format!("bad datetime {:?}", arg))?;
    Ok(UnitDatetime::from_naive(&dt)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (archive, rest) = match args.split_first() {
        Some((archive, rest)) => (archive, rest),
        None => bail!(USAGE),
    };

    // An optional config path comes first; a range is always two datetimes
    let (config, range) = match rest {
        [] => (ParserConfig::default(), None),
        [config] => (load_config(Path::new(config))?, None),
        [start, end] => (ParserConfig::default(), Some((start, end))),
        [config, start, end] => (load_config(Path::new(config))?, Some((start, end))),
        _ => bail!(USAGE),
    };

    let reader = Ar4Reader::open_with_config(archive, config)
        .with_context(|| format!("failed to parse {}", archive))?;

    for warning in reader.warnings() {
        warn!("{}", warning);
    }
    info!(
        "{} records ({} prefix records)",
        reader.records().len(),
        reader.prefix().len()
    );

    let out_dir = env::current_dir().context("no working directory")?;
    let written = match range {
        Some((start, end)) => {
            reader.export_range(&parse_datetime(start)?, &parse_datetime(end)?, &out_dir)?
        }
        None => reader.export_last_day(&out_dir)?,
    };

    match written {
        Some(path) => info!("Written {}", path.display()),
        None => info!("Nothing to export"),
    }

    Ok(())
}
