use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use nipper2csv_core::FlattenConfig;

/// Everything one conversion run needs.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConvertConfig {
    pub version: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub flatten: FlattenConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            version: clap::crate_version!().to_string(),
            input: PathBuf::new(),
            output: PathBuf::from("nipper_report.csv"),
            flatten: FlattenConfig::default(),
        }
    }
}

impl ConvertConfig {
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = ConvertConfig::default();

        if let Some(config_path) = matches.get_one::<PathBuf>("config") {
            config.flatten = load_flatten_config(config_path)?;
        }

        // Apply CLI overrides
        if let Some(input) = matches.get_one::<PathBuf>("input") {
            config.input = input.clone();
        }
        if let Some(output) = matches.get_one::<PathBuf>("output") {
            config.output = output.clone();
        }
        if let Some(delimiter) = matches.get_one::<String>("delimiter") {
            config.flatten.delimiter = Some(parse_delimiter(delimiter)?);
        }

        Ok(config)
    }
}

/// Load a flattening configuration from JSON, falling back to the default
/// for any field that is missing or has the wrong type.
pub fn load_flatten_config<P: AsRef<Path>>(path: P) -> Result<FlattenConfig> {
    let path = path.as_ref();
    let config_json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let partial: serde_json::Value = serde_json::from_str(&config_json)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    let mut config = FlattenConfig::default();

    macro_rules! load_or_default {
        ($field:ident) => {
            if let Some(val) = partial.get(stringify!($field)) {
                if let Ok(parsed) = serde_json::from_value(val.clone()) {
                    config.$field = parsed;
                } else {
                    log::warn!(
                        "Config Invalid value for '{}', using default: {:?}",
                        stringify!($field), config.$field
                    );
                }
            } else {
                log::warn!(
                    "Config Missing field '{}', using default: {:?}",
                    stringify!($field), config.$field
                );
            }
        };
    }

    load_or_default!(delimiter);
    load_or_default!(step_separator);
    load_or_default!(note_separator);

    Ok(config)
}

/// Accepts a single character, or `tab` / `\t` for a tab.
pub fn parse_delimiter(value: &str) -> Result<char> {
    match value {
        "tab" | "\\t" | "\t" => return Ok('\t'),
        _ => {}
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => anyhow::bail!("Delimiter must be a single character: {:?}", value),
    }
}
