use anyhow::Result;
use clap::{Arg, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use nipper2csv_cli::convert::export::run_export;
use nipper2csv_cli::convert::input::ConvertConfig;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("NIPPER2CSV_LOG", "error,nipper2csv=info"))
        .init();

    let matches = Command::new("nipper2csv")
        .version(clap::crate_version!())
        .about("Convert a Nipper XML audit report into a spreadsheet-ready CSV file")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Path to the Nipper XML report")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .help("Path of the CSV file to write (a .tsv extension writes tab-separated output)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON file with delimiter and separator settings")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("delimiter")
                .short('d')
                .long("delimiter")
                .help("Output field delimiter. Overrides the delimiter in the configuration file.")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .value_hint(ValueHint::Other),
        )
        .get_matches();

    let config = ConvertConfig::from_arguments(&matches)?;
    log::info!(
        "[nipper2csv] Converting {:?} -> {:?}",
        config.input,
        config.output
    );

    match run_export(&config) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Conversion failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
