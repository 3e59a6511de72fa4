use std::time::Instant;

use anyhow::{Context, Result};

use nipper2csv_core::{convert, ConversionSummary};

use crate::convert::input::ConvertConfig;

pub fn run_export(config: &ConvertConfig) -> Result<ConversionSummary> {
    let start_time = Instant::now();

    let summary = convert(&config.input, &config.output, &config.flatten)
        .with_context(|| format!("Failed to convert {}", config.input.display()))?;

    log::info!(
        "Flattened {} section(s) into {} row(s) in {:?}",
        summary.sections,
        summary.rows,
        start_time.elapsed()
    );
    println!("CSV export completed: {}", config.output.display());

    Ok(summary)
}
