//! nipper2csv-core: flatten nested Nipper XML audit reports into table rows.
//!
//! The crate loads a report with a recovering XML reader, walks every
//! `<section>` element regardless of nesting, extracts the description,
//! rationale, remediation, steps and device-result table of each, and
//! streams the resulting rows to a CSV (or TSV) file.
pub mod config;
pub mod error;
pub mod io;
pub mod report;
pub mod xml;

use std::path::Path;

pub use config::FlattenConfig;
pub use error::{FlattenError, Result};
pub use report::{flatten_document, ReportRow, SectionRecord, HEADER};
pub use xml::Document;

use crate::io::ReportWriter;

/// Counts reported after a successful conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub sections: usize,
    pub rows: usize,
}

/// Convert the report at `input` into a table at `output`.
///
/// The document is parsed in full before `output` is touched, so a parse
/// failure never leaves a file behind.
pub fn convert<P, Q>(input: P, output: Q, config: &FlattenConfig) -> Result<ConversionSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let document = Document::parse_file(&input)?;
    if !document.recovered().is_empty() {
        log::info!(
            "Recovered from {} XML malformation(s) in {}",
            document.recovered().len(),
            input.as_ref().display()
        );
    }
    write_document(&document, output, config)
}

/// Write an already parsed document to `output`.
pub fn write_document<Q: AsRef<Path>>(
    document: &Document,
    output: Q,
    config: &FlattenConfig,
) -> Result<ConversionSummary> {
    let mut writer = ReportWriter::create(&output, config)?;
    let mut summary = ConversionSummary::default();

    for section in report::sections(document) {
        let record = SectionRecord::from_element(section, config);
        let rows = writer.write_section(&record)?;
        log::debug!(
            "Section {:?} ({:?}): {} row(s)",
            record.index,
            record.title,
            rows
        );
        summary.sections += 1;
    }
    summary.rows = writer.rows_written();
    writer.finish()?;

    log::info!(
        "Wrote {} row(s) for {} section(s) to {}",
        summary.rows,
        summary.sections,
        output.as_ref().display()
    );
    Ok(summary)
}
