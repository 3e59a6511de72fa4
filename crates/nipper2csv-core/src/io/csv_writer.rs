//! CSV/TSV writer for flattened report rows.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::FlattenConfig;
use crate::error::{FlattenError, Result};
use crate::report::{ReportRow, SectionRecord, HEADER};

/// Streams report rows to any writer, header first.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
    config: FlattenConfig,
    rows_written: usize,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header row.
    ///
    /// The delimiter is resolved from `config` and the file extension.
    pub fn create<P: AsRef<Path>>(path: P, config: &FlattenConfig) -> Result<Self> {
        let path = path.as_ref();
        let delimiter = config.delimiter_for(path)?;
        let file = File::create(path).map_err(|e| FlattenError::io(path, e))?;
        ReportWriter::from_writer(BufWriter::new(file), delimiter, config)
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn from_writer(inner: W, delimiter: u8, config: &FlattenConfig) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(ReportWriter {
            writer,
            config: config.clone(),
            rows_written: 0,
        })
    }

    pub fn write_row(&mut self, row: &ReportRow) -> Result<()> {
        self.writer.write_record(row.as_record())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Write every row of one section and return how many were written.
    pub fn write_section(&mut self, record: &SectionRecord) -> Result<usize> {
        let rows = record.rows(&self.config);
        for row in &rows {
            self.write_row(row)?;
        }
        Ok(rows.len())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush buffered output and hand back the inner writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| FlattenError::Csv(csv::Error::from(e.into_error())))
    }
}
