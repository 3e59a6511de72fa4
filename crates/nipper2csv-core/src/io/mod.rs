//! IO utilities for writing flattened reports.

pub mod csv_writer;

pub use csv_writer::ReportWriter;
