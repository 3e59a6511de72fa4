//! Flattening of nested report sections into table rows.
//!
//! Every `<section>` element in the document is an independent record,
//! whatever its depth. A section contributes one row per qualifying
//! device-result table row, or one row with blank device columns.
pub mod row;
pub mod section;

pub use row::{ReportRow, HEADER};
pub use section::{DeviceResult, SectionRecord};

use crate::config::FlattenConfig;
use crate::xml::{Document, Element};

pub const SECTION_TAG: &str = "section";

/// All sections in document order, nested ones included.
pub fn sections(document: &Document) -> impl Iterator<Item = &Element> {
    document.root().descendants_named(SECTION_TAG)
}

/// Extract every section of the document.
pub fn section_records(document: &Document, config: &FlattenConfig) -> Vec<SectionRecord> {
    sections(document)
        .map(|section| SectionRecord::from_element(section, config))
        .collect()
}

/// Flatten the whole document into rows, in output order.
pub fn flatten_document(document: &Document, config: &FlattenConfig) -> Vec<ReportRow> {
    sections(document)
        .flat_map(|section| SectionRecord::from_element(section, config).rows(config))
        .collect()
}
