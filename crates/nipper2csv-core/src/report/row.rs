/// Column names, written once before any data row.
pub const HEADER: [&str; 10] = [
    "Section Index",
    "Section Title",
    "Reference",
    "Description",
    "Rationale",
    "Remediation",
    "Steps",
    "Affected Device",
    "Result",
    "Impact",
];

/// A single flattened output row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRow {
    pub section_index: String,
    pub section_title: String,
    pub reference: String,
    pub description: String,
    pub rationale: String,
    pub remediation: String,
    pub steps: String,
    pub device: String,
    pub result: String,
    /// Nothing in the report populates this column.
    pub impact: String,
}

impl ReportRow {
    /// Fields in [`HEADER`] order.
    pub fn as_record(&self) -> [&str; 10] {
        [
            self.section_index.as_str(),
            self.section_title.as_str(),
            self.reference.as_str(),
            self.description.as_str(),
            self.rationale.as_str(),
            self.remediation.as_str(),
            self.steps.as_str(),
            self.device.as_str(),
            self.result.as_str(),
            self.impact.as_str(),
        ]
    }
}
