//! Field extraction for a single `<section>` element.
use crate::config::FlattenConfig;
use crate::report::row::ReportRow;
use crate::xml::{extract_text, Element};

/// One device/result pair from a section's results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceResult {
    pub device: String,
    pub result: String,
}

/// The fields pulled out of one section. Nested sections are extracted
/// on their own and never inherit from their ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRecord {
    pub index: String,
    pub title: String,
    pub reference: String,
    pub description: String,
    pub rationale: String,
    pub remediation: String,
    pub steps: Vec<String>,
    pub devices: Vec<DeviceResult>,
}

impl SectionRecord {
    /// Build a record from the section's attributes and direct children.
    pub fn from_element(section: &Element, config: &FlattenConfig) -> Self {
        let mut record = SectionRecord {
            index: section.attr_or_empty("index").to_string(),
            title: section.attr_or_empty("title").to_string(),
            reference: section.attr_or_empty("ref").to_string(),
            ..Default::default()
        };

        let mut notes = Vec::new();
        for child in section.child_elements() {
            match child.name.as_str() {
                "text" => {
                    let label = child.attr_or_empty("title").trim().to_lowercase();
                    let content = extract_text(child);
                    match label.as_str() {
                        "description" => record.description = content,
                        "rationale" => record.rationale = content,
                        "remediation" => record.remediation = content,
                        _ => notes.push(content),
                    }
                }
                "list" => {
                    record.steps.extend(
                        child
                            .children_named("listitem")
                            .map(extract_text)
                            .filter(|step| !step.is_empty()),
                    );
                }
                _ => {}
            }
        }
        if !notes.is_empty() {
            record.steps.push(notes.join(&config.note_separator));
        }

        record.devices = device_results(section);
        record
    }

    /// Output rows for this section: one per device, or a single row with
    /// blank device columns when the section has no usable table.
    pub fn rows(&self, config: &FlattenConfig) -> Vec<ReportRow> {
        let steps = self.steps.join(&config.step_separator);
        let row = |device: &str, result: &str| ReportRow {
            section_index: self.index.clone(),
            section_title: self.title.clone(),
            reference: self.reference.clone(),
            description: self.description.clone(),
            rationale: self.rationale.clone(),
            remediation: self.remediation.clone(),
            steps: steps.clone(),
            device: device.to_string(),
            result: result.to_string(),
            impact: String::new(),
        };

        if self.devices.is_empty() {
            return vec![row("", "")];
        }
        self.devices
            .iter()
            .map(|entry| row(&entry.device, &entry.result))
            .collect()
    }
}

/// Rows of `table > tablebody > tablerow` that have at least two cells.
fn device_results(section: &Element) -> Vec<DeviceResult> {
    let Some(body) = section
        .first_child("table")
        .and_then(|table| table.first_child("tablebody"))
    else {
        return Vec::new();
    };

    body.children_named("tablerow")
        .filter_map(|row| {
            let mut cells = row.children_named("tablecell");
            let device = cells.next()?;
            let result = cells.next()?;
            Some(DeviceResult {
                device: extract_text(device),
                result: extract_text(result),
            })
        })
        .collect()
}
