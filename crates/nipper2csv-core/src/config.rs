use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FlattenError, Result};

/// Output and joining options for a conversion.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FlattenConfig {
    /// Field delimiter. When unset it is chosen from the output extension.
    pub delimiter: Option<char>,
    /// Joins a section's steps into the single "Steps" cell.
    pub step_separator: String,
    /// Joins text blocks with an unrecognised title into one trailing step.
    pub note_separator: String,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            delimiter: None,
            step_separator: "\n".to_string(),
            note_separator: " ".to_string(),
        }
    }
}

impl FlattenConfig {
    /// Delimiter byte for `output`: the configured one, else tab for `.tsv`
    /// and comma for everything else.
    pub fn delimiter_for<P: AsRef<Path>>(&self, output: P) -> Result<u8> {
        match self.delimiter {
            Some(c) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(c as u8),
            Some(c) => Err(FlattenError::Config(format!(
                "delimiter must be a single ASCII character other than quote or newline, got {:?}",
                c
            ))),
            None => {
                let is_tsv = output
                    .as_ref()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("tsv"))
                    .unwrap_or(false);
                Ok(if is_tsv { b'\t' } else { b',' })
            }
        }
    }
}
