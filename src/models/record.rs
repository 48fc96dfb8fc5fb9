//! Product record model.

use crate::error::{ReclassifierError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a record: brand code plus part number.
///
/// Uniqueness across a batch is assumed, not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub brand_code: String,
    pub part_number: String,
}

impl RecordKey {
    pub fn new(brand_code: impl Into<String>, part_number: impl Into<String>) -> Self {
        Self {
            brand_code: brand_code.into(),
            part_number: part_number.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.brand_code, self.part_number)
    }
}

/// One product to classify.
///
/// Created once per input row. `auto_taxonomy` starts unset and is assigned
/// at most once, by the orchestrator, after the record's unit of work ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub brand_code: String,
    pub part_number: String,
    pub current_classification: String,
    pub current_classification_desc: Option<String>,
    pub long_description: Option<String>,
    pub short_description: String,
    pub manual_taxonomy: String,
    auto_taxonomy: Option<String>,
    /// Every cell of the input row as read, including columns the reclassifier ignores
    #[serde(default)]
    source_cells: Vec<String>,
}

impl Record {
    /// Build a record; the manual taxonomy code is trimmed.
    pub fn new(
        brand_code: impl Into<String>,
        part_number: impl Into<String>,
        current_classification: impl Into<String>,
        current_classification_desc: Option<String>,
        long_description: Option<String>,
        short_description: impl Into<String>,
        manual_taxonomy: impl AsRef<str>,
    ) -> Self {
        Self {
            brand_code: brand_code.into(),
            part_number: part_number.into(),
            current_classification: current_classification.into(),
            current_classification_desc,
            long_description,
            short_description: short_description.into(),
            manual_taxonomy: manual_taxonomy.as_ref().trim().to_string(),
            auto_taxonomy: None,
            source_cells: Vec::new(),
        }
    }

    /// Attach the raw input row so output can replay it unchanged.
    pub fn with_source_cells(mut self, cells: Vec<String>) -> Self {
        self.source_cells = cells;
        self
    }

    /// Raw input row; empty for records not read from a table.
    pub fn source_cells(&self) -> &[String] {
        &self.source_cells
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.brand_code, &self.part_number)
    }

    pub fn auto_taxonomy(&self) -> Option<&str> {
        self.auto_taxonomy.as_deref()
    }

    pub fn is_classified(&self) -> bool {
        self.auto_taxonomy.is_some()
    }

    /// Assign the automatically determined code. A second assignment is an error.
    pub fn assign_auto_taxonomy(&mut self, code: impl Into<String>) -> Result<()> {
        if let Some(existing) = &self.auto_taxonomy {
            return Err(ReclassifierError::Orchestration(format!(
                "record {} already classified as '{existing}'",
                self.key()
            )));
        }
        self.auto_taxonomy = Some(code.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record::new("ACME", "P-100", "OLD", None, None, "Bolt", "  10:20:30:40 \t")
    }

    #[test]
    fn test_manual_taxonomy_is_trimmed() {
        assert_eq!(record().manual_taxonomy, "10:20:30:40");
    }

    #[test]
    fn test_key_display() {
        assert_eq!(record().key().to_string(), "ACME:P-100");
    }

    #[test]
    fn test_auto_taxonomy_is_write_once() {
        let mut record = record();
        assert!(!record.is_classified());

        record.assign_auto_taxonomy("10:20:30:40").unwrap();
        assert_eq!(record.auto_taxonomy(), Some("10:20:30:40"));

        let err = record.assign_auto_taxonomy("A:B:C:D").unwrap_err();
        assert!(matches!(err, ReclassifierError::Orchestration(_)));
        assert_eq!(record.auto_taxonomy(), Some("10:20:30:40"));
    }
}
