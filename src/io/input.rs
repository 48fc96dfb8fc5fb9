use crate::constants::INPUT_COLUMN_COUNT;
use crate::error::{ReclassifierError, Result};
use crate::models::Record;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Column layout, chosen from the header width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLayout {
    /// Seven leading columns; anything after them is carried through untouched
    Standard,
    /// Six columns: no current classification description
    WithoutCurrentDescription,
}

impl InputLayout {
    pub fn from_header_width(width: usize) -> Result<Self> {
        match width {
            w if w >= INPUT_COLUMN_COUNT => Ok(InputLayout::Standard),
            w if w == INPUT_COLUMN_COUNT - 1 => Ok(InputLayout::WithoutCurrentDescription),
            w => Err(ReclassifierError::Input(format!(
                "header has {w} columns, expected {INPUT_COLUMN_COUNT} (or {} without the current classification description)",
                INPUT_COLUMN_COUNT - 1
            ))),
        }
    }

    /// Cells a data row must carry
    pub fn width(&self) -> usize {
        match self {
            InputLayout::Standard => INPUT_COLUMN_COUNT,
            InputLayout::WithoutCurrentDescription => INPUT_COLUMN_COUNT - 1,
        }
    }
}

/// Parsed input: the header as read, and one record per data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTable {
    pub header: Vec<String>,
    pub layout: InputLayout,
    pub records: Vec<Record>,
}

pub fn read_records(path: impl AsRef<Path>) -> Result<InputTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ReclassifierError::Input(format!("cannot open {}: {e}", path.display()))
    })?;
    let table = read_records_from(file)?;

    info!(
        path = %path.display(),
        records = table.records.len(),
        layout = ?table.layout,
        "📥 Loaded input records"
    );
    Ok(table)
}

pub fn read_records_from<R: std::io::Read>(reader: R) -> Result<InputTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();
    let layout = InputLayout::from_header_width(header.len())?;

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        // header is line 1
        let line = row
            .position()
            .map(|position| position.line())
            .unwrap_or(index as u64 + 2);

        if row.len() < layout.width() {
            return Err(ReclassifierError::Input(format!(
                "line {line}: expected {} columns, found {}",
                layout.width(),
                row.len()
            )));
        }

        let cell = |column: usize| row.get(column).unwrap_or_default();
        let optional = |column: usize| {
            let value = cell(column);
            (!value.trim().is_empty()).then(|| value.to_string())
        };

        let record = match layout {
            InputLayout::Standard => Record::new(
                cell(0),
                cell(1),
                cell(2),
                optional(3),
                optional(4),
                cell(5),
                cell(6),
            ),
            InputLayout::WithoutCurrentDescription => Record::new(
                cell(0),
                cell(1),
                cell(2),
                None,
                optional(3),
                cell(4),
                cell(5),
            ),
        };
        records.push(record.with_source_cells(row.iter().map(str::to_string).collect()));
    }

    Ok(InputTable {
        header,
        layout,
        records,
    })
}
