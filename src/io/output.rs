use crate::constants::output_columns;
use crate::error::{ReclassifierError, Result};
use crate::models::{OutputRow, Record};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Write the augmented table to `path`, replacing any existing file.
///
/// `rows` must be the aggregation of `records`, index for index.
pub fn write_output(
    path: impl AsRef<Path>,
    header: &[String],
    records: &[Record],
    rows: &[OutputRow],
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        ReclassifierError::Output(format!("cannot create {}: {e}", path.display()))
    })?;
    write_output_to(file, header, records, rows)?;

    info!(path = %path.display(), rows = rows.len(), "💾 Wrote output table");
    Ok(())
}

pub fn write_output_to<W: std::io::Write>(
    writer: W,
    header: &[String],
    records: &[Record],
    rows: &[OutputRow],
) -> Result<()> {
    if records.len() != rows.len() {
        return Err(ReclassifierError::Output(format!(
            "{} records but {} output rows",
            records.len(),
            rows.len()
        )));
    }

    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    let output_error = |e: csv::Error| ReclassifierError::Output(e.to_string());

    let mut header_row: Vec<&str> = header.iter().map(String::as_str).collect();
    header_row.push(output_columns::AUTO_TAXONOMY);
    header_row.push(output_columns::MATCH);
    csv_writer.write_record(&header_row).map_err(output_error)?;

    for (record, row) in records.iter().zip(rows) {
        if record.key() != row.key {
            return Err(ReclassifierError::Output(format!(
                "row for {} does not match record {}",
                row.key,
                record.key()
            )));
        }

        let mut cells = input_cells(record);
        if cells.len() < header.len() {
            cells.resize(header.len(), "");
        }
        cells.push(row.auto_taxonomy.as_deref().unwrap_or_default());
        cells.push(row.matched.as_str());
        csv_writer.write_record(&cells).map_err(output_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| ReclassifierError::Output(e.to_string()))
}

/// The row as it was read, or the canonical seven columns for records built in code.
fn input_cells(record: &Record) -> Vec<&str> {
    if !record.source_cells().is_empty() {
        return record.source_cells().iter().map(String::as_str).collect();
    }

    vec![
        record.brand_code.as_str(),
        record.part_number.as_str(),
        record.current_classification.as_str(),
        record.current_classification_desc.as_deref().unwrap_or_default(),
        record.long_description.as_deref().unwrap_or_default(),
        record.short_description.as_str(),
        record.manual_taxonomy.as_str(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_records_from;
    use crate::orchestration::aggregate;

    fn header() -> Vec<String> {
        ["brand", "part", "code", "code_desc", "long_desc", "short_desc", "manual"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_appends_auto_code_and_match_columns() {
        let mut hit = Record::new("ACME", "P-1", "OLD", None, None, "Bolt", "1:2:3:4");
        hit.assign_auto_taxonomy("1:2:3:4").unwrap();
        let mut miss = Record::new("ACME", "P-2", "OLD", None, None, "Nut", "1:2:3:5");
        miss.assign_auto_taxonomy("9:9:9:9").unwrap();
        let unclassified = Record::new("ACME", "P-3", "OLD", None, None, "Washer", "1:2:3:6");

        let records = vec![hit, miss, unclassified];
        let rows = aggregate(&records);

        let mut buffer = Vec::new();
        write_output_to(&mut buffer, &header(), &records, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "brand,part,code,code_desc,long_desc,short_desc,manual,auto_new_taxonomy,match"
        );
        assert_eq!(lines[1], "ACME,P-1,OLD,,,Bolt,1:2:3:4,1:2:3:4,Yes");
        assert_eq!(lines[2], "ACME,P-2,OLD,,,Nut,1:2:3:5,9:9:9:9,No");
        assert_eq!(lines[3], "ACME,P-3,OLD,,,Washer,1:2:3:6,,No");
    }

    #[test]
    fn test_output_reads_back_as_input() {
        let input = "brand,part,code,code_desc,long_desc,short_desc,manual\n\
                     ACME,P-1,OLD,\"Bolts, nuts\",Long text,Bolt,1:2:3:4\n";
        let table = read_records_from(input.as_bytes()).unwrap();
        let mut records = table.records;
        records[0].assign_auto_taxonomy("1:2:3:4").unwrap();
        let rows = aggregate(&records);

        let mut buffer = Vec::new();
        write_output_to(&mut buffer, &table.header, &records, &rows).unwrap();

        let reread = read_records_from(buffer.as_slice()).unwrap();
        assert_eq!(reread.header.len(), 9);
        assert_eq!(
            reread.records[0].current_classification_desc.as_deref(),
            Some("Bolts, nuts")
        );
        assert_eq!(reread.records[0].manual_taxonomy, "1:2:3:4");
    }

    #[test]
    fn test_extra_input_columns_survive_in_place() {
        let input = "brand,part,code,code_desc,long_desc,short_desc,manual,supplier\n\
                     ACME,P-1,OLD,Desc,Long,Bolt,1:2:3:4,SUP-9\n\
                     ACME,P-2,OLD,Desc,Long,Nut,1:2:3:5\n";
        let table = read_records_from(input.as_bytes()).unwrap();
        let mut records = table.records;
        records[0].assign_auto_taxonomy("1:2:3:4").unwrap();
        records[1].assign_auto_taxonomy("1:2:3:5").unwrap();
        let rows = aggregate(&records);

        let mut buffer = Vec::new();
        write_output_to(&mut buffer, &table.header, &records, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "brand,part,code,code_desc,long_desc,short_desc,manual,supplier,auto_new_taxonomy,match"
        );
        assert_eq!(lines[1], "ACME,P-1,OLD,Desc,Long,Bolt,1:2:3:4,SUP-9,1:2:3:4,Yes");
        // short rows are padded so the new columns stay under their headers
        assert_eq!(lines[2], "ACME,P-2,OLD,Desc,Long,Nut,1:2:3:5,,1:2:3:5,Yes");
    }

    #[test]
    fn test_six_column_input_is_replayed_unchanged() {
        let input = "brand,part,code,long_desc,short_desc,manual\n\
                     ACME,P-1,OLD,Long,Bolt,1:2:3:4\n";
        let table = read_records_from(input.as_bytes()).unwrap();
        let mut records = table.records;
        records[0].assign_auto_taxonomy("1:2:3:4").unwrap();
        let rows = aggregate(&records);

        let mut buffer = Vec::new();
        write_output_to(&mut buffer, &table.header, &records, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "brand,part,code,long_desc,short_desc,manual,auto_new_taxonomy,match"
        );
        assert_eq!(lines[1], "ACME,P-1,OLD,Long,Bolt,1:2:3:4,1:2:3:4,Yes");
    }

    #[test]
    fn test_mismatched_rows_are_rejected() {
        let records = vec![Record::new("ACME", "P-1", "OLD", None, None, "Bolt", "1:2:3:4")];
        let err = write_output_to(Vec::new(), &header(), &records, &[]).unwrap_err();
        assert!(matches!(err, ReclassifierError::Output(_)));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![Record::new("ACME", "P-1", "OLD", None, None, "Bolt", "1:2:3:4")];
        let rows = aggregate(&records);

        write_output(&path, &header(), &records, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("ACME,P-1,OLD,,,Bolt,1:2:3:4,,No\n"));
    }
}
