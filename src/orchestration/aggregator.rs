//! Order-preserving projection of classified records into output rows.

use crate::models::{MatchFlag, OutputRow, Record};

/// One row per record, in input order, with the byte-exact match flag.
///
/// Must run after the orchestrator's run has returned; unclassified records
/// yield rows without an auto code and a `No` flag.
pub fn aggregate(records: &[Record]) -> Vec<OutputRow> {
    records
        .iter()
        .map(|record| OutputRow {
            key: record.key(),
            manual_taxonomy: record.manual_taxonomy.clone(),
            auto_taxonomy: record.auto_taxonomy().map(str::to_string),
            matched: MatchFlag::compare(&record.manual_taxonomy, record.auto_taxonomy()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(part: &str, manual: &str, auto: Option<&str>) -> Record {
        let mut record = Record::new("ACME", part, "OLD", None, None, "desc", manual);
        if let Some(auto) = auto {
            record.assign_auto_taxonomy(auto).unwrap();
        }
        record
    }

    #[test]
    fn test_rows_follow_input_order() {
        let records = vec![
            classified("3", "1:1:1:1", Some("1:1:1:1")),
            classified("1", "1:1:1:2", Some("9:9:9:9")),
            classified("2", "1:1:1:3", None),
        ];

        let rows = aggregate(&records);

        let parts: Vec<&str> = rows.iter().map(|r| r.key.part_number.as_str()).collect();
        assert_eq!(parts, vec!["3", "1", "2"]);
        assert_eq!(rows[0].matched, MatchFlag::Yes);
        assert_eq!(rows[1].matched, MatchFlag::No);
        assert_eq!(rows[2].matched, MatchFlag::No);
        assert_eq!(rows[2].auto_taxonomy, None);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }
}
