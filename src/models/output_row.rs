//! Aggregated output rows and the match flag.

use super::record::RecordKey;
use crate::constants::match_flag;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFlag {
    Yes,
    No,
}

impl MatchFlag {
    /// Byte-exact comparison; an unset auto code never matches.
    pub fn compare(manual: &str, auto: Option<&str>) -> Self {
        match auto {
            Some(auto) if auto == manual => MatchFlag::Yes,
            _ => MatchFlag::No,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFlag::Yes => match_flag::YES,
            MatchFlag::No => match_flag::NO,
        }
    }

    pub fn is_match(&self) -> bool {
        *self == MatchFlag::Yes
    }
}

impl fmt::Display for MatchFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub key: RecordKey,
    pub manual_taxonomy: String,
    pub auto_taxonomy: Option<String>,
    pub matched: MatchFlag,
}

/// Match counts across an aggregated batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Rows whose auto code was never assigned (also counted as unmatched)
    pub unclassified: usize,
}

impl MatchSummary {
    pub fn from_rows(rows: &[OutputRow]) -> Self {
        let matched = rows.iter().filter(|row| row.matched.is_match()).count();
        let unclassified = rows.iter().filter(|row| row.auto_taxonomy.is_none()).count();
        Self {
            total: rows.len(),
            matched,
            unmatched: rows.len() - matched,
            unclassified,
        }
    }

    /// Fraction of rows whose auto code equals the manual code; 0.0 for an empty batch
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}
