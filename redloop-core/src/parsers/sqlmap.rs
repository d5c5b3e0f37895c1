//! Tag extraction from summarized sqlmap output
//!
//! The sqlmap summarizer appends uppercase `TAG:` markers to its summaries;
//! these drive the assessment phase machine.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[allow(clippy::expect_used)] // Static initialization with hardcoded regex
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"TAG:([A-Z_]+)").expect("Hardcoded tag regex should be valid"));

/// Signal tags the summarizer may attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryTag {
    Injectable,
    NotInjectable,
    DbEnumAvailable,
    DataExtracted,
    Error,
}

impl SummaryTag {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "INJECTABLE" => Some(Self::Injectable),
            "NOT_INJECTABLE" => Some(Self::NotInjectable),
            "DB_ENUM_AVAILABLE" => Some(Self::DbEnumAvailable),
            "DATA_EXTRACTED" => Some(Self::DataExtracted),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Extract known tags from a summary; unknown tags are ignored
pub fn extract_tags(summary: &str) -> Vec<SummaryTag> {
    TAG_RE
        .captures_iter(summary)
        .filter_map(|c| SummaryTag::from_name(&c[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_tag() {
        let summary = "Parameter id is injectable via boolean-based blind. TAG:INJECTABLE";
        assert_eq!(extract_tags(summary), vec![SummaryTag::Injectable]);
    }

    #[test]
    fn test_extract_multiple_tags() {
        let summary = "DBMS is MySQL 8.0, databases enumerated.\nTAG:INJECTABLE TAG:DB_ENUM_AVAILABLE";
        assert_eq!(
            extract_tags(summary),
            vec![SummaryTag::Injectable, SummaryTag::DbEnumAvailable]
        );
    }

    #[test]
    fn test_unknown_tags_ignored() {
        assert!(extract_tags("TAG:MADE_UP nothing here").is_empty());
    }

    #[test]
    fn test_no_tags() {
        assert!(extract_tags("No actionable findings.").is_empty());
    }

    #[test]
    fn test_error_tag() {
        assert_eq!(
            extract_tags("sqlmap aborted, connection reset. TAG:ERROR"),
            vec![SummaryTag::Error]
        );
    }
}
