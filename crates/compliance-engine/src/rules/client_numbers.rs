//! Client-count claims ("hundreds of pubs", "over 200 venues")

use super::{ComplianceRule, Replacement};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{IssueCategory, Severity};

const RATIONALE: &str = "Client counts cannot be verified; only one venue may be cited as direct experience";

lazy_static! {
    pub static ref CLIENT_NUMBER_RULES: Vec<ComplianceRule> = vec![
        ComplianceRule {
            id: "N1",
            category: IssueCategory::ClientNumbers,
            severity: Severity::High,
            pattern: Regex::new(
                r"(?i)\b(?:hundreds|thousands|dozens|scores)\s+of\s+(pubs|venues|clients|licensees|landlords|publicans|operators|businesses)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("many ${1}"),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "N2",
            category: IssueCategory::ClientNumbers,
            severity: Severity::High,
            pattern: Regex::new(
                r"(?i)\b(?:over|more\s+than|nearly|almost|around|about)\s+\d[\d,]+\+?\s+(pubs|venues|clients|licensees|landlords|publicans|operators|businesses)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("many ${1}"),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "N3",
            category: IssueCategory::ClientNumbers,
            severity: Severity::High,
            pattern: Regex::new(
                r"(?i)\b\d[\d,]+\+\s+(pubs|venues|clients|licensees|landlords|publicans|operators|businesses)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("many ${1}"),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
    ];
}
