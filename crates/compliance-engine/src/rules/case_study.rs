//! Case-study framing around unnamed clients

use super::{ComplianceRule, Replacement};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{IssueCategory, Severity};

const RATIONALE: &str = "Case studies imply verified client work; present as an illustrative example";

lazy_static! {
    pub static ref CASE_STUDY_RULES: Vec<ComplianceRule> = vec![
        ComplianceRule {
            id: "C1",
            category: IssueCategory::CaseStudy,
            severity: Severity::Medium,
            pattern: Regex::new(
                r"(?i)\bone\s+of\s+our\s+(?:clients|client\s+pubs|pubs|licensees|landlords|customers)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("one example pub"),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "C2",
            category: IssueCategory::CaseStudy,
            severity: Severity::Medium,
            pattern: Regex::new(r"(?i)\b(?:a|another)\s+(?:client|customer)\s+of\s+ours\b").unwrap(),
            replacement: Replacement::Template("a typical pub"),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "C3",
            category: IssueCategory::CaseStudy,
            severity: Severity::Medium,
            pattern: Regex::new(r"(?i)\b(?:client\s+)?case\s+study\s*:").unwrap(),
            replacement: Replacement::Template("Industry example:"),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "C4",
            category: IssueCategory::CaseStudy,
            severity: Severity::Medium,
            pattern: Regex::new(
                r"(?i)\b(?:a|one)\s+pub\s+we\s+(?:worked\s+with|helped|advised)\s+(in|near|outside)\s+"
            )
            .unwrap(),
            replacement: Replacement::Template("a pub ${1} "),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
    ];
}
