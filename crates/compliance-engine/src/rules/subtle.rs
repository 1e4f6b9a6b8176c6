//! Softer wording that still implies proven client results

use super::{ComplianceRule, Replacement};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{IssueCategory, Severity};

lazy_static! {
    pub static ref SUBTLE_RULES: Vec<ComplianceRule> = vec![
        ComplianceRule {
            id: "S1",
            category: IssueCategory::SubtleClaims,
            severity: Severity::Low,
            pattern: Regex::new(
                r"(?i)\b(?:proven|tested)\s+(?:with|across|by|in)\s+(?:many|hundreds\s+of|dozens\s+of|countless|real)\s+(pubs|venues|licensees|operators)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("built for ${1}"),
            rationale: "Testing across many venues is unverified",
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "S2",
            category: IssueCategory::SubtleClaims,
            severity: Severity::Low,
            pattern: Regex::new(
                r"(?i)\b(?:battle|field)[\s-]tested\s+(strategies|systems|methods|tactics|techniques)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("practical ${1}"),
            rationale: "Field-tested implies repeated client deployments",
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "S3",
            category: IssueCategory::SubtleClaims,
            severity: Severity::Low,
            pattern: Regex::new(r"(?i)\bour\s+(?:client\s+pubs|pub\s+clients|partner\s+pubs)\b").unwrap(),
            replacement: Replacement::Template("pubs"),
            rationale: "Implies a roster of client venues",
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "S4",
            category: IssueCategory::SubtleClaims,
            severity: Severity::Low,
            pattern: Regex::new(r"(?i)\b(?:client|customer)\s+success\s+stories\b").unwrap(),
            replacement: Replacement::Template("industry success stories"),
            rationale: "Success stories must not be presented as our clients'",
            exclusions: &[],
            not_after: &[],
        },
    ];
}
