//! Experience claims implying a large client base

use super::{ComplianceRule, Replacement};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{IssueCategory, Severity};

lazy_static! {
    pub static ref EXPERIENCE_RULES: Vec<ComplianceRule> = vec![
        ComplianceRule {
            id: "E1",
            category: IssueCategory::ExperienceClaims,
            severity: Severity::Medium,
            pattern: Regex::new(
                r"(?i)\bwe(?:['’]ve|\s+have)\s+(?:worked\s+with|partnered\s+with|helped)\s+(?:(?:many|hundreds\s+of|dozens\s+of|countless|numerous|lots\s+of|so\s+many)\s+)?(pubs|venues|licensees|landlords|publicans|operators|clients)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("we've studied what works for ${1}"),
            rationale: "Working with many venues is unverified; describe research instead",
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "E2",
            category: IssueCategory::ExperienceClaims,
            severity: Severity::Medium,
            pattern: Regex::new(
                r"(?i)\b(?:\d+\+?\s+)?(?:years|decades)\s+of\s+experience\s+(?:helping|working\s+with|advising)\s+(?:pubs|venues|licensees|landlords|publicans|operators|clients)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("hands-on experience running our own pub"),
            rationale: "Experience is from running one pub, not from advising many",
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "E3",
            category: IssueCategory::ExperienceClaims,
            severity: Severity::Medium,
            pattern: Regex::new(
                r"(?i)\bwe(?:['’]ve|\s+have)\s+seen\s+(?:it|this)\s+(?:work|happen)\s+(?:in|at|for|across)\s+(?:many|countless|hundreds\s+of|dozens\s+of|numerous)\s+(pubs|venues)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("this approach is widely used across ${1}"),
            rationale: "Observed outcomes across many venues are unverified",
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "E4",
            category: IssueCategory::ExperienceClaims,
            severity: Severity::Medium,
            pattern: Regex::new(
                r"(?i)\bevery\s+(pub|venue|licensee|landlord)\s+we(?:['’]ve|\s+have)?\s+(?:worked\s+with|helped|advised)\b"
            )
            .unwrap(),
            replacement: Replacement::Template("a typical ${1}"),
            rationale: "Claims about every client imply a verified client base",
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "E5",
            category: IssueCategory::ExperienceClaims,
            severity: Severity::Medium,
            pattern: Regex::new(r"(?i)\b(?:our|my)\s+(?:proven\s+)?track\s+record\b").unwrap(),
            replacement: Replacement::Template("industry evidence"),
            rationale: "A track record across clients cannot be evidenced",
            exclusions: &[],
            not_after: &[],
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(id: &str, text: &str) -> String {
        let rule = EXPERIENCE_RULES.iter().find(|rule| rule.id == id).unwrap();
        rule.pattern
            .replace_all(text, |caps: &regex::Captures<'_>| rule.replacement.expand(caps))
            .into_owned()
    }

    #[test]
    fn test_worked_with() {
        assert_eq!(
            rewrite("E1", "we've worked with dozens of landlords"),
            "we've studied what works for landlords"
        );
        assert_eq!(rewrite("E1", "We have helped pubs"), "we've studied what works for pubs");
    }

    #[test]
    fn test_years_of_experience() {
        assert_eq!(
            rewrite("E2", "With 20 years of experience helping pubs"),
            "With hands-on experience running our own pub"
        );
    }

    #[test]
    fn test_every_pub() {
        assert_eq!(rewrite("E4", "Every pub we've worked with grew"), "a typical pub grew");
    }

    #[test]
    fn test_track_record() {
        assert_eq!(rewrite("E5", "our proven track record"), "industry evidence");
    }
}
