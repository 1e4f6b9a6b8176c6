//! First-person result claims ("we increased their sales by 40%")

use super::{ComplianceRule, Replacement};
use crate::patterns::base_verb;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use shared_types::{IssueCategory, Severity};

const RATIONALE: &str = "Results must be attributed to industry data, not claimed as our own outcomes";

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map(|m| m.as_str()).unwrap_or_default()
}

fn helped_increase(caps: &Captures<'_>) -> String {
    format!(
        "industry data shows {} can {} {}",
        group(caps, 1),
        base_verb(group(caps, 2)),
        group(caps, 3)
    )
}

fn we_increased(caps: &Captures<'_>) -> String {
    format!(
        "industry examples show it is possible to {} {}",
        base_verb(group(caps, 1)),
        group(caps, 2)
    )
}

fn increased_by(caps: &Captures<'_>) -> String {
    format!(
        "could {} {} by up to {}, based on industry examples",
        base_verb(group(caps, 1)),
        group(caps, 2),
        group(caps, 3)
    )
}

fn clients_see(caps: &Captures<'_>) -> String {
    format!(
        "industry research suggests pubs can typically {}",
        base_verb(group(caps, 1))
    )
}

fn approaches_can(caps: &Captures<'_>) -> String {
    format!("these approaches can {}", base_verb(group(caps, 1)))
}

lazy_static! {
    pub static ref DIRECT_RESULT_RULES: Vec<ComplianceRule> = vec![
        ComplianceRule {
            id: "D1",
            category: IssueCategory::DirectResults,
            severity: Severity::High,
            pattern: Regex::new(
                r"(?i)\bwe(?:['’]ve|\s+have)?\s+helped\s+((?:(?:many|hundreds\s+of|dozens\s+of|countless|numerous|other)\s+)?(?:pubs|venues|clients|licensees|landlords|publicans|operators|businesses))\s+(increase|boost|grow|improve|double|triple)\s+(?:their\s+)?(revenue|sales|profits?|turnover|footfall|takings|covers|bookings|margins|trade)\b"
            )
            .unwrap(),
            replacement: Replacement::Computed(helped_increase),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "D2",
            category: IssueCategory::DirectResults,
            severity: Severity::High,
            pattern: Regex::new(
                r"(?i)\bwe(?:['’]ve|\s+have)?\s+(increased|grew|boosted|improved|doubled|tripled|delivered|achieved)\s+(?:their|its|the|his|her)\s+(revenue|sales|profits?|turnover|footfall|takings|covers|bookings|margins|trade)\b"
            )
            .unwrap(),
            replacement: Replacement::Computed(we_increased),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "D3",
            category: IssueCategory::DirectResults,
            severity: Severity::High,
            pattern: Regex::new(
                r"(?i)\b(increased|grew|boosted|improved|raised|lifted)\s+([a-z][a-z\s-]{0,30}?)\s+by\s+(\d+(?:\.\d+)?%)"
            )
            .unwrap(),
            replacement: Replacement::Computed(increased_by),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
        ComplianceRule {
            id: "D4",
            category: IssueCategory::DirectResults,
            severity: Severity::High,
            pattern: Regex::new(
                r"(?i)\bour\s+clients\s+(?:typically\s+|usually\s+|often\s+|regularly\s+)?(see|saw|achieve|achieved|get|got|report|reported)\b"
            )
            .unwrap(),
            replacement: Replacement::Computed(clients_see),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &["one of", "some of", "many of", "all of", "most of"],
        },
        ComplianceRule {
            id: "D5",
            category: IssueCategory::DirectResults,
            severity: Severity::High,
            pattern: Regex::new(
                r"(?i)\b(?:our|my)\s+(?:strategies|systems|methods|approach(?:es)?|techniques)\s+(?:have\s+|has\s+)?(increased|boosted|doubled|tripled|transformed|improved|grown|grew|delivered)\b"
            )
            .unwrap(),
            replacement: Replacement::Computed(approaches_can),
            rationale: RATIONALE,
            exclusions: &[],
            not_after: &[],
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rewrite(id: &str, text: &str) -> String {
        let rule = DIRECT_RESULT_RULES.iter().find(|rule| rule.id == id).unwrap();
        rule.pattern
            .replace_all(text, |caps: &Captures<'_>| rule.replacement.expand(caps))
            .into_owned()
    }

    #[test]
    fn test_helped_increase() {
        assert_eq!(
            rewrite("D1", "We've helped many pubs increase revenue."),
            "industry data shows many pubs can increase revenue."
        );
    }

    #[test]
    fn test_we_increased() {
        assert_eq!(
            rewrite("D2", "we grew their footfall"),
            "industry examples show it is possible to grow footfall"
        );
    }

    #[test]
    fn test_increased_by_percentage() {
        assert_eq!(
            rewrite("D3", "It increased Sunday sales by 20% in a month"),
            "It could increase Sunday sales by up to 20%, based on industry examples in a month"
        );
    }

    #[test]
    fn test_clients_see() {
        assert_eq!(
            rewrite("D4", "Our clients typically see a 30% uplift"),
            "industry research suggests pubs can typically see a 30% uplift"
        );
    }

    #[test]
    fn test_outputs_do_not_rematch() {
        for rule in DIRECT_RESULT_RULES.iter() {
            let samples = [
                "industry data shows many pubs can increase revenue",
                "industry examples show it is possible to grow footfall",
                "could increase Sunday sales by up to 20%, based on industry examples",
                "industry research suggests pubs can typically see",
                "these approaches can transform",
            ];
            for sample in samples {
                assert!(!rule.pattern.is_match(sample), "{} matched {:?}", rule.id, sample);
            }
        }
    }
}
