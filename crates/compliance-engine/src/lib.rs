//! Policy-claim rewriter
//!
//! Scans copy for unverifiable business claims (client counts, first-person
//! results, real pub names) and rewrites them into industry-attributed
//! wording. A match is left alone when its surrounding text mentions the
//! business's own verified case or already credits outside evidence.

pub mod patterns;
pub mod rules;

use patterns::{context_window, contains_any, is_sentence_start, sentence_case, AllowList};
use rules::{ComplianceRule, RULES};
use shared_types::{IssueCategory, Severity};

/// Upper bound on whole-table passes. Replacements never re-match any rule;
/// later passes only pick up matches exposed by neighbouring rewrites or by
/// context windows shifting as text grows.
pub const MAX_PASSES: usize = 8;

/// One rule firing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub rule_id: &'static str,
    pub category: IssueCategory,
    pub severity: Severity,
    pub old_text: String,
    pub new_text: String,
    pub reason: &'static str,
    /// Byte offset of the match once every earlier hit has been applied.
    /// Replaying hits in order over the input reproduces the rewritten text.
    pub offset: usize,
}

/// Rewritten text plus every hit that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub hits: Vec<RuleHit>,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// ComplianceEngine entry point
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    allow_list: AllowList,
}

impl ComplianceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the default allow-list plus `extra` keywords
    pub fn with_allow_list<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allow_list = AllowList::default();
        allow_list.extend(extra);
        Self { allow_list }
    }

    /// Apply every rule, in table order, until nothing more fires
    pub fn rewrite(&self, text: &str) -> Rewrite {
        let mut current = text.to_string();
        let mut hits = Vec::new();
        for _ in 0..MAX_PASSES {
            let pass = self.rewrite_pass(&mut current);
            if pass.is_empty() {
                break;
            }
            hits.extend(pass);
        }
        Rewrite {
            text: current,
            hits,
        }
    }

    /// Report-only: the hits [`rewrite`](Self::rewrite) would make
    pub fn scan(&self, text: &str) -> Vec<RuleHit> {
        self.rewrite(text).hits
    }

    fn rewrite_pass(&self, text: &mut String) -> Vec<RuleHit> {
        let mut hits = Vec::new();
        for rule in RULES.iter() {
            let (rewritten, rule_hits) = self.apply_rule(rule, text);
            if !rule_hits.is_empty() {
                *text = rewritten;
                hits.extend(rule_hits);
            }
        }
        hits
    }

    fn apply_rule(&self, rule: &ComplianceRule, text: &str) -> (String, Vec<RuleHit>) {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut hits = Vec::new();

        for caps in rule.pattern.captures_iter(text) {
            let Some(found) = caps.get(0) else {
                continue;
            };
            if self.is_suppressed(rule, text, found.start(), found.end()) {
                continue;
            }

            let capitalize = is_sentence_start(text, found.start())
                && found.as_str().starts_with(char::is_uppercase);
            let replacement = sentence_case(&rule.replacement.expand(&caps), capitalize);

            out.push_str(&text[last..found.start()]);
            let offset = out.len();
            out.push_str(&replacement);
            last = found.end();

            hits.push(RuleHit {
                rule_id: rule.id,
                category: rule.category,
                severity: rule.severity,
                old_text: found.as_str().to_string(),
                new_text: replacement,
                reason: rule.rationale,
                offset,
            });
        }
        out.push_str(&text[last..]);
        (out, hits)
    }

    fn is_suppressed(&self, rule: &ComplianceRule, text: &str, start: usize, end: usize) -> bool {
        let context = context_window(text, start, end);
        if self.allow_list.matches(&context) {
            tracing::trace!(rule = rule.id, "suppressed by allow-list");
            return true;
        }
        if contains_any(&context, patterns::QUALIFIER_PHRASES) {
            tracing::trace!(rule = rule.id, "suppressed by qualifier phrase");
            return true;
        }
        rule.is_excluded(&context, &text[..start])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_count_and_result_claim() {
        let engine = ComplianceEngine::new();
        let result = engine.rewrite("We've helped hundreds of pubs increase revenue.");

        assert_eq!(result.text, "Industry data shows many pubs can increase revenue.");
        let categories: Vec<IssueCategory> = result.hits.iter().map(|hit| hit.category).collect();
        assert_eq!(
            categories,
            vec![IssueCategory::ClientNumbers, IssueCategory::DirectResults]
        );
        assert_eq!(result.hits[0].old_text, "hundreds of pubs");
        assert_eq!(result.hits[0].severity, Severity::High);
    }

    #[test]
    fn test_allow_listed_business_is_untouched() {
        let engine = ComplianceEngine::new();
        let text = "The Anchor increased Sunday sales by 20%";
        let result = engine.rewrite(text);
        assert_eq!(result.text, text);
        assert!(result.hits.is_empty());
    }

    #[test]
    fn test_extra_allow_list_keyword() {
        let engine = ComplianceEngine::with_allow_list(["the tap room"]);
        let text = "At The Tap Room we increased their covers quickly.";
        assert!(engine.scan(text).is_empty());
        assert!(!ComplianceEngine::new().scan(text).is_empty());
    }

    #[test]
    fn test_qualified_claims_are_left() {
        let engine = ComplianceEngine::new();
        let text = "According to industry research, venues increased food sales by 15%.";
        assert!(engine.scan(text).is_empty());
    }

    #[test]
    fn test_pub_name_rewritten_mid_sentence() {
        let engine = ComplianceEngine::new();
        let result = engine.rewrite("Last spring the team at The Red Lion ran a quiz.");
        assert_eq!(result.text, "Last spring the team at a traditional pub ran a quiz.");
        assert_eq!(result.hits[0].category, IssueCategory::PubName);
    }

    #[test]
    fn test_pub_name_at_sentence_start() {
        let engine = ComplianceEngine::new();
        let result = engine.rewrite("The Crown increased wet sales by 35%.");
        assert_eq!(
            result.text,
            "A town-centre pub could increase wet sales by up to 35%, based on industry examples."
        );
        assert_eq!(result.hits.len(), 2);
    }

    #[test]
    fn test_hypothetical_pub_name_kept() {
        let engine = ComplianceEngine::new();
        let text = "Imagine The Red Lion on a wet Tuesday.";
        assert_eq!(engine.rewrite(text).text, text);
    }

    #[test]
    fn test_whole_word_pub_name() {
        let engine = ComplianceEngine::new();
        let text = "The Bulletin covers trade news.";
        assert!(engine.scan(text).is_empty());
    }

    #[test]
    fn test_one_of_our_clients() {
        let engine = ComplianceEngine::new();
        let result = engine.rewrite("One of our clients saw a big lift.");
        assert_eq!(result.text, "One example pub saw a big lift.");
        assert_eq!(result.hits[0].rule_id, "C1");
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let engine = ComplianceEngine::new();
        let samples = [
            "We've helped hundreds of pubs increase revenue.",
            "Our clients typically see a 30% uplift. Case study: The Plough doubled bookings.",
            "With 20 years of experience helping pubs, our proven track record speaks.",
            "We've worked with over 300 venues and our strategies have transformed trade.",
            "Client success stories from our partner pubs, battle-tested systems included.",
        ];
        for sample in samples {
            let once = engine.rewrite(sample);
            let twice = engine.rewrite(&once.text);
            assert_eq!(twice.text, once.text, "sample {:?}", sample);
            assert!(twice.hits.is_empty(), "sample {:?}: {:?}", sample, twice.hits);
        }
    }

    #[test]
    fn test_hits_replay_in_order() {
        let engine = ComplianceEngine::new();
        let text = "We've helped hundreds of pubs increase revenue. Our clients typically see a 30% uplift.";
        let result = engine.rewrite(text);
        assert!(result.hits.len() >= 2);

        let mut replayed = text.to_string();
        for hit in &result.hits {
            let end = hit.offset + hit.old_text.len();
            assert_eq!(&replayed[hit.offset..end], hit.old_text);
            replayed.replace_range(hit.offset..end, &hit.new_text);
        }
        assert_eq!(replayed, result.text);
    }

    #[test]
    fn test_clean_text_has_no_hits() {
        let engine = ComplianceEngine::new();
        assert!(engine
            .scan("Good beer, warm welcome and a roaring fire make a pub.")
            .is_empty());
    }
}
