//! Property-based tests for the policy-claim rewriter

use compliance_engine::ComplianceEngine;
use proptest::prelude::*;

/// Phrases the rules target, mixed with neutral filler
fn phrase() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("We've helped hundreds of pubs increase revenue".to_string()),
        Just("we grew their footfall".to_string()),
        Just("The Red Lion".to_string()),
        Just("the Rose & Crown".to_string()),
        Just("The Anchor".to_string()),
        Just("increased Sunday sales by 20%".to_string()),
        Just("our clients typically see".to_string()),
        Just("one of our clients".to_string()),
        Just("over 250 venues".to_string()),
        Just("our proven track record".to_string()),
        Just("Case study:".to_string()),
        Just("battle-tested systems".to_string()),
        Just("industry research shows".to_string()),
        Just("imagine".to_string()),
        "[a-z]{2,9}",
    ]
}

fn sentence() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(phrase(), 1..8),
        prop::sample::select(vec![". ", ", ", " ", "\n"]),
    )
        .prop_map(|(parts, separator)| parts.join(separator))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn rewriting_twice_equals_rewriting_once(text in sentence()) {
        let engine = ComplianceEngine::new();
        let once = engine.rewrite(&text);
        let twice = engine.rewrite(&once.text);
        prop_assert_eq!(&twice.text, &once.text);
        prop_assert!(twice.hits.is_empty());
    }

    #[test]
    fn allow_listed_context_is_never_rewritten(text in sentence()) {
        let engine = ComplianceEngine::new();
        let guarded = format!("At The Anchor: {}", text);
        for hit in engine.scan(&guarded) {
            // anything within the context radius of the allow-listed name is kept
            prop_assert!(hit.offset > compliance_engine::patterns::CONTEXT_RADIUS);
        }
    }

    #[test]
    fn scan_reports_exactly_the_rewrites(text in sentence()) {
        let engine = ComplianceEngine::new();
        let rewrite = engine.rewrite(&text);
        prop_assert_eq!(engine.scan(&text), rewrite.hits.clone());
        prop_assert_eq!(rewrite.changed(), rewrite.text != text);
    }
}
