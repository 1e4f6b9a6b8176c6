//! Real-sounding pub names
//!
//! Naming a common pub ("The Red Lion") in a success story reads as a claim
//! about a real venue. Names are swapped for a generic description unless the
//! surrounding text makes clear the pub is hypothetical.

use super::{ComplianceRule, Replacement};
use crate::patterns::HYPOTHETICAL_KEYWORDS;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use shared_types::{IssueCategory, Severity};

/// Common pub names and the description used instead
pub const PUB_NAMES: &[(&str, &str)] = &[
    ("Red Lion", "a traditional pub"),
    ("Crown", "a town-centre pub"),
    ("Crown and Anchor", "a town-centre pub"),
    ("Rose and Crown", "a traditional pub"),
    ("Royal Oak", "a village pub"),
    ("White Hart", "a country inn"),
    ("White Horse", "a country pub"),
    ("Black Horse", "a country pub"),
    ("White Lion", "a traditional pub"),
    ("Golden Lion", "a traditional pub"),
    ("Black Bull", "a market-town pub"),
    ("Bull", "a market-town pub"),
    ("Swan", "a riverside pub"),
    ("Black Swan", "a riverside pub"),
    ("Plough", "a rural pub"),
    ("Bell", "a local pub"),
    ("Six Bells", "a village pub"),
    ("Old Bell", "a historic inn"),
    ("King's Head", "a high-street pub"),
    ("Queen's Head", "a high-street pub"),
    ("King's Arms", "a high-street pub"),
    ("Queen's Arms", "a high-street pub"),
    ("Nag's Head", "a local pub"),
    ("Ship", "a waterside pub"),
    ("Ship Inn", "a waterside pub"),
    ("Wheatsheaf", "a country pub"),
    ("Fox", "a country pub"),
    ("Fox and Hounds", "a country pub"),
    ("Hare and Hounds", "a country pub"),
    ("Dog and Duck", "a village pub"),
    ("Coach and Horses", "a coaching inn"),
    ("Horse and Groom", "a coaching inn"),
    ("New Inn", "a local inn"),
    ("Railway", "a station pub"),
    ("Railway Tavern", "a station pub"),
    ("Green Man", "a village pub"),
    ("Cross Keys", "a local pub"),
    ("Chequers", "a village pub"),
    ("Feathers", "a market-town pub"),
    ("Woolpack", "a country pub"),
    ("Cricketers", "a village pub"),
    ("Three Horseshoes", "a village pub"),
    ("Fleece", "a country inn"),
    ("Greyhound", "a local pub"),
    ("Half Moon", "a local pub"),
    ("Rising Sun", "a local pub"),
    ("Mitre", "a city pub"),
    ("Bricklayer's Arms", "a community pub"),
    ("Carpenter's Arms", "a community pub"),
    ("Mason's Arms", "a community pub"),
    ("Blacksmith's Arms", "a village pub"),
    ("Prince of Wales", "a traditional pub"),
    ("Duke of York", "a traditional pub"),
    ("Marquis of Granby", "a traditional pub"),
    ("Lord Nelson", "a traditional pub"),
    ("Jolly Sailor", "a waterside pub"),
    ("Traveller's Rest", "a roadside pub"),
    ("Windmill", "a local pub"),
    ("Grapes", "a city pub"),
    ("Eight Bells", "a village pub"),
];

/// Fallback when a matched name is somehow missing from the dictionary
const GENERIC_PUB: &str = "a local pub";

/// Lookup form: no apostrophes, `&` spelled out, single spaces, lower case
fn normalize_name(name: &str) -> String {
    name.replace(&['\'', '’'][..], "")
        .replace('&', " and ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Regex fragment for one name: optional apostrophes, `and` or `&`,
/// flexible whitespace
fn name_fragment(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            if word == "and" {
                "(?:and|&)".to_string()
            } else {
                regex::escape(word).replace('\'', "['’]?")
            }
        })
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn pub_name_pattern() -> String {
    let mut names: Vec<&str> = PUB_NAMES.iter().map(|(name, _)| *name).collect();
    // Longest first so "Crown and Anchor" wins over "Crown"
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    let alternation = names
        .into_iter()
        .map(name_fragment)
        .collect::<Vec<_>>()
        .join("|");
    format!(r"\b[Tt]he\s+({})(?:\s+(?:Inn|Hotel|Tavern|Pub))?\b", alternation)
}

/// Generic description for a matched pub name
pub fn generic_description(name: &str) -> &'static str {
    let wanted = normalize_name(name);
    PUB_NAMES
        .iter()
        .find(|(candidate, _)| normalize_name(candidate) == wanted)
        .map(|(_, description)| *description)
        .unwrap_or(GENERIC_PUB)
}

fn replace_pub_name(caps: &Captures<'_>) -> String {
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    generic_description(name).to_string()
}

lazy_static! {
    pub static ref PUB_NAME_RULES: Vec<ComplianceRule> = vec![ComplianceRule {
        id: "P1",
        category: IssueCategory::PubName,
        severity: Severity::High,
        pattern: Regex::new(&pub_name_pattern()).unwrap(),
        replacement: Replacement::Computed(replace_pub_name),
        rationale: "Named pubs read as real client venues; only the flagship pub may be named",
        exclusions: HYPOTHETICAL_KEYWORDS,
        not_after: &[],
    }];
}
