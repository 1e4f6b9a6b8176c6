//! Declarative claim-rule table
//!
//! Each category lives in its own module as a `lazy_static` table. [`RULES`]
//! chains them in declaration order, which is also application order.

pub mod case_study;
pub mod client_numbers;
pub mod direct_results;
pub mod experience;
pub mod pub_names;
pub mod subtle;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use shared_types::{IssueCategory, Severity};
use std::fmt;

/// How a match is rewritten
#[derive(Clone, Copy)]
pub enum Replacement {
    /// `${n}` capture template
    Template(&'static str),
    Computed(fn(&Captures<'_>) -> String),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl Replacement {
    pub fn expand(&self, caps: &Captures<'_>) -> String {
        match self {
            Replacement::Template(template) => {
                let mut out = String::new();
                caps.expand(template, &mut out);
                out
            }
            Replacement::Computed(build) => build(caps),
        }
    }
}

#[derive(Debug)]
pub struct ComplianceRule {
    pub id: &'static str,
    pub category: IssueCategory,
    pub severity: Severity,
    pub pattern: Regex,
    pub replacement: Replacement,
    pub rationale: &'static str,
    /// Context keywords that make the match legitimate for this rule only
    pub exclusions: &'static [&'static str],
    /// Skip the match when the text right before it ends with one of these
    pub not_after: &'static [&'static str],
}

impl ComplianceRule {
    /// Rule-specific suppression. `context` is lower-cased.
    pub fn is_excluded(&self, context: &str, preceding: &str) -> bool {
        if self.exclusions.iter().any(|keyword| context.contains(keyword)) {
            return true;
        }
        let preceding = preceding.trim_end().to_lowercase();
        self.not_after
            .iter()
            .any(|phrase| preceding.ends_with(phrase))
    }
}

lazy_static! {
    /// Every rule, in application order
    pub static ref RULES: Vec<&'static ComplianceRule> = pub_names::PUB_NAME_RULES
        .iter()
        .chain(client_numbers::CLIENT_NUMBER_RULES.iter())
        .chain(direct_results::DIRECT_RESULT_RULES.iter())
        .chain(experience::EXPERIENCE_RULES.iter())
        .chain(case_study::CASE_STUDY_RULES.iter())
        .chain(subtle::SUBTLE_RULES.iter())
        .collect();
}
