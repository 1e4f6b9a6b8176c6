use std::fmt;

/// How serious an unverified claim is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// Category of a policy rule
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    PubName,
    ClientNumbers,
    DirectResults,
    ExperienceClaims,
    CaseStudy,
    SubtleClaims,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueCategory::PubName => "PUB_NAME",
            IssueCategory::ClientNumbers => "CLIENT_NUMBERS",
            IssueCategory::DirectResults => "DIRECT_RESULTS",
            IssueCategory::ExperienceClaims => "EXPERIENCE_CLAIMS",
            IssueCategory::CaseStudy => "CASE_STUDY",
            IssueCategory::SubtleClaims => "SUBTLE_CLAIMS",
        };
        f.write_str(label)
    }
}

/// One compliance rewrite, attributed to a document field and block
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub field: String,
    pub block_index: usize,
    pub old_text: String,
    pub new_text: String,
    pub reason: String,
    pub issue_type: IssueCategory,
    pub severity: Severity,
    pub rule_id: String,
}

/// Leaked markdown found by the detector
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownIssue {
    #[serde(flatten)]
    pub kind: MarkdownIssueKind,
    pub block_index: usize,
    pub excerpt: String,
    pub suggested_fix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkdownIssueKind {
    MarkdownHeader { level: u8 },
    MarkdownBold,
}

/// A structural fix applied by the normalizer. `block_index` refers to the
/// block array as it was before normalization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatFix {
    pub block_index: usize,
    #[serde(flatten)]
    pub action: FormatAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FormatAction {
    /// Mixed heading + body block split into two blocks
    SplitHeading { level: u8 },
    /// Whole block restyled as a heading
    RestyledHeading { level: u8 },
    /// Leading `#` characters removed and the block turned into a heading
    HeadingHashes { level: u8, split: bool },
    /// Leading `#` characters removed from a list item or styled block
    HashesStripped { level: u8 },
    /// `**` delimiters removed; `strong_runs` of them became strong marks
    BoldNormalized { stripped_runs: usize, strong_runs: usize },
}

impl FormatAction {
    pub fn label(&self) -> &'static str {
        match self {
            FormatAction::SplitHeading { .. } => "split_heading",
            FormatAction::RestyledHeading { .. } => "restyled_heading",
            FormatAction::HeadingHashes { .. } => "heading_hashes",
            FormatAction::HashesStripped { .. } => "hashes_stripped",
            FormatAction::BoldNormalized { .. } => "bold_normalized",
        }
    }
}
