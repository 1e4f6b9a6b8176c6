//! Keyword lists and context helpers shared by the claim rules

/// Characters of context taken on each side of a match
pub const CONTEXT_RADIUS: usize = 75;

/// The business's own verified case and people. A match near any of these is
/// about the real flagship pub, not a fabricated claim.
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "the anchor",
    "orange jelly",
    "stanwell moor",
    "peter pitcher",
    "billy summers",
];

/// Phrases showing the claim is already attributed to outside evidence
pub const QUALIFIER_PHRASES: &[&str] = &[
    "industry data",
    "industry research",
    "industry example",
    "industry benchmark",
    "research shows",
    "research suggests",
    "studies show",
    "according to",
];

/// Pub names used as illustrations rather than real venues
pub const HYPOTHETICAL_KEYWORDS: &[&str] = &[
    "example",
    "hypothetical",
    "imagine",
    "typical",
    "for instance",
    "fictional",
    "let's say",
    "let’s say",
];

/// Allow-list keywords, lower-cased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    keywords: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            keywords: Vec::new(),
        };
        list.extend(keywords);
        list
    }

    /// Add keywords, skipping blanks and duplicates
    pub fn extend<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// `context` must already be lower-cased
    pub fn matches(&self, context: &str) -> bool {
        self.keywords.iter().any(|keyword| context.contains(keyword.as_str()))
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW_LIST)
    }
}

/// Check if lower-cased text contains any keyword
pub fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text_lower.contains(keyword))
}

/// Lower-cased text around `start..end`, widened to char boundaries
pub fn context_window(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(CONTEXT_RADIUS);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_RADIUS).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }
    text[from..to].to_lowercase()
}

/// Whether `offset` begins a sentence: start of text or line, or after
/// terminal punctuation.
pub fn is_sentence_start(text: &str, offset: usize) -> bool {
    let before = text[..offset].trim_end_matches(&[' ', '\t'][..]);
    before.is_empty() || before.ends_with(&['.', '!', '?', '\n'][..])
}

/// Upper- or lower-case the first letter of a replacement
pub fn sentence_case(replacement: &str, capitalize: bool) -> String {
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if capitalize => first.to_uppercase().chain(chars).collect(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Base form of the result verbs the rules recognise
pub fn base_verb(verb: &str) -> String {
    let verb = verb.to_lowercase();
    let base = match verb.as_str() {
        "increased" => "increase",
        "grew" | "grown" => "grow",
        "boosted" => "boost",
        "improved" => "improve",
        "doubled" => "double",
        "tripled" => "triple",
        "delivered" => "deliver",
        "achieved" => "achieve",
        "transformed" => "transform",
        "raised" => "raise",
        "lifted" => "lift",
        "saw" | "seen" => "see",
        "got" => "get",
        "reported" => "report",
        other => return other.to_string(),
    };
    base.to_string()
}
