//! Keyword-overlap similarity between post descriptions.
//!
//! Best-effort only: two posts about the same idea written with different
//! vocabulary score zero.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use lattice_shared::CrossLinkConfig;

/// Common English words that carry no topical signal.
const BUILTIN_STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "always", "among", "another", "because",
    "been", "before", "being", "below", "between", "both", "cannot", "could", "does", "doing",
    "down", "during", "each", "even", "every", "ever", "from", "further", "have", "having", "here",
    "how", "into", "itself", "just", "least", "less", "like", "made", "make", "many", "more",
    "most", "much", "must", "never", "often", "only", "other", "ought", "over", "own", "same",
    "should", "since", "some", "still", "such", "than", "that", "their", "them", "then", "there",
    "these", "they", "thing", "things", "this", "those", "through", "under", "until", "upon",
    "very", "want", "what", "when", "where", "which", "while", "whom", "whose", "will", "with",
    "within", "without", "would", "your", "yours", "yourself",
];

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("word regex"));

/// Extracts the significant words of a text.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    min_word_len: usize,
    stopwords: HashSet<String>,
}

impl KeywordExtractor {
    /// Built-in stopwords plus the configured extras.
    pub fn new(config: &CrossLinkConfig) -> Self {
        let stopwords = BUILTIN_STOPWORDS
            .iter()
            .map(|w| (*w).to_string())
            .chain(config.stopwords.iter().map(|w| w.trim().to_lowercase()))
            .collect();

        Self {
            min_word_len: config.min_word_len,
            stopwords,
        }
    }

    /// Distinct lowercase words long enough to matter, minus stopwords and numbers.
    pub fn keywords(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        WORD_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| w.len() >= self.min_word_len)
            .filter(|w| !w.bytes().all(|b| b.is_ascii_digit()))
            .filter(|w| !self.stopwords.contains(*w))
            .map(str::to_string)
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(&CrossLinkConfig::default())
    }
}

/// Jaccard ratio `|a ∩ b| / |a ∪ b|`; `0.0` when either set is empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    let union = a.len() + b.len() - shared;
    shared as f64 / union as f64
}

/// Similarity of two texts in `0.0..=1.0`.
pub fn similarity(a: &str, b: &str, extractor: &KeywordExtractor) -> f64 {
    jaccard(&extractor.keywords(a), &extractor.keywords(b))
}
