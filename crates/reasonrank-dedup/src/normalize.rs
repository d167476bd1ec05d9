//! Claim text normalization
//!
//! Reduces a claim to a sorted set of canonical tokens so that restatements
//! using synonyms, filler words or a negated antonym compare as equal.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

/// Sorted, order-independent set of canonical tokens
pub type TokenSet = BTreeSet<String>;

/// Groups of interchangeable words, including their common inflections.
/// Each group canonicalizes to its lexicographically smallest member.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &[
        "decrease", "decreased", "lower", "lowered", "reduce", "reduced",
    ],
    &[
        "hike", "increase", "increased", "raise", "raised",
    ],
    &["ban", "banned", "forbid", "prohibit", "prohibited"],
    &["allow", "allowed", "enable", "enabled", "permit", "permitted"],
    &["build", "construct", "constructed"],
    &["buy", "purchase", "purchased"],
    &["end", "ended", "stop", "stopped", "terminate", "terminated"],
    &["fix", "fixed", "repair", "repaired", "resolve", "resolved"],
    &["beneficial", "good"],
    &["bad", "detrimental", "harmful"],
    &["clever", "intelligent", "smart"],
    &["foolish", "stupid", "unintelligent"],
    &["fast", "quick", "rapid"],
    &["slow", "sluggish"],
    &["rich", "wealthy"],
    &["impoverished", "poor"],
    &["accurate", "true"],
    &["false", "inaccurate", "incorrect"],
    &["tax", "taxation", "taxes"],
];

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "shall", "should", "may", "might", "must", "can",
    "could", "not", "no", "nor", "so", "yet", "both", "either", "neither", "for", "and", "but",
    "or", "as", "at", "by", "in", "of", "on", "to", "up", "it", "its", "this", "that", "these",
    "those", "i", "we", "you", "he", "she", "they", "them", "their", "our", "your", "my", "his",
    "her",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "without", "un", "in", "im", "dis", "non",
];

/// Later pairs override earlier ones for the same word.
const ANTONYM_PAIRS: &[(&str, &str)] = &[
    ("intelligent", "unintelligent"),
    ("intelligent", "stupid"),
    ("smart", "dumb"),
    ("good", "bad"),
    ("good", "evil"),
    ("true", "false"),
    ("correct", "incorrect"),
    ("honest", "dishonest"),
    ("legal", "illegal"),
    ("moral", "immoral"),
    ("possible", "impossible"),
    ("responsible", "irresponsible"),
    ("relevant", "irrelevant"),
    ("effective", "ineffective"),
    ("efficient", "inefficient"),
    ("logical", "illogical"),
    ("rational", "irrational"),
    ("similar", "dissimilar"),
    ("agree", "disagree"),
    ("like", "dislike"),
    ("trust", "distrust"),
    ("approve", "disapprove"),
];

struct Lexicon {
    canonical: HashMap<&'static str, &'static str>,
    antonyms: HashMap<&'static str, &'static str>,
    stopwords: HashSet<&'static str>,
    negations: HashSet<&'static str>,
}

impl Lexicon {
    fn build() -> Self {
        let mut canonical = HashMap::new();
        for group in SYNONYM_GROUPS {
            let Some(smallest) = group.iter().min() else {
                continue;
            };
            for word in *group {
                canonical.insert(*word, *smallest);
            }
        }

        let mut antonyms = HashMap::new();
        for (left, right) in ANTONYM_PAIRS {
            antonyms.insert(*left, *right);
            antonyms.insert(*right, *left);
        }

        Self {
            canonical,
            antonyms,
            stopwords: STOPWORDS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    fn canonicalize<'a>(&self, word: &'a str) -> &'a str {
        self.canonical.get(word).copied().unwrap_or(word)
    }
}

fn lexicon() -> &'static Lexicon {
    static LEXICON: OnceLock<Lexicon> = OnceLock::new();
    LEXICON.get_or_init(Lexicon::build)
}

/// Normalize claim text into its canonical token set
///
/// Lowercases, strips punctuation (apostrophes survive), folds a negation
/// followed by a word with a known antonym into that antonym ("not
/// unintelligent" becomes the canonical form of "intelligent"), drops
/// stopwords and maps synonyms onto one canonical word.
///
/// # Examples
///
/// ```
/// use reasonrank_dedup::normalize_claim;
///
/// assert_eq!(
///     normalize_claim("He is not unintelligent"),
///     normalize_claim("He is intelligent!"),
/// );
/// ```
pub fn normalize_claim(text: &str) -> TokenSet {
    let lexicon = lexicon();
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '\'' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let mut tokens = TokenSet::new();
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        if lexicon.negations.contains(word) {
            if let Some(antonym) = words.get(i + 1).and_then(|next| lexicon.antonyms.get(*next)) {
                tokens.insert(lexicon.canonicalize(antonym).to_string());
                i += 2;
                continue;
            }
        }
        if !lexicon.stopwords.contains(word) {
            tokens.insert(lexicon.canonicalize(word).to_string());
        }
        i += 1;
    }
    tokens
}

/// Jaccard similarity of two token sets
///
/// Two empty sets are identical (1.0); an empty set shares nothing with a
/// non-empty one (0.0).
pub fn jaccard_similarity(a: &TokenSet, b: &TokenSet) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}
