use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid word pattern"));

/// Common English words plus Reddit vocabulary that would otherwise
/// dominate every word cloud.
static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to",
        "for", "of", "as", "by", "that", "this", "it", "from", "they", "we", "you", "i", "me",
        "my", "your", "our", "their", "here", "why", "how", "what", "about", "just", "really",
        "so", "much", "more", "been", "have", "has", "would", "should", "could", "will", "can",
        "get", "got", "make", "made", "take", "give", "go", "come", "know", "think", "see",
        "look", "want", "need", "way", "time", "reddit", "post", "comment", "upvote",
        "downvote",
    ]
    .into_iter()
    .collect()
});

/// Shortest word length kept in the word cloud.
const MIN_KEYWORD_CHARS: usize = 3;

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Lowercased words of `text` worth counting, in order of appearance.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| !is_stopword(word) && word.chars().count() >= MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}
