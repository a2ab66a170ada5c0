//! Text normalization applied before classification.

use regex::Regex;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+").expect("valid URL pattern"));
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ur]/\w+").expect("valid mention pattern"));

/// Strips URLs and `u/` / `r/` mentions, then collapses whitespace.
///
/// Passes repeat until nothing changes, since removing one token can splice
/// its neighbours into a new one. The output is therefore a fixed point.
pub fn clean_text(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(text: &str) -> String {
    let without_urls = URL_REGEX.replace_all(text, "");
    let without_mentions = MENTION_REGEX.replace_all(&without_urls, "");
    without_mentions
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
