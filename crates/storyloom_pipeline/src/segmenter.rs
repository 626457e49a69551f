//! Sentence-aware text segmentation.
//!
//! Lengths are counted in characters and every cut lands on a character
//! boundary.

use regex::Regex;
use std::sync::OnceLock;

/// A run of non-terminators closed by terminators, or a trailing run with none.
/// Matches tile the input, so no character is ever dropped.
fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^.!?]*[.!?]+|[^.!?]+").expect("Valid sentence regex"))
}

/// Split `text` into ordered segments of at most `max_chars` characters.
///
/// Sentences are packed greedily; a sentence longer than `max_chars` is cut at
/// fixed character offsets. Concatenating the result yields `text` exactly.
///
/// # Examples
///
/// ```
/// use storyloom_pipeline::split_text;
///
/// let parts = split_text("One. Two! Three?", 10);
/// assert_eq!(parts, vec!["One. Two!", " Three?"]);
/// assert_eq!(parts.concat(), "One. Two! Three?");
/// assert!(split_text("", 10).is_empty());
/// ```
pub fn split_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut packed = Vec::new();
    let mut start = 0;
    let mut end = 0;
    let mut len = 0;

    for sentence in sentence_pattern().find_iter(text) {
        let sentence_len = sentence.as_str().chars().count();
        if len > 0 && len + sentence_len > max_chars {
            packed.push(&text[start..end]);
            start = sentence.start();
            len = 0;
        }
        end = sentence.end();
        len += sentence_len;
    }
    if len > 0 {
        packed.push(&text[start..end]);
    }

    packed
        .into_iter()
        .flat_map(|chunk| hard_split(chunk, max_chars))
        .collect()
}

fn hard_split(chunk: &str, max_chars: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = chunk;
    while !rest.is_empty() {
        let (piece, tail) = rest.split_at(byte_offset(rest, max_chars));
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

/// Byte offset of the `n`th character, or the length when `s` is shorter.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(offset, _)| offset)
}

/// The first `n` characters of `s`.
pub fn first_chars(s: &str, n: usize) -> &str {
    &s[..byte_offset(s, n)]
}

/// The last `n` characters of `s`.
pub fn last_chars(s: &str, n: usize) -> &str {
    let total = s.chars().count();
    &s[byte_offset(s, total.saturating_sub(n))..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_helpers_respect_char_boundaries() {
        assert_eq!(first_chars("héllo", 2), "hé");
        assert_eq!(last_chars("héllo", 4), "éllo");
        assert_eq!(last_chars("ab", 10), "ab");
        assert_eq!(first_chars("ab", 0), "");
    }
}
