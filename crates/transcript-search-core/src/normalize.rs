//! Accent- and case-insensitive text folding, and the forward-scan matcher.
//!
//! Folding decomposes each character (NFD), drops combining diacritical
//! marks (`U+0300..=U+036F`), and lower-cases what remains, so `"Índice"`
//! and `"indice"` compare equal.
//!
//! Folding is applied per character. That keeps an exact record of which
//! original character produced each folded character ([`Folded`]), so
//! offsets found in folded text can always be mapped back onto the
//! original glyphs, even for characters whose folded form is longer or
//! shorter than one character.
//!
//! Lower-casing runs per character, with one contextual rule on top: a
//! capital sigma at the end of a word folds to the final form `ς`, as
//! whole-string lower-casing does. `"ΟΔΟΣ"` therefore folds to `"οδος"`.
//!
//! All offsets in this module count Unicode scalar values, not bytes.

use unicode_normalization::UnicodeNormalization;

const CAPITAL_SIGMA: char = '\u{03A3}';
const FINAL_SIGMA: char = '\u{03C2}';

/// True for the combining diacritical marks stripped during folding.
fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// Push the folded form of `c` through `emit`.
fn fold_char(c: char, mut emit: impl FnMut(char)) {
    for d in std::iter::once(c).nfd() {
        if is_diacritic(d) {
            continue;
        }
        for l in d.to_lowercase() {
            emit(l);
        }
    }
}

/// Fold a string to its comparable form.
///
/// ```rust
/// use transcript_search_core::normalize::normalize;
///
/// assert_eq!(normalize("Estratégias de Indexação"), "estrategias de indexacao");
/// ```
pub fn normalize(s: &str) -> String {
    Folded::new(s).chars.into_iter().collect()
}

/// A sigma is word-final when a letter precedes it and none follows.
fn is_word_final(chars: &[char], pos: usize) -> bool {
    pos > 0
        && chars[pos - 1].is_alphabetic()
        && chars.get(pos + 1).map_or(true, |c| !c.is_alphabetic())
}

/// Folded text plus the mapping from each folded character back to the
/// original character it came from.
#[derive(Debug, Clone)]
pub struct Folded {
    chars: Vec<char>,
    origin: Vec<usize>,
    source_len: usize,
}

impl Folded {
    pub fn new(s: &str) -> Self {
        let mut chars = Vec::with_capacity(s.len());
        let mut origin = Vec::with_capacity(s.len());
        let mut sigmas = Vec::new();
        let mut source_len = 0;
        for (i, c) in s.chars().enumerate() {
            if c == CAPITAL_SIGMA {
                sigmas.push(chars.len());
            }
            fold_char(c, |f| {
                chars.push(f);
                origin.push(i);
            });
            source_len = i + 1;
        }
        for pos in sigmas {
            if is_word_final(&chars, pos) {
                chars[pos] = FINAL_SIGMA;
            }
        }
        Self {
            chars,
            origin,
            source_len,
        }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character length of the original string.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Map the folded range `[start, start + len)` to the original range
    /// that covers it.
    ///
    /// The start snaps to the beginning of the original character that
    /// produced `start`. The end extends over any trailing original
    /// characters that fold to nothing (stray combining marks), so a
    /// highlight never splits a base letter from its accent.
    pub fn original_span(&self, start: usize, len: usize) -> (usize, usize) {
        if start >= self.chars.len() {
            return (self.source_len, self.source_len);
        }
        let orig_start = self.origin[start];
        if len == 0 {
            return (orig_start, orig_start);
        }
        let end = (start + len).min(self.chars.len());
        let orig_end = if end == self.chars.len() {
            self.source_len
        } else if self.origin[end] == self.origin[end - 1] {
            self.origin[end] + 1
        } else {
            self.origin[end]
        };
        (orig_start, orig_end)
    }
}

/// Slice `s` by character offsets `[from, to)`, clamped to its length.
pub fn slice_chars(s: &str, from: usize, to: usize) -> &str {
    if from >= to {
        return "";
    }
    let mut indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let start = match indices.nth(from) {
        Some(i) => i,
        None => return "",
    };
    let end = indices.nth(to - from - 1).unwrap_or(s.len());
    &s[start..end]
}

/// First occurrence of `needle` in `hay` at or after `from`.
fn find_from(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()] == *needle)
}

/// Every non-overlapping, left-to-right occurrence of `needle` in `hay`.
///
/// Each search resumes right after the end of the previous match, so
/// `"aa"` in `"aaa"` matches once. An empty needle never matches.
pub fn find_all_chars(hay: &[char], needle: &[char]) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut from = 0;
    while let Some(idx) = find_from(hay, needle, from) {
        positions.push(idx);
        from = idx + needle.len();
    }
    positions
}

/// Fold both inputs and return every match start, in folded-haystack
/// coordinates.
///
/// ```rust
/// use transcript_search_core::normalize::find_all;
///
/// assert_eq!(find_all("Índice e indice", "INDICE"), vec![0, 9]);
/// assert!(find_all("anything", "").is_empty());
/// ```
pub fn find_all(haystack: &str, needle: &str) -> Vec<usize> {
    let hay: Vec<char> = normalize(haystack).chars().collect();
    let needle: Vec<char> = normalize(needle).chars().collect();
    find_all_chars(&hay, &needle)
}
