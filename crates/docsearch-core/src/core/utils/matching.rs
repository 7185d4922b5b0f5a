use std::ops::Range;

/// Lower-cases `text` while remembering, for every byte of the lowered string,
/// the byte offset of the original character it came from.
///
/// Lower-casing is not length preserving (`'İ'` becomes two characters), so
/// match positions found in the lowered text have to be mapped back before they
/// can be used to slice the original.
struct FoldedText {
    folded: String,
    origin: Vec<usize>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len() + 1);
        for (offset, ch) in text.char_indices() {
            for lower in ch.to_lowercase() {
                folded.push(lower);
                origin.extend(std::iter::repeat_n(offset, lower.len_utf8()));
            }
        }
        origin.push(text.len());
        Self { folded, origin }
    }

    /// Maps a folded byte range back onto the enclosing original characters.
    fn original_range(&self, text: &str, folded: Range<usize>) -> Range<usize> {
        let start = self.origin[folded.start];
        let mut end = self.origin[folded.end];
        // A match ending inside a multi-char expansion still covers that character.
        if folded.end > 0 && self.origin[folded.end - 1] == end && end < text.len() {
            end += text[end..].chars().next().map_or(0, char::len_utf8);
        }
        start..end
    }
}

/// Per-character lower-casing used for every comparison in this module.
///
/// Unlike [`str::to_lowercase`] this has no context-dependent rules, so a
/// query folds the same way wherever it appears in a text.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive literal containment.
///
/// `needle` is compared as plain text; no character has a special meaning.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

/// Byte ranges in `haystack` of every non-overlapping case-insensitive
/// occurrence of `needle`, left to right. An empty needle matches nothing.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let needle = fold_case(needle);
    if needle.is_empty() || haystack.is_empty() {
        return Vec::new();
    }
    let folded = FoldedText::new(haystack);
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for (start, matched) in folded.folded.match_indices(needle.as_str()) {
        let range = folded.original_range(haystack, start..start + matched.len());
        if ranges.last().is_some_and(|prev| prev.end > range.start) {
            continue;
        }
        ranges.push(range);
    }
    ranges
}

/// Splits `text` into alternating unmatched / matched pieces for the given ranges.
///
/// Returns `(piece, is_match)` pairs covering the whole input; empty unmatched
/// pieces are omitted.
pub fn split_by_ranges<'a>(text: &'a str, ranges: &[Range<usize>]) -> Vec<(&'a str, bool)> {
    let mut pieces = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for range in ranges {
        if range.start > cursor {
            pieces.push((&text[cursor..range.start], false));
        }
        pieces.push((&text[range.clone()], true));
        cursor = range.end;
    }
    if cursor < text.len() {
        pieces.push((&text[cursor..], false));
    }
    pieces
}
