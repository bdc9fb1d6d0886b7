//! Char- and column-aware string helpers.
//!
//! The command line edits by char index and the painter clips by display column; both go
//! through here so no slice ever lands inside a multi-byte character.

use unicode_width::UnicodeWidthChar;

/// Returns a prefix of at most `max_chars` characters.
pub fn safe_prefix(s: &str, max_chars: usize) -> &str {
    &s[..byte_index(s, max_chars)]
}

/// Byte offset of char index `char_idx`, clamped to `s.len()`.
pub fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(idx, _)| idx)
}

/// Truncates to `max_chars` characters, ending in an ellipsis when shortened.
pub fn ellipsize(s: &str, max_chars: usize) -> String {
    if char_count(s) <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return String::from("…");
    }
    format!("{}…", safe_prefix(s, max_chars - 1))
}

/// Slice covering display columns `start_cols..start_cols + width_cols`.
/// A wide glyph straddling the right edge is dropped rather than split.
pub fn window_by_columns(s: &str, start_cols: usize, width_cols: usize) -> &str {
    if width_cols == 0 || s.is_empty() {
        return "";
    }

    let target_end = start_cols.saturating_add(width_cols);
    let mut col = 0usize;
    let mut start_byte = None;
    let mut end_byte = s.len();

    for (idx, ch) in s.char_indices() {
        let next_col = col.saturating_add(glyph_width(ch));
        if start_byte.is_none() && col <= start_cols && start_cols < next_col {
            start_byte = Some(idx);
        }
        if start_byte.is_some() && next_col > target_end {
            end_byte = idx;
            break;
        }
        col = next_col;
    }

    match start_byte {
        Some(start) if start <= end_byte => &s[start..end_byte],
        _ => "",
    }
}

/// Clip to `width` columns and pad with spaces so the result fills exactly that width.
pub fn fit_columns(s: &str, width: usize) -> String {
    let clipped = window_by_columns(s, 0, width);
    let used: usize = clipped.chars().map(glyph_width).sum();
    let mut out = clipped.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

/// Counts characters, not bytes.
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

fn glyph_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_and_byte_index_respect_boundaries() {
        assert_eq!(safe_prefix("seek", 2), "se");
        assert_eq!(safe_prefix("seek", 10), "seek");
        assert_eq!(safe_prefix("µs", 1), "µ");
        assert_eq!(byte_index("µs", 1), 2);
        assert_eq!(byte_index("µs", 9), 3);
        assert_eq!(byte_index("", 0), 0);
    }

    #[test]
    fn ellipsize_shortens_long_descriptions() {
        assert_eq!(ellipsize("Seek", 10), "Seek");
        assert_eq!(ellipsize("Seek to time", 8), "Seek to…");
        assert_eq!(ellipsize("你好世界", 3), "你好…");
        assert_eq!(ellipsize("seek", 1), "…");
        assert_eq!(ellipsize("seek", 0), "…");
    }

    #[test]
    fn window_by_columns_handles_wide_glyphs() {
        assert_eq!(window_by_columns("abcdef", 2, 3), "cde");
        assert_eq!(window_by_columns("abcdef", 10, 5), "");
        assert_eq!(window_by_columns("你好世界", 0, 4), "你好");
        assert_eq!(window_by_columns("你好世界", 0, 3), "你");
    }

    #[test]
    fn fit_columns_pads_and_clips() {
        assert_eq!(fit_columns("ab", 4), "ab  ");
        assert_eq!(fit_columns("abcdef", 3), "abc");
        assert_eq!(fit_columns("你好", 3), "你 ");
    }
}
