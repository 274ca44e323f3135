//! Byte spans and line/column mapping.
//!
//! Spans are byte offsets into the UTF-8 source. Columns exposed to callers are
//! counted in UTF-16 code units, which is what ESLint-style analyzers report.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn empty_at(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn text(self, source: &str) -> &str {
        &source[self.start as usize..self.end as usize]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// True for the characters ECMAScript treats as line terminators.
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Offsets of every line start, for `offset <-> (line, column)` conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\r' => {
                    if let Some((_, '\n')) = chars.peek() {
                        chars.next();
                        line_starts.push((i + 2) as u32);
                    } else {
                        line_starts.push((i + 1) as u32);
                    }
                }
                '\n' => line_starts.push((i + 1) as u32),
                '\u{2028}' | '\u{2029}' => line_starts.push((i + c.len_utf8()) as u32),
                _ => {}
            }
        }
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: u32) -> u32 {
        self.line_starts.partition_point(|&s| s <= offset) as u32
    }

    /// Byte offset where 1-based `line` starts.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        let idx = line.checked_sub(1)? as usize;
        self.line_starts.get(idx).copied()
    }

    /// `(1-based line, 0-based UTF-16 column)` of `offset`.
    pub fn line_col(&self, text: &str, offset: u32) -> (u32, u32) {
        let line = self.line_of(offset);
        let start = self.line_starts[(line - 1) as usize];
        let col = text[start as usize..offset as usize]
            .encode_utf16()
            .count() as u32;
        (line, col)
    }

    /// Byte offset of `(1-based line, 0-based UTF-16 column)`.
    ///
    /// Returns `None` when the position is past the end of the line or splits a
    /// surrogate pair.
    pub fn offset_of(&self, text: &str, line: u32, column: u32) -> Option<u32> {
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .unwrap_or(text.len() as u32);
        let mut units = 0u32;
        for (i, c) in text[start as usize..end as usize].char_indices() {
            if units == column {
                return Some(start + i as u32);
            }
            if units > column {
                return None;
            }
            units += c.len_utf16() as u32;
        }
        (units == column).then_some(end)
    }

    /// Leading whitespace of the line containing `offset`.
    pub fn indent_of<'t>(&self, text: &'t str, offset: u32) -> &'t str {
        let line = self.line_of(offset);
        let start = self.line_starts[(line - 1) as usize] as usize;
        let rest = &text[start..];
        let len = rest
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(rest.len());
        &rest[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_utf16_units() {
        let text = "a\n😀x = 1;\n";
        let idx = LineIndex::new(text);
        let x = text.find('x').unwrap() as u32;
        assert_eq!(idx.line_col(text, x), (2, 2));
        assert_eq!(idx.offset_of(text, 2, 2), Some(x));
        assert_eq!(idx.offset_of(text, 2, 1), None);
    }

    #[test]
    fn handles_all_line_terminators() {
        let text = "a\r\nb\rc\u{2028}d\ne";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_count(), 5);
        let e = text.find('e').unwrap() as u32;
        assert_eq!(idx.line_col(text, e), (5, 0));
        let b = text.find('b').unwrap() as u32;
        assert_eq!(idx.line_col(text, b), (2, 0));
    }

    #[test]
    fn indent_reads_leading_whitespace() {
        let text = "function f() {\n\t  return 1;\n}";
        let idx = LineIndex::new(text);
        let r = text.find("return").unwrap() as u32;
        assert_eq!(idx.indent_of(text, r), "\t  ");
    }

    #[test]
    fn offset_past_line_end_is_none() {
        let text = "ab\ncd";
        let idx = LineIndex::new(text);
        assert_eq!(idx.offset_of(text, 1, 2), Some(2));
        assert_eq!(idx.offset_of(text, 1, 5), None);
        assert_eq!(idx.offset_of(text, 9, 0), None);
    }
}
