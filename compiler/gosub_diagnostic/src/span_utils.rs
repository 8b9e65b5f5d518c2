//! Line and column lookup for spans.

use gosub_ir::Span;

/// Byte offsets of every line start in one source text.
///
/// ```
/// use gosub_diagnostic::span_utils::LineIndex;
///
/// let index = LineIndex::build("var a int\nvar b int\n");
/// assert_eq!(index.line_col(0), (1, 1));
/// assert_eq!(index.line_col(14), (2, 5));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    starts: Vec<u32>,
}

impl LineIndex {
    pub fn build(source: &str) -> Self {
        let mut starts = vec![0u32];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .filter_map(|(i, _)| u32::try_from(i + 1).ok()),
        );
        LineIndex { starts }
    }

    /// 1-based line and byte column of `offset`.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        let start = self.starts.get(line).copied().unwrap_or(0);
        let line = u32::try_from(line).unwrap_or(u32::MAX);
        (line.saturating_add(1), offset - start + 1)
    }

    pub fn span_start(&self, span: Span) -> (u32, u32) {
        self.line_col(span.start)
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// The text of 1-based `line` in `source`, without its line break.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> &'s str {
        let index = line.saturating_sub(1) as usize;
        let Some(&start) = self.starts.get(index) else {
            return "";
        };
        let end = self
            .starts
            .get(index + 1)
            .map_or(source.len(), |&next| next as usize);
        source
            .get(start as usize..end)
            .unwrap_or("")
            .trim_end_matches(['\n', '\r'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_line() {
        let index = LineIndex::build("func main() {}");
        assert_eq!(index.line_col(5), (1, 6));
        assert_eq!(index.line_count(), 1);
    }

    #[test]
    fn test_offsets_at_line_starts() {
        let index = LineIndex::build("a\nbc\n\nd");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(2), (2, 1));
        assert_eq!(index.line_col(3), (2, 2));
        assert_eq!(index.line_col(5), (3, 1));
        assert_eq!(index.line_col(6), (4, 1));
    }

    #[test]
    fn test_line_text() {
        let source = "package main\r\nvar x int\n\nfunc f() {}";
        let index = LineIndex::build(source);
        assert_eq!(index.line_text(source, 1), "package main");
        assert_eq!(index.line_text(source, 2), "var x int");
        assert_eq!(index.line_text(source, 3), "");
        assert_eq!(index.line_text(source, 4), "func f() {}");
        assert_eq!(index.line_text(source, 9), "");
    }

    #[test]
    fn test_span_start() {
        let index = LineIndex::build("x\ny := 1\n");
        assert_eq!(index.span_start(Span::new(4, 6)), (2, 3));
    }
}
