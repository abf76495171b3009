use std::fmt;

/// A line and column in a source text, both 1-based.
///
/// Columns count characters, not bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets of a source text to [`Location`]s.
#[derive(Clone, Debug)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();
        while let Some((index, c)) = chars.next() {
            match c {
                '\n' => line_starts.push(index + 1),
                '\r' => {
                    // `\r\n` is a single line terminator
                    if let Some((_, '\n')) = chars.peek() {
                        continue;
                    }
                    line_starts.push(index + 1)
                }
                _ => {}
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Offsets past the end of the source map to the position just after
    /// the last character.
    pub fn location(&self, index: usize) -> Location {
        let index = index.min(self.source.len());
        let line = match self.line_starts.binary_search(&index) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..index)
            .map_or(index - line_start, |prefix| prefix.chars().count());
        Location {
            line: line + 1,
            column: column + 1,
        }
    }
}
