/// Peekable iterator over a char sequence.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Cursor<'a> {
        Cursor { source, offset: 0 }
    }

    /// Everything consumed so far.
    pub(crate) fn consumed(&self) -> &'a str {
        &self.source[..self.offset]
    }

    /// Everything not consumed yet.
    pub(crate) fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Peeks at the next character without consuming it.
    pub(crate) fn first(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Moves to the next character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.first()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    /// Consumes the next character if it is `c`.
    pub(crate) fn eat(&mut self, c: char) -> bool {
        if self.first() == Some(c) {
            self.offset += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes `prefix` if the rest of the input starts with it.
    pub(crate) fn eat_str(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.offset += prefix.len();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while let Some(c) = self.first() {
            if !predicate(c) {
                break;
            }
            self.offset += c.len_utf8();
        }
    }
}
