use super::parser::ParseError;

/// Cursor over a single line.
///
/// Every `eat*`/`consume*` call overwrites the staged run with whatever it
/// consumed (possibly nothing). The cursor never moves backwards.
#[derive(Debug)]
pub(crate) struct Consumer<'a> {
    line: &'a str,
    offset: usize,
    position: usize,
    staged: &'a str,
}

impl<'a> Consumer<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self {
            line,
            offset: 0,
            position: 0,
            staged: "",
        }
    }

    fn bump(&mut self, c: char) {
        self.offset += c.len_utf8();
        self.position += 1;
    }

    /// Consume the current character if it matches `predicate`
    pub(crate) fn eat<P>(&mut self, predicate: P) -> &'a str
    where
        P: Fn(char) -> bool,
    {
        let start = self.offset;
        if let Some(c) = self.peek().filter(|&c| predicate(c)) {
            self.bump(c);
        }
        self.staged = &self.line[start..self.offset];
        self.staged
    }

    pub(crate) fn eat_one<P>(&mut self, predicate: P) -> bool
    where
        P: Fn(char) -> bool,
    {
        self.eat(predicate).chars().count() == 1
    }

    /// Consume characters for as long as they match `predicate`
    pub(crate) fn consume<P>(&mut self, predicate: P) -> &'a str
    where
        P: Fn(char) -> bool,
    {
        let start = self.offset;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.bump(c);
        }
        self.staged = &self.line[start..self.offset];
        self.staged
    }

    /// Consume a run matching `predicate` and report whether it was exactly one character long
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn consume_one<P>(&mut self, predicate: P) -> bool
    where
        P: Fn(char) -> bool,
    {
        self.consume(predicate).chars().count() == 1
    }

    pub(crate) fn consume_some<P>(&mut self, predicate: P) -> bool
    where
        P: Fn(char) -> bool,
    {
        !self.consume(predicate).is_empty()
    }

    #[cold]
    pub(crate) fn error<S: Into<String>>(&self, expected: S) -> ParseError {
        ParseError {
            line: self.line.to_owned(),
            position: self.position(),
            found: self.peek(),
            expected: expected.into(),
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.offset >= self.line.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.line[self.offset..].chars().next()
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn staged(&self) -> &'a str {
        self.staged
    }
}
