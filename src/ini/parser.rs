use log::trace;

use super::consumer::Consumer;
use super::{Dialect, Error, Token};

pub(crate) type ParseResult<T> = Result<T, ParseError>;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("expected {expected} at position {position} in line '{line}', but found {}", describe(.found))]
pub struct ParseError {
    pub line: String,
    pub position: usize,
    pub found: Option<char>,
    pub expected: String,
}

fn describe(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("{c:?}"),
        None => "end of line".into(),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[derive(Debug, Default)]
pub(crate) struct Parser {
    dialect: Dialect,
}

impl Parser {
    pub(crate) fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Parse every line of `data`, stopping at the first bad one
    pub(crate) fn parse(&self, data: &str) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::with_capacity(data.lines().count());

        for (i, line) in data.lines().enumerate() {
            let token = self
                .parse_line(line.trim())
                .map_err(|source| Error::Parse {
                    line_no: i + 1,
                    source,
                })?;
            trace!("line {}: {} {:?}", i + 1, token.kind(), line);
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// The first character decides which kind of line this has to be.
    pub(crate) fn parse_line(&self, line: &str) -> ParseResult<Token> {
        match line.chars().next() {
            None => self.parse_blank(line),
            Some(c) if self.dialect.is_comment_marker(c) => self.parse_comment(line),
            Some('[') => self.parse_section(line),
            Some(_) => self.parse_value(line),
        }
    }

    // BLANK          = WS*
    pub(crate) fn parse_blank(&self, line: &str) -> ParseResult<Token> {
        let mut consumer = Consumer::new(line);
        consumer.consume(char::is_whitespace);

        if !consumer.is_done() {
            return Err(consumer.error("end of line"));
        }

        Ok(Token::Blank)
    }

    // COMMENT        = MARKER ' '* ANY*
    pub(crate) fn parse_comment(&self, line: &str) -> ParseResult<Token> {
        let mut consumer = Consumer::new(line);
        let dialect = self.dialect;

        if !consumer.eat_one(|c| dialect.is_comment_marker(c)) {
            return Err(consumer.error(expected_marker(dialect)));
        }
        let marker = consumer.staged().chars().next().unwrap_or_default();

        consumer.consume(|c| c == ' ');
        let text = consumer.consume(|_| true);

        Ok(Token::Comment {
            marker,
            text: text.to_owned(),
        })
    }

    // SECTION        = '[' NAME ']'
    pub(crate) fn parse_section(&self, line: &str) -> ParseResult<Token> {
        let mut consumer = Consumer::new(line);

        if !consumer.eat_one(|c| c == '[') {
            return Err(consumer.error("'['"));
        }

        if !consumer.consume_some(is_name_char) {
            return Err(consumer.error(self.dialect.header_name()));
        }
        let name = consumer.staged();

        if !consumer.eat_one(|c| c == ']') {
            return Err(consumer.error("']'"));
        }

        // no trailing whitespace or comments, not even inline ones
        if !consumer.is_done() {
            return Err(consumer.error("end of line"));
        }

        Ok(Token::Section {
            name: name.to_owned(),
        })
    }

    // ENTRY          = NAME WS* '=' WS* ANY+
    pub(crate) fn parse_value(&self, line: &str) -> ParseResult<Token> {
        let mut consumer = Consumer::new(line);

        if !consumer.consume_some(is_name_char) {
            return Err(consumer.error("key"));
        }
        let key = consumer.staged();

        consumer.consume(is_space);
        if !consumer.eat_one(|c| c == '=') {
            return Err(consumer.error("'='"));
        }
        consumer.consume(is_space);

        // an empty right-hand side is an error, not an empty string
        if !consumer.consume_some(|_| true) {
            return Err(consumer.error("value"));
        }
        let value = consumer.staged();

        Ok(Token::Value {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

fn expected_marker(dialect: Dialect) -> String {
    let markers: Vec<String> = dialect
        .comment_markers()
        .iter()
        .map(|c| format!("'{c}'"))
        .collect();
    markers.join(" or ")
}

/// Make sure `raw` reads back unchanged when written as a value
pub(crate) fn check_value(raw: &str) -> ParseResult<()> {
    let mut consumer = Consumer::new(raw);

    if consumer.peek().is_some_and(char::is_whitespace) {
        return Err(consumer.error("value"));
    }

    consumer.consume(|c| c != '\n' && c != '\r');
    if !consumer.is_done() {
        return Err(consumer.error("end of line"));
    }
    if consumer.staged().is_empty() || consumer.staged().ends_with(char::is_whitespace) {
        return Err(consumer.error("value"));
    }

    Ok(())
}
