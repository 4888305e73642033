use log::debug;
use std::fmt;
use std::io;
use std::str::FromStr;

use super::parser::{self, ParseError, Parser};
use super::{Dialect, Error, Lookup, Token};

/// The section values belong to before the first header
pub const DEFAULT_SECTION: &str = "";

/// All lines of one file, in file order
///
/// Values don't know their section. It is whatever section header came last
/// before them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Document {
    dialect: Dialect,
    tokens: Vec<Token>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            tokens: Vec::new(),
        }
    }

    /// Load from a string
    pub fn parse_str(data: &str, dialect: Dialect) -> Result<Self, Error> {
        let tokens = Parser::new(dialect).parse(data)?;

        Ok(Self { dialect, tokens })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    // Index of the first `key` in `section`.
    // Later duplicates are shadowed by it.
    fn position(&self, section: &str, key: &str) -> Option<usize> {
        let mut current = DEFAULT_SECTION;

        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                Token::Section { name } => current = name.as_str(),
                Token::Value { key: k, .. } if current == section && k == key => return Some(i),
                _ => {}
            }
        }

        None
    }

    /// Raw value of the first `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        match self.position(section, key).map(|i| &self.tokens[i]) {
            Some(Token::Value { value, .. }) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.position(section, key).is_some()
    }

    pub fn lookup<T: FromStr>(&self, section: &str, key: &str) -> Lookup<T> {
        match self.get(section, key) {
            None => Lookup::NotPresent,
            Some(raw) => match raw.parse() {
                Ok(v) => Lookup::Found(v),
                Err(_) => Lookup::ConversionFailed(raw.to_owned()),
            },
        }
    }

    /// Get the first value for `key` in `section`, if it exists and converts to `T`
    pub fn find<T: FromStr>(&self, section: &str, key: &str) -> Option<T> {
        self.lookup(section, key).ok()
    }

    pub fn find_or<T: FromStr>(&self, section: &str, key: &str, fallback: T) -> T {
        self.lookup(section, key).unwrap_or(fallback)
    }

    /// Unique section names in order of first appearance
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();

        for token in &self.tokens {
            if let Token::Section { name } = token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }

        names
    }

    /// All entries of all instances of `section`, shadowed duplicates included
    pub fn section_entries<'a>(
        &'a self,
        section: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let mut current = DEFAULT_SECTION;

        self.tokens.iter().filter_map(move |token| match token {
            Token::Section { name } => {
                current = name.as_str();
                None
            }
            Token::Value { key, value } if current == section => {
                Some((key.as_str(), value.as_str()))
            }
            _ => None,
        })
    }

    /// Updates the first occurrence of `key` in `section`
    ///
    /// Missing keys are *not* added: `Ok(false)` is returned and the document
    /// stays as it is. Values that would not read back as they were written
    /// (empty, multi-line or with surrounding whitespace) are rejected.
    pub fn set<V: fmt::Display>(
        &mut self,
        section: &str,
        key: &str,
        value: V,
    ) -> Result<bool, ParseError> {
        let raw = value.to_string();
        parser::check_value(&raw)?;

        let Some(i) = self.position(section, key) else {
            debug!("no key {key:?} in section {section:?}, nothing to set");
            return Ok(false);
        };

        if let Token::Value { value, .. } = &mut self.tokens[i] {
            *value = raw;
        }

        Ok(true)
    }

    /// Write to a writer
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for token in &self.tokens {
            writeln!(writer, "{token}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            writeln!(f, "{token}")?;
        }

        Ok(())
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s, Dialect::Ini)
    }
}
