use std::fmt;

/// One parsed line
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    Blank,
    Comment { marker: char, text: String },
    Section { name: String },
    Value { key: String, value: String },
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    Blank,
    Comment,
    Section,
    Value,
}

impl Token {
    pub fn kind(&self) -> Kind {
        match self {
            Token::Blank => Kind::Blank,
            Token::Comment { .. } => Kind::Comment,
            Token::Section { .. } => Kind::Section,
            Token::Value { .. } => Kind::Value,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Blank => Ok(()),
            Token::Comment { marker, text } if text.is_empty() => write!(f, "{marker}"),
            Token::Comment { marker, text } => write!(f, "{marker} {text}"),
            Token::Section { name } => write!(f, "[{name}]"),
            Token::Value { key, value } => write!(f, "{key} = {value}"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Blank => "blank",
            Kind::Comment => "comment",
            Kind::Section => "section",
            Kind::Value => "value",
        };
        f.write_str(s)
    }
}
