use std::fmt;
use std::path::Path;
use std::str::FromStr;

const INI_COMMENT_MARKERS: &[char] = &['#', ';'];
const TOML_COMMENT_MARKERS: &[char] = &['#'];

/// Flavour of the flat file format
///
/// Both share the same line grammar, they differ only in which characters
/// introduce a comment and in what a header is called.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Dialect {
    #[default]
    Ini,
    Toml,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown dialect {0:?}, expected \"ini\" or \"toml\"")]
pub struct UnknownDialect(pub String);

impl Dialect {
    pub fn comment_markers(self) -> &'static [char] {
        match self {
            Dialect::Ini => INI_COMMENT_MARKERS,
            Dialect::Toml => TOML_COMMENT_MARKERS,
        }
    }

    pub fn is_comment_marker(self, c: char) -> bool {
        self.comment_markers().contains(&c)
    }

    /// `.toml` files are TOML, everything else is INI
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Dialect::Toml,
            _ => Dialect::Ini,
        }
    }

    pub(crate) fn header_name(self) -> &'static str {
        match self {
            Dialect::Ini => "section name",
            Dialect::Toml => "table name",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Ini => f.write_str("ini"),
            Dialect::Toml => f.write_str("toml"),
        }
    }
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ini" => Ok(Dialect::Ini),
            "toml" => Ok(Dialect::Toml),
            _ => Err(UnknownDialect(s.to_owned())),
        }
    }
}
