mod consumer;
mod dialect;
mod document;
mod file;
mod lookup;
mod parser;
mod token;

pub use self::dialect::{Dialect, UnknownDialect};
pub use self::document::{Document, DEFAULT_SECTION};
pub use self::file::Error;
pub use self::lookup::Lookup;
pub use self::parser::ParseError;
pub use self::token::{Kind, Token};
