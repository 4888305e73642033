/// Outcome of a typed lookup
///
/// Unlike an `Option`, this keeps "the key is not there" apart from "the key
/// is there, but its value is not a `T`". The raw value is kept in the
/// latter case so callers can report it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotPresent,
    ConversionFailed(String),
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Collapse to an `Option`, treating bad values like missing ones
    pub fn ok(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotPresent | Lookup::ConversionFailed(_) => None,
        }
    }

    pub fn unwrap_or(self, fallback: T) -> T {
        self.ok().unwrap_or(fallback)
    }
}
