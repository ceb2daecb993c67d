/// Outcome of a name lookup that can legitimately match more than once.
///
/// `Ambiguous` is not an error to repair automatically — it blocks the caller
/// until the configuration disambiguates (e.g. by setting a client name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Found(T),
    NotFound,
    Ambiguous,
}

impl<T> Resolution<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Resolution::Found(value) => Some(value),
            _ => None,
        }
    }
}
