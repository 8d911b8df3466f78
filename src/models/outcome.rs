/// Result of a pipeline stage that may substitute a safe default.
///
/// `Fallback` carries the substitute (possibly nothing) and keeps the request
/// alive; `HardFailure` means no safe default exists and the request aborts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Value(T),
    Fallback(Option<T>),
    HardFailure(String),
}

impl<T> Outcome<T> {
    /// The produced or substituted value. `None` for a hard failure.
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Fallback(v) => v,
            Outcome::HardFailure(_) => None,
        }
    }
}
