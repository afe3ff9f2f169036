/// How an operation arrived at the value it left behind.
///
/// None of these are failures: a defined value is always produced, the status
/// only reports whether the usual arithmetic meaning was bent to get there.
#[must_use]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Status {
    /// The result is the mathematically exact one.
    #[default]
    Exact,
    /// A subtraction underflowed and the result wrapped around.
    Wrapped,
    /// A division by zero left the quotient at its maximal value.
    Saturated,
}

impl Status {
    pub fn is_exact(self) -> bool {
        self == Status::Exact
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("output buffer holds {available} bytes but {needed} are required")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("cannot parse an integer from an empty string")]
    Empty,
}
