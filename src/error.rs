use thiserror::Error;

/// Failures that a [`DiffEngine`](crate::DiffEngine) call can surface.
///
/// Everything recoverable (a snake that fails validation, a stalled corridor
/// walk) is handled at the component boundary and never reaches the caller;
/// only the two conditions below are observable. A failed diff never returns
/// a partial edit script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The requested strategy name is not present in the registry.
    #[error("unknown diff strategy `{0}`")]
    UnknownStrategy(String),

    /// An internally computed sub-range violated `0 <= start <= end <= len`.
    ///
    /// This indicates a bug in a strategy or in the recursive driver, not bad
    /// caller input; the diff is aborted rather than silently truncated.
    #[error("invalid range {start}..{end} for a window of {len} tokens")]
    InvalidRange {
        /// Start of the offending range.
        start: usize,
        /// End of the offending range.
        end: usize,
        /// Length of the window the range was applied to.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        assert_eq!(
            DiffError::UnknownStrategy("histogram".to_owned()).to_string(),
            "unknown diff strategy `histogram`"
        );
        assert_eq!(
            DiffError::InvalidRange {
                start: 4,
                end: 2,
                len: 10
            }
            .to_string(),
            "invalid range 4..2 for a window of 10 tokens"
        );
    }
}
