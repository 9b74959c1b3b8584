//! Error types for event-history analysis.
//!
//! Only malformed static configuration is a hard failure here; all numeric
//! degeneracy (empty sets, zero denominators) is absorbed into `NaN` by the
//! statistics themselves.

use std::fmt;

/// Result type alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors raised by pattern specification and stream assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// A pattern letter outside the state enumeration.
    UnknownState { letter: char },

    /// A pattern string whose length does not encode a width of 1, 2 or 3.
    PatternWidth { len: usize },

    /// Attempt to merge occurrence sets of different widths.
    WidthMismatch { left: usize, right: usize },

    /// Event-stream columns of unequal length.
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    /// A column required by the declared schema version is absent.
    MissingColumn { field: &'static str },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::UnknownState { letter } => {
                write!(f, "unknown state letter '{}'", letter)
            }
            HistoryError::PatternWidth { len } => {
                write!(
                    f,
                    "pattern string of {} letters does not encode a width of 1, 2 or 3",
                    len
                )
            }
            HistoryError::WidthMismatch { left, right } => {
                write!(
                    f,
                    "cannot merge occurrence sets of widths {} and {}",
                    left, right
                )
            }
            HistoryError::LengthMismatch {
                field,
                expected,
                got,
            } => {
                write!(
                    f,
                    "column '{}' has {} entries, expected {}",
                    field, got, expected
                )
            }
            HistoryError::MissingColumn { field } => {
                write!(f, "schema requires column '{}' but it is absent", field)
            }
        }
    }
}

impl std::error::Error for HistoryError {}

impl HistoryError {
    pub fn unknown_state(letter: char) -> Self {
        HistoryError::UnknownState { letter }
    }

    pub fn pattern_width(len: usize) -> Self {
        HistoryError::PatternWidth { len }
    }

    pub fn width_mismatch(left: usize, right: usize) -> Self {
        HistoryError::WidthMismatch { left, right }
    }

    pub fn length_mismatch(field: &'static str, expected: usize, got: usize) -> Self {
        HistoryError::LengthMismatch {
            field,
            expected,
            got,
        }
    }

    pub fn missing_column(field: &'static str) -> Self {
        HistoryError::MissingColumn { field }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_input() {
        let err = HistoryError::unknown_state('x');
        assert!(err.to_string().contains("'x'"));

        let err = HistoryError::width_mismatch(1, 2);
        let msg = err.to_string();
        assert!(msg.contains('1') && msg.contains('2'));

        let err = HistoryError::length_mismatch("time", 10, 7);
        let msg = err.to_string();
        assert!(msg.contains("time") && msg.contains("10") && msg.contains('7'));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HistoryError>();
    }
}
