//! Transition patterns over consecutive end states.
//!
//! A pattern is a run of `width + 1` state codes, `width` being the number of
//! consecutive state-boundary events it spans (1, 2 or 3). One tagged type
//! covers all widths; the named patterns of interest live in static tables
//! iterated directly.

use std::fmt;

use crate::history::error::{HistoryError, HistoryResult};
use crate::state::EndState;

/// Largest number of state-boundary events a pattern may span.
pub const MAX_WIDTH: usize = 3;

/// Named single-transition patterns (width 1).
pub const SINGLE_PATTERNS: [&str; 11] = [
    "sg", "pg", "gs", "ps", "gp", "sp", "cs", "cg", "gd", "sd", "pd",
];

/// Named two-transition patterns (width 2).
pub const DOUBLE_PATTERNS: [&str; 9] = [
    "gsg", "psg", "csg", "gps", "cgs", "cgp", "sgs", "pgs", "sgp",
];

/// Named three-transition patterns (width 3).
pub const TRIPLE_PATTERNS: [&str; 2] = ["sgps", "cgps"];

/// A run of consecutive end states to locate in event streams.
///
/// # Examples
///
/// ```
/// use cytoskeleton_dynamics_core::Pattern;
///
/// let p = Pattern::parse("sgps").unwrap();
/// assert_eq!(p.width(), 3);
/// assert_eq!(p.name(), "sgps");
/// assert_eq!(p.merged().name(), "growth+pause+shrink");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    width: usize,
    states: [EndState; MAX_WIDTH + 1],
}

impl Pattern {
    /// Parse a pattern from 2 to 4 one-letter state names.
    ///
    /// The first letter is the state preceding the run; the remaining
    /// letters are the consecutive states the run visits. Unknown letters
    /// and unsupported lengths fail fast.
    pub fn parse(s: &str) -> HistoryResult<Self> {
        let letters: Vec<char> = s.chars().collect();
        if letters.len() < 2 || letters.len() > MAX_WIDTH + 1 {
            return Err(HistoryError::pattern_width(letters.len()));
        }
        let mut states = [EndState::Undefined; MAX_WIDTH + 1];
        for (k, &c) in letters.iter().enumerate() {
            states[k] = EndState::from_short(c)?;
        }
        Ok(Self {
            width: letters.len() - 1,
            states,
        })
    }

    /// Number of state-boundary events the pattern spans.
    pub fn width(&self) -> usize {
        self.width
    }

    /// State at position `k` of the run, `k` in `0..=width`.
    pub fn state(&self, k: usize) -> EndState {
        debug_assert!(k <= self.width);
        self.states[k]
    }

    /// The label a merged category of this pattern carries: the leading
    /// state is opened up, the visited states are kept.
    pub fn merged(&self) -> Pattern {
        let mut states = self.states;
        states[0] = EndState::Undefined;
        Pattern {
            width: self.width,
            states,
        }
    }

    /// Whether this pattern labels a merged category rather than a
    /// concrete transition run.
    pub fn is_merged(&self) -> bool {
        self.states[0] == EndState::Undefined
    }

    /// Human-readable designation.
    ///
    /// Concrete runs concatenate one-letter names (`"gs"`, `"sgps"`);
    /// merged categories spell out the visited states (`"shrink"`,
    /// `"growth+pause+shrink"`).
    pub fn name(&self) -> String {
        if self.is_merged() {
            self.states[1..=self.width]
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join("+")
        } else {
            self.states[..=self.width].iter().map(|s| s.short()).collect()
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Every named pattern of the given width, parsed from the static tables.
pub fn named_patterns(width: usize) -> Vec<Pattern> {
    let table: &[&str] = match width {
        1 => &SINGLE_PATTERNS,
        2 => &DOUBLE_PATTERNS,
        3 => &TRIPLE_PATTERNS,
        _ => &[],
    };
    table
        .iter()
        .map(|s| Pattern::parse(s).expect("static pattern tables hold valid state letters"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assigns_width_from_length() {
        assert_eq!(Pattern::parse("gs").unwrap().width(), 1);
        assert_eq!(Pattern::parse("sgs").unwrap().width(), 2);
        assert_eq!(Pattern::parse("sgps").unwrap().width(), 3);
    }

    #[test]
    fn parse_rejects_bad_lengths() {
        assert_eq!(
            Pattern::parse("g").unwrap_err(),
            HistoryError::pattern_width(1)
        );
        assert_eq!(
            Pattern::parse("sgpsg").unwrap_err(),
            HistoryError::pattern_width(5)
        );
    }

    #[test]
    fn parse_rejects_unknown_letters() {
        assert_eq!(
            Pattern::parse("gx").unwrap_err(),
            HistoryError::unknown_state('x')
        );
    }

    #[test]
    fn concrete_names_are_short() {
        assert_eq!(Pattern::parse("gs").unwrap().name(), "gs");
        assert_eq!(Pattern::parse("cgps").unwrap().name(), "cgps");
    }

    #[test]
    fn merged_names_spell_out_states() {
        assert_eq!(Pattern::parse("gs").unwrap().merged().name(), "shrink");
        assert_eq!(Pattern::parse("sg").unwrap().merged().name(), "growth");
        assert_eq!(
            Pattern::parse("gsg").unwrap().merged().name(),
            "shrink+growth"
        );
        assert_eq!(
            Pattern::parse("sgps").unwrap().merged().name(),
            "growth+pause+shrink"
        );
    }

    #[test]
    fn merged_is_idempotent_on_label() {
        let p = Pattern::parse("pgs").unwrap().merged();
        assert_eq!(p.merged(), p);
    }

    #[test]
    fn tables_cover_expected_counts() {
        assert_eq!(named_patterns(1).len(), 11);
        assert_eq!(named_patterns(2).len(), 9);
        assert_eq!(named_patterns(3).len(), 2);
        assert!(named_patterns(4).is_empty());
    }

    #[test]
    fn table_entries_all_parse_to_their_width() {
        for (w, table) in [
            (1usize, &SINGLE_PATTERNS[..]),
            (2, &DOUBLE_PATTERNS[..]),
            (3, &TRIPLE_PATTERNS[..]),
        ] {
            for s in table {
                let p = Pattern::parse(s).unwrap();
                assert_eq!(p.width(), w, "pattern {}", s);
            }
        }
    }
}
