//! Kinetic states a microtubule end adopts during dynamic instability.

use serde::{Deserialize, Serialize};

use crate::history::HistoryError;

/// Kinetic state of a filament end.
///
/// Event records store the numeric codes of the states bracketing each
/// transition. `Undefined` never occurs in recorded transitions; it marks
/// the open leading position of a merged occurrence category.
///
/// # Examples
///
/// ```
/// use cytoskeleton_dynamics_core::EndState;
///
/// let s = EndState::from_short('g').unwrap();
/// assert_eq!(s, EndState::Growing);
/// assert_eq!(s.short(), 'g');
/// assert_eq!(s.name(), "growth");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndState {
    Undefined,
    Growing,
    Shrinking,
    Paused,
    Connected,
    Depolymerized,
}

impl EndState {
    /// Numeric code used in stored event records.
    pub fn code(self) -> i32 {
        match self {
            EndState::Undefined => -1,
            EndState::Growing => 0,
            EndState::Shrinking => 1,
            EndState::Paused => 2,
            EndState::Connected => 3,
            EndState::Depolymerized => 4,
        }
    }

    /// One-letter designation used in pattern strings.
    pub fn short(self) -> char {
        match self {
            EndState::Undefined => 'o',
            EndState::Growing => 'g',
            EndState::Shrinking => 's',
            EndState::Paused => 'p',
            EndState::Connected => 'c',
            EndState::Depolymerized => 'd',
        }
    }

    /// Long designation used for naming merged categories.
    pub fn name(self) -> &'static str {
        match self {
            EndState::Undefined => "undef",
            EndState::Growing => "growth",
            EndState::Shrinking => "shrink",
            EndState::Paused => "pause",
            EndState::Connected => "connect",
            EndState::Depolymerized => "depol",
        }
    }

    /// Parse a one-letter state designation.
    ///
    /// An unknown letter is a hard error: pattern specifications are static
    /// configuration and must fail fast instead of matching nothing.
    pub fn from_short(letter: char) -> Result<Self, HistoryError> {
        match letter.to_ascii_lowercase() {
            'o' => Ok(EndState::Undefined),
            'g' => Ok(EndState::Growing),
            's' => Ok(EndState::Shrinking),
            'p' => Ok(EndState::Paused),
            'c' => Ok(EndState::Connected),
            'd' => Ok(EndState::Depolymerized),
            other => Err(HistoryError::unknown_state(other)),
        }
    }

    /// Code as stored in the `u32` state columns of an event stream.
    ///
    /// `Undefined` wraps to a value no recorded transition carries, so a
    /// merged category never matches raw records by accident.
    pub fn storage_code(self) -> u32 {
        self.code() as u32
    }
}
