//! Transition frequencies of the major end states.
//!
//! Region-filtered event counts are related to the cell-wide recording
//! window, giving catastrophe, recovery and pause rates together with the
//! derived catastrophe ratios. Zero or undefined denominators yield `NaN`
//! and are logged, never raised.

use serde::Serialize;
use tracing::info;

use crate::history::catalog::EventCatalog;
use crate::history::stream::EventStream;
use crate::report::near_zero;

/// Time window covered by the recorded streams.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecordingTime {
    /// Earliest event time over all streams, seconds.
    pub begin: f64,
    /// Latest event time over all streams, seconds.
    pub end: f64,
    /// Length of the monitored period, seconds.
    pub duration: f64,
}

impl RecordingTime {
    /// Time boundaries of the monitored period over every stream.
    ///
    /// Streams without events contribute nothing; a fully empty input
    /// yields `NaN` boundaries.
    pub fn from_streams(streams: &[EventStream]) -> Self {
        let mut begin = f64::INFINITY;
        let mut end = f64::NEG_INFINITY;
        for s in streams {
            for &t in s.time.iter() {
                begin = begin.min(t);
                end = end.max(t);
            }
        }
        if begin > end {
            return Self {
                begin: f64::NAN,
                end: f64::NAN,
                duration: f64::NAN,
            };
        }
        Self {
            begin,
            end,
            duration: end - begin,
        }
    }
}

/// Absolute frequencies (1/sec) of transitions into the major state
/// types, with the derived catastrophe ratios.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StateFrequencies {
    /// Transitions into shrink per second of recording.
    pub catastrophes: f64,
    /// Transitions into growth per second of recording.
    pub recoveries: f64,
    /// Transitions into pause per second of recording.
    pub pauses: f64,
    /// Share of catastrophes entered directly from growth, without an
    /// intervening pause.
    pub fraction_spontaneous_catastrophes: f64,
    /// Recovery frequency over catastrophe frequency.
    pub recovery_to_catastrophe: f64,
}

impl EventCatalog {
    /// Transition frequencies of the major state types.
    ///
    /// Counts are region-filtered; the recording window spans every
    /// stream handed to [`EventCatalog::collect`].
    pub fn state_frequencies(&self) -> StateFrequencies {
        let duration = self.recording_time().duration;
        let rate = |count: usize| -> f64 {
            if duration.is_nan() || near_zero(duration) {
                f64::NAN
            } else {
                count as f64 / duration
            }
        };

        let catastrophes = rate(self.shrink.count());
        let recoveries = rate(self.growth.count());
        let pauses = rate(self.pause.count());
        for (kind, v) in [
            ("catastrophes", catastrophes),
            ("recoveries", recoveries),
            ("pauses", pauses),
        ] {
            info!(
                "frequency of {} {}: {} 1/sec",
                self.region().name,
                kind,
                v
            );
        }

        let n_shrink = self.shrink.count();
        let fraction_spontaneous_catastrophes = if n_shrink > 0 {
            let n_gs = self
                .elementary("gs")
                .expect("the static pattern tables name gs")
                .count();
            n_gs as f64 / n_shrink as f64
        } else {
            f64::NAN
        };
        info!(
            "fraction of spontaneous {} catastrophes: {}",
            self.region().name,
            fraction_spontaneous_catastrophes
        );

        let recovery_to_catastrophe = if catastrophes == 0.0 {
            f64::NAN
        } else {
            recoveries / catastrophes
        };
        info!(
            "ratio of {} recoveries to catastrophes: {}",
            self.region().name,
            recovery_to_catastrophe
        );

        StateFrequencies {
            catastrophes,
            recoveries,
            pauses,
            fraction_spontaneous_catastrophes,
            recovery_to_catastrophe,
        }
    }
}
