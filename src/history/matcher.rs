//! Pattern scanning over filament event streams.
//!
//! One generic scan covers every pattern width: a candidate index matches
//! when the state preceding it and the `width` states following it equal the
//! pattern, and the occurrence start lies inside the spatial region.

use crate::config::{AnalysisConfig, Region};
use crate::history::occurrence::OccurrenceSet;
use crate::history::pattern::Pattern;
use crate::history::stream::EventStream;

/// Scan every stream for `pattern` and accumulate the surviving
/// occurrences.
///
/// The region filter applies to the distance-to-center of the FIRST event
/// of each run. Zero-duration occurrences are discarded after the scan.
/// An empty result is a valid outcome, not a failure.
///
/// # Examples
///
/// ```
/// use cytoskeleton_dynamics_core::{collect_occurrences, AnalysisConfig, Pattern, Region};
/// use cytoskeleton_dynamics_core::data::{generate_streams, SyntheticConfig};
///
/// let config = AnalysisConfig::default();
/// let streams = generate_streams(&SyntheticConfig::default());
/// let pattern = Pattern::parse("gs").unwrap();
/// let set = collect_occurrences(&streams, &pattern, &Region::full(), &config);
/// let stats = set.compute();
/// assert_eq!(stats.count, set.count());
/// ```
pub fn collect_occurrences(
    streams: &[EventStream],
    pattern: &Pattern,
    region: &Region,
    config: &AnalysisConfig,
) -> OccurrenceSet {
    let mut set = OccurrenceSet::new(*pattern, config.schema);
    let w = pattern.width();

    for (j, stream) in streams.iter().enumerate() {
        let n = stream.len();
        if n <= w {
            continue;
        }
        let hits = matching_indices(stream, pattern, region);
        if !hits.is_empty() {
            set.append(stream, &hits, j, config.edge_len);
        }
    }
    set.retain_finite_durations();
    set
}

/// Candidate indices of one stream where the pattern matches.
fn matching_indices(stream: &EventStream, pattern: &Pattern, region: &Region) -> Vec<usize> {
    let w = pattern.width();
    let n = stream.len();
    if n <= w {
        return Vec::new();
    }
    let first = pattern.state(0).storage_code();

    let mut hits = Vec::new();
    'candidates: for i in 0..n - w {
        if stream.state_fr[i] != first {
            continue;
        }
        for k in 0..w {
            if stream.state_to[i + k] != pattern.state(k + 1).storage_code() {
                continue 'candidates;
            }
        }
        if region.contains(stream.dist0[i]) {
            hits.push(i);
        }
    }
    hits
}
