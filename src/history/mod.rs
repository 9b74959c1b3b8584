//! Transition-history analysis of filament end dynamics.
//!
//! Event streams are scanned for short state-transition patterns; the
//! matches accumulate into occurrence sets, which merge into composite
//! categories and feed the life-cycle statistics.

pub mod catalog;
pub mod cycle;
pub mod error;
pub mod frequency;
pub mod matcher;
pub mod occurrence;
pub mod pattern;
pub mod stream;

pub use catalog::{EventCatalog, RegionSummary, StateSummary};
pub use cycle::{CorrelatedCycles, CycleSummary, TimeFractions};
pub use error::{HistoryError, HistoryResult};
pub use frequency::{RecordingTime, StateFrequencies};
pub use matcher::collect_occurrences;
pub use occurrence::{merge, OccurrenceSet, OccurrenceStats};
pub use pattern::{named_patterns, Pattern, DOUBLE_PATTERNS, SINGLE_PATTERNS, TRIPLE_PATTERNS};
pub use stream::{EventRecord, EventStream, CAS_CHANNELS};

#[cfg(test)]
mod tests {
    //! End-to-end checks over synthetic recordings.

    use super::*;
    use crate::config::{AnalysisConfig, Region};
    use crate::data::{generate_streams, SyntheticConfig};

    fn streams() -> Vec<EventStream> {
        generate_streams(&SyntheticConfig::default())
    }

    #[test]
    fn matched_runs_always_fit_inside_their_stream() {
        let config = AnalysisConfig::default();
        let streams = streams();
        for width in 1..=3usize {
            for pattern in named_patterns(width) {
                let set = collect_occurrences(&streams, &pattern, &Region::full(), &config);
                for (&j, &i) in set.filament.iter().zip(set.index.iter()) {
                    assert!(i + width < streams[j].len());
                }
                assert!(set.dtime.iter().all(|&dt| dt != 0.0));
            }
        }
    }

    #[test]
    fn disjoint_covering_regions_partition_every_pattern() {
        let config = AnalysisConfig::default();
        let streams = streams();
        let split = 4.0;
        let inner = Region::new("inner", 0.0, split).unwrap();
        let outer = Region::new("outer", split, f32::MAX).unwrap();

        for pattern in named_patterns(1) {
            let all = collect_occurrences(&streams, &pattern, &Region::full(), &config);
            let a = collect_occurrences(&streams, &pattern, &inner, &config);
            let b = collect_occurrences(&streams, &pattern, &outer, &config);
            assert_eq!(
                a.count() + b.count(),
                all.count(),
                "pattern {}",
                pattern.name()
            );
        }
    }

    #[test]
    fn composite_counts_add_up() {
        let config = AnalysisConfig::default();
        let catalog = EventCatalog::collect(&streams(), Region::full(), &config).unwrap();

        let n = |name: &str| catalog.elementary(name).unwrap().count();
        assert_eq!(catalog.shrink.count(), n("gs") + n("ps") + n("cs"));
        assert_eq!(catalog.growth.count(), n("sg") + n("pg") + n("cg"));
        assert_eq!(catalog.pause.count(), n("gp") + n("sp"));
        assert_eq!(
            catalog.growth_then_shrink.count(),
            n("sgs") + n("pgs") + n("cgs")
        );
        assert_eq!(catalog.growth_pause_shrink.count(), n("sgps") + n("cgps"));
    }

    #[test]
    fn pooled_means_are_count_weighted() {
        let config = AnalysisConfig::default();
        let catalog = EventCatalog::collect(&streams(), Region::full(), &config).unwrap();

        let parts = ["gs", "ps", "cs"].map(|n| catalog.elementary(n).unwrap().compute());
        let total: usize = parts.iter().map(|s| s.count).sum();
        let weighted: f64 = parts
            .iter()
            .filter(|s| s.count > 0)
            .map(|s| s.count as f64 * s.duration.avg)
            .sum::<f64>()
            / total as f64;

        assert!(total > 0, "synthetic walk should produce shrink events");
        assert!((catalog.shrink.compute().duration.avg - weighted).abs() < 1e-9);
    }

    #[test]
    fn full_summary_is_serializable_end_to_end() {
        let config = AnalysisConfig::default();
        let catalog = EventCatalog::collect(&streams(), Region::full(), &config).unwrap();
        let text = serde_json::to_string(&catalog.summarize()).unwrap();
        assert!(text.contains("cycle_uncorrelated"));
        assert!(text.contains("growth+pause+shrink"));
        assert!(text.contains("recovery_to_catastrophe"));
    }
}
