//! Region-wide catalog of pattern occurrences and composite categories.
//!
//! For one spatial region the catalog instantiates every named pattern of
//! the static tables, then merges the alternatives that converge on the
//! same kinetic outcome into the growth/shrink/pause base states and the
//! multi-phase compounds used by the cycle statistics.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{AnalysisConfig, Region};
use crate::history::cycle::{CorrelatedCycles, CycleSummary};
use crate::history::error::HistoryResult;
use crate::history::frequency::{RecordingTime, StateFrequencies};
use crate::history::matcher::collect_occurrences;
use crate::history::occurrence::{merge, OccurrenceSet};
use crate::history::pattern::{named_patterns, Pattern};
use crate::history::stream::EventStream;
use crate::report::Stats;

/// Reported characteristics of one pattern or composite category.
///
/// Derived statistics are present only when at least one occurrence was
/// observed; reorientation additionally requires orientation data in the
/// recording schema.
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elongation: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorientation: Option<Stats>,
}

impl StateSummary {
    fn from_set(set: &OccurrenceSet) -> Self {
        let stats = set.compute();
        if stats.count == 0 {
            return Self {
                count: 0,
                duration: None,
                elongation: None,
                velocity: None,
                reorientation: None,
            };
        }
        Self {
            count: stats.count,
            duration: Some(stats.duration),
            elongation: Some(stats.elongation),
            velocity: Some(stats.velocity),
            reorientation: stats.reorientation,
        }
    }
}

/// The nested per-region summary handed to the external reporting service.
#[derive(Debug, Clone, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub end: u8,
    pub recording_time: RecordingTime,
    /// Pattern or category name to its reported characteristics.
    pub states: BTreeMap<String, StateSummary>,
    pub frequencies: StateFrequencies,
    pub cycle_uncorrelated: CycleSummary,
    pub cycle_correlated: CorrelatedCycles,
}

/// All named occurrence sets of one spatial region, plus the derived
/// composite categories.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    region: Region,
    end: u8,
    recording: RecordingTime,
    singles: BTreeMap<String, OccurrenceSet>,
    doubles: BTreeMap<String, OccurrenceSet>,
    triples: BTreeMap<String, OccurrenceSet>,

    /// Growth state from any predecessor.
    pub growth: OccurrenceSet,
    /// Shrink state from any predecessor.
    pub shrink: OccurrenceSet,
    /// Pause state from any predecessor.
    pub pause: OccurrenceSet,
    /// Shrink phase followed by growth.
    pub shrink_then_growth: OccurrenceSet,
    /// Growth phase followed by shrink.
    pub growth_then_shrink: OccurrenceSet,
    /// Growth, pause, then shrink.
    pub growth_pause_shrink: OccurrenceSet,
}

impl EventCatalog {
    /// Scan the streams for every named pattern within `region` and build
    /// the composite categories.
    ///
    /// # Examples
    ///
    /// ```
    /// use cytoskeleton_dynamics_core::{AnalysisConfig, EventCatalog, Region};
    /// use cytoskeleton_dynamics_core::data::{generate_streams, SyntheticConfig};
    ///
    /// let config = AnalysisConfig::default();
    /// let streams = generate_streams(&SyntheticConfig::default());
    /// let catalog = EventCatalog::collect(&streams, Region::full(), &config).unwrap();
    /// assert_eq!(
    ///     catalog.shrink.count(),
    ///     catalog.elementary("gs").unwrap().count()
    ///         + catalog.elementary("ps").unwrap().count()
    ///         + catalog.elementary("cs").unwrap().count()
    /// );
    /// ```
    pub fn collect(
        streams: &[EventStream],
        region: Region,
        config: &AnalysisConfig,
    ) -> HistoryResult<Self> {
        let scan = |width: usize| -> BTreeMap<String, OccurrenceSet> {
            named_patterns(width)
                .into_iter()
                .map(|p: Pattern| {
                    (
                        p.name(),
                        collect_occurrences(streams, &p, &region, config),
                    )
                })
                .collect()
        };

        let singles = scan(1);
        let doubles = scan(2);
        let triples = scan(3);
        let recording = RecordingTime::from_streams(streams);

        let get = |m: &BTreeMap<String, OccurrenceSet>, name: &str| -> OccurrenceSet {
            m.get(name)
                .expect("composite parts come from the static pattern tables")
                .clone()
        };

        // Base states arise from every transition type converging on them.
        let shrink = merge(
            &merge(&get(&singles, "gs"), &get(&singles, "ps"))?,
            &get(&singles, "cs"),
        )?;
        let growth = merge(
            &merge(&get(&singles, "sg"), &get(&singles, "pg"))?,
            &get(&singles, "cg"),
        )?;
        let pause = merge(&get(&singles, "gp"), &get(&singles, "sp"))?;

        let shrink_then_growth = merge(
            &merge(&get(&doubles, "gsg"), &get(&doubles, "psg"))?,
            &get(&doubles, "csg"),
        )?;
        let growth_then_shrink = merge(
            &merge(&get(&doubles, "sgs"), &get(&doubles, "pgs"))?,
            &get(&doubles, "cgs"),
        )?;

        let growth_pause_shrink = merge(&get(&triples, "sgps"), &get(&triples, "cgps"))?;

        Ok(Self {
            region,
            end: config.end,
            recording,
            singles,
            doubles,
            triples,
            growth,
            shrink,
            pause,
            shrink_then_growth,
            growth_then_shrink,
            growth_pause_shrink,
        })
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn end(&self) -> u8 {
        self.end
    }

    /// Time window covered by the analyzed streams.
    pub fn recording_time(&self) -> &RecordingTime {
        &self.recording
    }

    /// Look up an elementary occurrence set by its pattern name.
    pub fn elementary(&self, name: &str) -> Option<&OccurrenceSet> {
        self.singles
            .get(name)
            .or_else(|| self.doubles.get(name))
            .or_else(|| self.triples.get(name))
    }

    /// Iterate every elementary set, singles first.
    pub fn iter_elementary(&self) -> impl Iterator<Item = (&String, &OccurrenceSet)> {
        self.singles
            .iter()
            .chain(self.doubles.iter())
            .chain(self.triples.iter())
    }

    /// Build the nested summary for the reporting service.
    ///
    /// An entirely event-free region is reported (every statistic `NaN`)
    /// and flagged once as a likely misconfiguration of its borders.
    pub fn summarize(&self) -> RegionSummary {
        if self.singles.values().map(|s| s.count()).sum::<usize>() == 0 {
            warn!(
                "no event of any type detected in region '{}': are the region borders meaningful?",
                self.region.name
            );
        }

        let mut states = BTreeMap::new();
        for (name, set) in self.iter_elementary() {
            if set.is_empty() {
                info!(
                    "no events of type {} in region '{}': skipping report",
                    name, self.region.name
                );
            }
            states.insert(name.clone(), StateSummary::from_set(set));
        }
        for set in [
            &self.growth,
            &self.shrink,
            &self.pause,
            &self.shrink_then_growth,
            &self.growth_then_shrink,
            &self.growth_pause_shrink,
        ] {
            states.insert(set.name(), StateSummary::from_set(set));
        }

        RegionSummary {
            region: self.region.name.clone(),
            end: self.end,
            recording_time: self.recording,
            states,
            frequencies: self.state_frequencies(),
            cycle_uncorrelated: self.cycle_uncorrelated(),
            cycle_correlated: self.cycle_correlated(),
        }
    }
}
