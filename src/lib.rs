//! # Cytoskeleton Dynamics Core
//!
//! Batch analysis of simulated microtubule dynamic instability. Each
//! filament end contributes a time-ordered stream of state transitions with
//! positional, geometric and kinetic side channels; this crate locates short
//! transition patterns in those streams, derives per-occurrence kinetics
//! (duration, elongation, velocity, end reorientation), merges pattern
//! alternatives into composite categories and decomposes the
//! growth/shrink/pause life cycle into population statistics.
//!
//! ## Quick Start
//!
//! ```rust
//! use cytoskeleton_dynamics_core::{AnalysisConfig, EventCatalog, Region};
//! use cytoskeleton_dynamics_core::data::{generate_streams, SyntheticConfig};
//!
//! let config = AnalysisConfig::default();
//! let streams = generate_streams(&SyntheticConfig::default());
//!
//! let catalog = EventCatalog::collect(&streams, Region::full(), &config).unwrap();
//! let summary = catalog.summarize();
//!
//! // The growth category pools every transition entering growth.
//! assert!(summary.states["growth"].count >= summary.states["sg"].count);
//! ```
//!
//! ## Core Modules
//!
//! - [`config`] - run-wide analysis parameters via TOML
//! - [`history`] - event streams, pattern matching, occurrence statistics
//! - [`data`] - seeded synthetic recordings
//! - [`logging`] - JSON line-delimited summary export

pub mod config;
pub mod data;
pub mod history;
pub mod logging;
pub mod report;
pub mod state;

pub use config::{AnalysisConfig, ConfigError, Region, SchemaVersion};
pub use history::{
    collect_occurrences, merge, named_patterns, CorrelatedCycles, CycleSummary, EventCatalog,
    EventRecord, EventStream, HistoryError, HistoryResult, OccurrenceSet, OccurrenceStats,
    Pattern, RecordingTime, RegionSummary, StateFrequencies, StateSummary, TimeFractions,
};
pub use logging::log_region_summary;
pub use report::Stats;
pub use state::EndState;
