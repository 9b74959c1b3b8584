//! Growth/shrink/pause life-cycle decomposition.
//!
//! Two views of the same cycle: an uncorrelated one treating the phases as
//! independent, and a correlated one built from phase sequences actually
//! observed in order. Degenerate ratios are absorbed into `NaN` and logged,
//! never raised.

use serde::Serialize;
use tracing::info;

use crate::history::catalog::EventCatalog;
use crate::report::{mean_std, near_zero, Stats};

/// Relative phase contributions to a cycle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimeFractions {
    pub growth: f64,
    pub shrink: f64,
    /// Absent in two-phase cycle views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause: Option<f64>,
}

impl TimeFractions {
    fn all_nan(&self) -> bool {
        self.growth.is_nan() && self.shrink.is_nan() && self.pause.map_or(true, f64::is_nan)
    }
}

/// Duration and phase decomposition of one cycle view.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CycleSummary {
    pub duration: Stats,
    pub time_fraction: TimeFractions,
}

/// The three correlated cycle views derived from observed phase sequences.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CorrelatedCycles {
    /// Shrink followed by growth.
    pub sg: CycleSummary,
    /// Growth followed by shrink.
    pub gs: CycleSummary,
    /// Growth ending in shrink, with or without an intervening pause.
    pub g0s: CycleSummary,
}

/// A phase share of a cycle; `NaN` on a vanishing or undefined denominator.
fn fraction(phase_mean: f64, cycle_mean: f64) -> f64 {
    if near_zero(cycle_mean) {
        f64::NAN
    } else {
        phase_mean / cycle_mean
    }
}

impl EventCatalog {
    /// Cycle statistics with growth, shrink and pause taken as independent
    /// phases.
    ///
    /// The cycle duration is the sum of the three phase mean durations; its
    /// spread is the spread of those three means.
    pub fn cycle_uncorrelated(&self) -> CycleSummary {
        let m_s = self.shrink.compute().duration.avg;
        let m_g = self.growth.compute().duration.avg;
        let m_p = self.pause.compute().duration.avg;

        let phases = [m_s, m_g, m_p];
        let (_, spread) = mean_std(&phases);
        let duration = Stats::new(phases.iter().sum(), spread, "sec");
        info!(
            "uncorrelated {} cycle duration: {} ± {} sec",
            self.region().name,
            duration.avg,
            duration.std
        );

        let time_fraction = TimeFractions {
            growth: fraction(m_g, duration.avg),
            shrink: fraction(m_s, duration.avg),
            pause: Some(fraction(m_p, duration.avg)),
        };
        info!(
            "uncorrelated {} growth/shrink/pause time fractions: {} / {} / {}",
            self.region().name,
            time_fraction.growth,
            time_fraction.shrink,
            time_fraction.pause.unwrap_or(f64::NAN)
        );
        if time_fraction.all_nan() {
            info!(
                "no growth/shrink cycle detected for end {}: time fractions undefined",
                self.end()
            );
        }

        CycleSummary {
            duration,
            time_fraction,
        }
    }

    /// Cycle statistics from phase sequences observed in order.
    ///
    /// The combined growth-ending-in-shrink population pools the direct and
    /// the pause-interrupted compounds by occurrence count; it is undefined
    /// unless both compounds were observed.
    pub fn cycle_correlated(&self) -> CorrelatedCycles {
        let m_g = self.growth.compute().duration.avg;
        let m_s = self.shrink.compute().duration.avg;
        let m_p = self.pause.compute().duration.avg;

        let sg_dur = self.shrink_then_growth.compute().duration;
        let sg = CycleSummary {
            duration: sg_dur,
            time_fraction: TimeFractions {
                growth: fraction(m_g, sg_dur.avg),
                shrink: fraction(m_s, sg_dur.avg),
                pause: None,
            },
        };
        info!(
            "correlated {} sg cycle: duration {} ± {}, growth fraction {}, shrink fraction {}",
            self.region().name,
            sg.duration.avg,
            sg.duration.std,
            sg.time_fraction.growth,
            sg.time_fraction.shrink
        );

        let gs_dur = self.growth_then_shrink.compute().duration;
        let gs = CycleSummary {
            duration: gs_dur,
            time_fraction: TimeFractions {
                growth: fraction(m_g, gs_dur.avg),
                shrink: fraction(m_s, gs_dur.avg),
                pause: None,
            },
        };
        info!(
            "correlated {} gs cycle: duration {} ± {}, growth fraction {}, shrink fraction {}",
            self.region().name,
            gs.duration.avg,
            gs.duration.std,
            gs.time_fraction.growth,
            gs.time_fraction.shrink
        );

        let gps_dur = self.growth_pause_shrink.compute().duration;
        let n_gs = self.growth_then_shrink.count();
        let n_gps = self.growth_pause_shrink.count();

        let g0s_dur = if n_gs > 0 && n_gps > 0 && !gs_dur.avg.is_nan() && !gps_dur.avg.is_nan() {
            let total = (n_gs + n_gps) as f64;
            let avg = (n_gs as f64 * gs_dur.avg + n_gps as f64 * gps_dur.avg) / total;
            let std = ((n_gs as f64 * gs_dur.std).powi(2) + (n_gps as f64 * gps_dur.std).powi(2))
                .sqrt()
                / total;
            Stats::new(avg, std, "sec")
        } else {
            Stats::nan()
        };
        info!(
            "correlated {} g0s cycle duration: {} ± {} {}",
            self.region().name,
            g0s_dur.avg,
            g0s_dur.std,
            g0s_dur.units
        );

        // Phase shares of the pooled cycle use the base-state means, not
        // the compound durations.
        let g0s = CycleSummary {
            duration: g0s_dur,
            time_fraction: TimeFractions {
                growth: fraction(m_g, g0s_dur.avg),
                shrink: fraction(m_s, g0s_dur.avg),
                pause: Some(fraction(m_p, g0s_dur.avg)),
            },
        };
        if g0s.time_fraction.all_nan() {
            info!(
                "no growth/shrink cycle detected for region '{}' end {}: time fractions undefined",
                self.region().name,
                self.end()
            );
        }

        CorrelatedCycles { sg, gs, g0s }
    }
}
