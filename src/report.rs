//! Scalar summary records handed to the external reporting service.

use serde::Serialize;

/// Mean and population standard deviation of one derived quantity,
/// together with its physical units.
///
/// An empty occurrence set yields `Stats::nan()`; consumers treat `NaN`
/// as "feature absent" rather than as a failure.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Stats {
    pub avg: f64,
    pub std: f64,
    pub units: &'static str,
}

impl Stats {
    pub fn new(avg: f64, std: f64, units: &'static str) -> Self {
        Self { avg, std, units }
    }

    /// The undefined statistic: `NaN` average and deviation, no units.
    pub fn nan() -> Self {
        Self {
            avg: f64::NAN,
            std: f64::NAN,
            units: "",
        }
    }

    pub fn is_nan(&self) -> bool {
        self.avg.is_nan()
    }
}

/// Mean and population standard deviation (ddof = 0) of a sample.
///
/// Returns `(NaN, NaN)` for an empty sample.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, var.sqrt())
}

/// Absolute near-zero test used for ratio denominators.
pub fn near_zero(v: f64) -> bool {
    v.abs() <= 1e-8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sample_is_nan() {
        let (avg, std) = mean_std(&[]);
        assert!(avg.is_nan());
        assert!(std.is_nan());
    }

    #[test]
    fn population_std_uses_ddof_zero() {
        let (avg, std) = mean_std(&[2.0, 4.0]);
        assert_eq!(avg, 3.0);
        assert_eq!(std, 1.0);
    }

    #[test]
    fn nan_stats_have_empty_units() {
        let s = Stats::nan();
        assert!(s.is_nan());
        assert_eq!(s.units, "");
    }

    #[test]
    fn near_zero_threshold() {
        assert!(near_zero(0.0));
        assert!(near_zero(5e-9));
        assert!(!near_zero(1e-6));
    }
}
