//! Accumulated pattern occurrences and their derived kinetics.
//!
//! An `OccurrenceSet` collects, across all filaments, every position where
//! its pattern matched, together with the per-occurrence quantities derived
//! from the source stream. Sets over the same width can be combined with
//! [`merge`] into a named composite category.

use serde::Serialize;

use crate::config::SchemaVersion;
use crate::history::error::{HistoryError, HistoryResult};
use crate::history::pattern::Pattern;
use crate::history::stream::{EventStream, CAS_CHANNELS};
use crate::report::{mean_std, Stats};

/// Derived scalar summaries of one occurrence set.
///
/// Every statistic of an empty set is `NaN`; `reorientation` is `None`
/// when the recording schema carries no orientation data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OccurrenceStats {
    pub count: usize,
    pub duration: Stats,
    pub elongation: Stats,
    pub velocity: Stats,
    pub reorientation: Option<Stats>,
}

/// Vectorized union, across all filaments, of the matches of one pattern.
#[derive(Debug, Clone)]
pub struct OccurrenceSet {
    pattern: Pattern,
    schema: SchemaVersion,

    /// Source filament of each occurrence.
    pub filament: Vec<usize>,
    /// Event index of each occurrence within its stream.
    pub index: Vec<usize>,
    /// Cumulative growth counter at the occurrence start (V2 only).
    pub ngrw: Vec<u64>,
    /// Cumulative shrink counter at the occurrence start (V2 only).
    pub nshr: Vec<u64>,
    /// Growth increments over the run (V2 only).
    pub dngrw: Vec<i32>,
    /// Shrink increments over the run (V2 only).
    pub dnshr: Vec<i32>,
    /// End reorientation over the run, degrees (V2 only).
    pub dornt: Vec<f32>,
    /// Net length change in polymerization units.
    pub dlen: Vec<i32>,
    /// Net length change, μm.
    pub dlen_um: Vec<f32>,
    /// Elapsed time over the run, seconds.
    pub dtime: Vec<f64>,
    /// Mean end velocity over the run, μm/min.
    pub vel: Vec<f32>,
    /// Filament length at the occurrence start.
    pub length: Vec<u32>,
    /// Time of the occurrence start.
    pub time: Vec<f64>,
    /// End position at the occurrence start.
    pub pos_fr: Vec<[f32; 3]>,
    /// End position at the occurrence end.
    pub pos_to: Vec<[f32; 3]>,
    /// Distance to the cell center at start.
    pub dist0_fr: Vec<f32>,
    /// Distance to the cell center at end.
    pub dist0_to: Vec<f32>,
    /// Distance to the plasma membrane at start.
    pub dist_plm: Vec<f32>,
    /// Distance to the nuclear membrane at start.
    pub dist_nuc: Vec<f32>,
    /// Auxiliary field intensities at start.
    pub cas: Vec<[f32; CAS_CHANNELS]>,
}

impl OccurrenceSet {
    /// An empty set for the given pattern and recording schema.
    pub fn new(pattern: Pattern, schema: SchemaVersion) -> Self {
        Self {
            pattern,
            schema,
            filament: Vec::new(),
            index: Vec::new(),
            ngrw: Vec::new(),
            nshr: Vec::new(),
            dngrw: Vec::new(),
            dnshr: Vec::new(),
            dornt: Vec::new(),
            dlen: Vec::new(),
            dlen_um: Vec::new(),
            dtime: Vec::new(),
            vel: Vec::new(),
            length: Vec::new(),
            time: Vec::new(),
            pos_fr: Vec::new(),
            pos_to: Vec::new(),
            dist0_fr: Vec::new(),
            dist0_to: Vec::new(),
            dist_plm: Vec::new(),
            dist_nuc: Vec::new(),
            cas: Vec::new(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Designation of the owning pattern or composite category.
    pub fn name(&self) -> String {
        self.pattern.name()
    }

    /// Number of accumulated occurrences.
    pub fn count(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Append the occurrences at `hits` of one stream.
    ///
    /// `hits` are match indices produced by the scan; each index `i`
    /// satisfies `i + width < stream.len()`. Occurrence order reflects
    /// filament processing order, which carries no meaning downstream.
    pub fn append(
        &mut self,
        stream: &EventStream,
        hits: &[usize],
        filament_idx: usize,
        edge_len: f32,
    ) {
        let w = self.pattern.width();
        let counters = stream.ngrw.as_ref().zip(stream.nshr.as_ref());

        for &i in hits {
            let dtime = stream.time[i + w] - stream.time[i];

            let dlen = match counters {
                Some((ngrw, nshr)) => {
                    let dngrw = ngrw[i + w].wrapping_sub(ngrw[i]) as i32;
                    let dnshr = nshr[i + w].wrapping_sub(nshr[i]) as i32;
                    self.ngrw.push(ngrw[i]);
                    self.nshr.push(nshr[i]);
                    self.dngrw.push(dngrw);
                    self.dnshr.push(dnshr);
                    dngrw - dnshr
                }
                None => stream.length[i + w] as i32 - stream.length[i] as i32,
            };
            let dlen_um = dlen as f32 * edge_len;

            // Zero-duration rows are discarded later; the division must
            // still be safe on the boundary.
            let vel = if dtime != 0.0 {
                (f64::from(dlen_um) / dtime * 60.0) as f32
            } else {
                0.0
            };

            if let Some(ornt) = &stream.ornt {
                let dot = ornt[[i, 0]] * ornt[[i + w, 0]]
                    + ornt[[i, 1]] * ornt[[i + w, 1]]
                    + ornt[[i, 2]] * ornt[[i + w, 2]];
                let angle = dot.clamp(-1.0, 1.0).acos().to_degrees();
                self.dornt.push(angle);
            }

            self.filament.push(filament_idx);
            self.index.push(i);
            self.dlen.push(dlen);
            self.dlen_um.push(dlen_um);
            self.dtime.push(dtime);
            self.vel.push(vel);
            self.length.push(stream.length[i]);
            self.time.push(stream.time[i]);
            self.pos_fr
                .push([stream.pos[[i, 0]], stream.pos[[i, 1]], stream.pos[[i, 2]]]);
            self.pos_to.push([
                stream.pos[[i + w, 0]],
                stream.pos[[i + w, 1]],
                stream.pos[[i + w, 2]],
            ]);
            self.dist0_fr.push(stream.dist0[i]);
            self.dist0_to.push(stream.dist0[i + w]);
            self.dist_plm.push(stream.dist_plm[i]);
            self.dist_nuc.push(stream.dist_nuc[i]);
            let mut cas = [0.0f32; CAS_CHANNELS];
            for (c, v) in cas.iter_mut().enumerate() {
                *v = stream.cas[[i, c]];
            }
            self.cas.push(cas);
        }
    }

    /// Drop occurrences whose elapsed time is exactly zero.
    ///
    /// Duplicate timestamps are a recording artifact, not a physical
    /// transition.
    pub fn retain_finite_durations(&mut self) {
        if self.dtime.iter().all(|&dt| dt != 0.0) {
            return;
        }
        let keep: Vec<bool> = self.dtime.iter().map(|&dt| dt != 0.0).collect();
        self.filter_rows(&keep);
    }

    fn filter_rows(&mut self, keep: &[bool]) {
        filter_in_place(&mut self.filament, keep);
        filter_in_place(&mut self.index, keep);
        filter_in_place(&mut self.ngrw, keep);
        filter_in_place(&mut self.nshr, keep);
        filter_in_place(&mut self.dngrw, keep);
        filter_in_place(&mut self.dnshr, keep);
        filter_in_place(&mut self.dornt, keep);
        filter_in_place(&mut self.dlen, keep);
        filter_in_place(&mut self.dlen_um, keep);
        filter_in_place(&mut self.dtime, keep);
        filter_in_place(&mut self.vel, keep);
        filter_in_place(&mut self.length, keep);
        filter_in_place(&mut self.time, keep);
        filter_in_place(&mut self.pos_fr, keep);
        filter_in_place(&mut self.pos_to, keep);
        filter_in_place(&mut self.dist0_fr, keep);
        filter_in_place(&mut self.dist0_to, keep);
        filter_in_place(&mut self.dist_plm, keep);
        filter_in_place(&mut self.dist_nuc, keep);
        filter_in_place(&mut self.cas, keep);
    }

    fn extend_from(&mut self, other: &OccurrenceSet) {
        self.filament.extend_from_slice(&other.filament);
        self.index.extend_from_slice(&other.index);
        self.ngrw.extend_from_slice(&other.ngrw);
        self.nshr.extend_from_slice(&other.nshr);
        self.dngrw.extend_from_slice(&other.dngrw);
        self.dnshr.extend_from_slice(&other.dnshr);
        self.dornt.extend_from_slice(&other.dornt);
        self.dlen.extend_from_slice(&other.dlen);
        self.dlen_um.extend_from_slice(&other.dlen_um);
        self.dtime.extend_from_slice(&other.dtime);
        self.vel.extend_from_slice(&other.vel);
        self.length.extend_from_slice(&other.length);
        self.time.extend_from_slice(&other.time);
        self.pos_fr.extend_from_slice(&other.pos_fr);
        self.pos_to.extend_from_slice(&other.pos_to);
        self.dist0_fr.extend_from_slice(&other.dist0_fr);
        self.dist0_to.extend_from_slice(&other.dist0_to);
        self.dist_plm.extend_from_slice(&other.dist_plm);
        self.dist_nuc.extend_from_slice(&other.dist_nuc);
        self.cas.extend_from_slice(&other.cas);
    }

    /// Compute the derived scalar summaries.
    ///
    /// Returns an immutable record; callers memoize it where repeated use
    /// matters. Never panics: an empty set yields `NaN` statistics.
    pub fn compute(&self) -> OccurrenceStats {
        OccurrenceStats {
            count: self.count(),
            duration: stats_f64(&self.dtime, "sec"),
            elongation: stats_f32(&self.dlen_um, "μm"),
            velocity: stats_f32(&self.vel, "μm/min"),
            reorientation: self
                .schema
                .has_orientation()
                .then(|| stats_f32(&self.dornt, "deg")),
        }
    }
}

/// Combine two occurrence sets of equal width into a composite category.
///
/// The result concatenates every per-occurrence column of both operands and
/// is labeled with the merged pattern name. Content is associative and
/// commutative up to row order, so aggregate statistics do not depend on the
/// merge order. The operation is NOT idempotent: merging a set with itself
/// duplicates its content. It is meant for disjoint pattern alternatives
/// that converge on the same outcome.
pub fn merge(a: &OccurrenceSet, b: &OccurrenceSet) -> HistoryResult<OccurrenceSet> {
    if a.pattern.width() != b.pattern.width() {
        return Err(HistoryError::width_mismatch(
            a.pattern.width(),
            b.pattern.width(),
        ));
    }
    let mut out = OccurrenceSet::new(a.pattern.merged(), a.schema);
    out.extend_from(a);
    out.extend_from(b);
    Ok(out)
}

fn filter_in_place<T: Copy>(column: &mut Vec<T>, keep: &[bool]) {
    if column.is_empty() {
        return;
    }
    let mut flags = keep.iter();
    column.retain(|_| *flags.next().expect("mask covers every row"));
}

fn stats_f64(values: &[f64], units: &'static str) -> Stats {
    if values.is_empty() {
        return Stats::nan();
    }
    let (avg, std) = mean_std(values);
    Stats::new(avg, std, units)
}

fn stats_f32(values: &[f32], units: &'static str) -> Stats {
    if values.is_empty() {
        return Stats::nan();
    }
    let as_f64: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
    let (avg, std) = mean_std(&as_f64);
    Stats::new(avg, std, units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::stream::tests::record;
    use crate::state::EndState;

    fn single_gs() -> Pattern {
        Pattern::parse("gs").unwrap()
    }

    fn stream_with_one_gs(duration: f64) -> EventStream {
        let records = vec![
            record(0.0, EndState::Growing, EndState::Shrinking, [1.0, 0.0, 0.0], 10),
            record(
                duration,
                EndState::Shrinking,
                EndState::Growing,
                [2.0, 0.0, 0.0],
                7,
            ),
        ];
        EventStream::from_records(&records, SchemaVersion::V2).unwrap()
    }

    #[test]
    fn empty_set_yields_nan_without_panicking() {
        let set = OccurrenceSet::new(single_gs(), SchemaVersion::V2);
        let stats = set.compute();
        assert_eq!(stats.count, 0);
        assert!(stats.duration.is_nan());
        assert!(stats.elongation.is_nan());
        assert!(stats.velocity.is_nan());
        assert!(stats.reorientation.unwrap().is_nan());
    }

    #[test]
    fn v1_sets_report_no_reorientation() {
        let set = OccurrenceSet::new(single_gs(), SchemaVersion::V1);
        assert!(set.compute().reorientation.is_none());
    }

    #[test]
    fn zero_duration_velocity_is_safe_before_removal() {
        let stream = stream_with_one_gs(0.0);
        let mut set = OccurrenceSet::new(single_gs(), SchemaVersion::V2);
        set.append(&stream, &[0], 0, 1.0);
        assert_eq!(set.vel[0], 0.0);

        set.retain_finite_durations();
        assert_eq!(set.count(), 0);
    }

    #[test]
    fn retain_keeps_nonzero_durations() {
        let mut set = OccurrenceSet::new(single_gs(), SchemaVersion::V2);
        set.append(&stream_with_one_gs(0.0), &[0], 0, 1.0);
        set.append(&stream_with_one_gs(5.0), &[0], 1, 1.0);
        assert_eq!(set.count(), 2);

        set.retain_finite_durations();
        assert_eq!(set.count(), 1);
        assert_eq!(set.dtime[0], 5.0);
        assert_eq!(set.filament[0], 1);
        assert_eq!(set.dornt.len(), 1);
    }

    #[test]
    fn counters_drive_length_change_under_v2() {
        // record() sets ngrw = length and nshr = 0, so the counter path
        // sees the same net change as the length column.
        let stream = stream_with_one_gs(5.0);
        let mut set = OccurrenceSet::new(single_gs(), SchemaVersion::V2);
        set.append(&stream, &[0], 0, 0.5);
        assert_eq!(set.dlen[0], -3);
        assert!((set.dlen_um[0] + 1.5).abs() < 1e-6);
        assert_eq!(set.dngrw[0], -3);
        assert_eq!(set.dnshr[0], 0);
    }

    #[test]
    fn length_column_drives_length_change_under_v1() {
        let records = vec![
            record(0.0, EndState::Growing, EndState::Shrinking, [1.0, 0.0, 0.0], 10),
            record(4.0, EndState::Shrinking, EndState::Growing, [2.0, 0.0, 0.0], 6),
        ];
        let stream = EventStream::from_records(&records, SchemaVersion::V1).unwrap();
        let mut set = OccurrenceSet::new(single_gs(), SchemaVersion::V1);
        set.append(&stream, &[0], 0, 1.0);
        assert_eq!(set.dlen[0], -4);
        assert!(set.dngrw.is_empty());
        assert!(set.dornt.is_empty());
    }

    #[test]
    fn merge_concatenates_and_weights_means() {
        let mut a = OccurrenceSet::new(single_gs(), SchemaVersion::V2);
        a.append(&stream_with_one_gs(2.0), &[0], 0, 1.0);
        let mut b = OccurrenceSet::new(Pattern::parse("ps").unwrap(), SchemaVersion::V2);
        b.append(&stream_with_one_gs(6.0), &[0], 1, 1.0);

        let u = merge(&a, &b).unwrap();
        assert_eq!(u.count(), a.count() + b.count());
        assert_eq!(u.name(), "shrink");

        let expected = (2.0 + 6.0) / 2.0;
        assert!((u.compute().duration.avg - expected).abs() < 1e-12);
    }

    #[test]
    fn merge_order_does_not_change_statistics() {
        let mut a = OccurrenceSet::new(single_gs(), SchemaVersion::V2);
        a.append(&stream_with_one_gs(2.0), &[0], 0, 1.0);
        let mut b = OccurrenceSet::new(Pattern::parse("ps").unwrap(), SchemaVersion::V2);
        b.append(&stream_with_one_gs(6.0), &[0], 1, 1.0);

        let ab = merge(&a, &b).unwrap().compute();
        let ba = merge(&b, &a).unwrap().compute();
        assert_eq!(ab.count, ba.count);
        assert_eq!(ab.duration.avg, ba.duration.avg);
        assert_eq!(ab.duration.std, ba.duration.std);
    }

    #[test]
    fn merge_rejects_width_mismatch() {
        let a = OccurrenceSet::new(single_gs(), SchemaVersion::V2);
        let b = OccurrenceSet::new(Pattern::parse("sgs").unwrap(), SchemaVersion::V2);
        assert_eq!(
            merge(&a, &b).unwrap_err(),
            HistoryError::width_mismatch(1, 2)
        );
    }
}
