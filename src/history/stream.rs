//! Per-filament event streams.
//!
//! One `EventStream` holds the time-ordered transition events recorded for a
//! single filament end, column-ized for vectorized scanning. All columns
//! share one length; the distance to the cell center is always derived from
//! the positions at construction, never read from storage.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::SchemaVersion;
use crate::history::error::{HistoryError, HistoryResult};
use crate::state::EndState;

/// Number of auxiliary field-intensity channels per event.
pub const CAS_CHANNELS: usize = 6;

/// One recorded transition event at a filament end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event time (seconds, monotonic within a stream).
    pub time: f64,
    /// State before the transition.
    pub state_fr: EndState,
    /// State after the transition.
    pub state_to: EndState,
    /// End-node position.
    pub pos: [f32; 3],
    /// End-node direction (unit vector); absent in V1 recordings.
    #[serde(default)]
    pub ornt: Option<[f32; 3]>,
    /// Filament length in polymerization units.
    pub length: u32,
    /// Filament age at the event.
    pub age: f64,
    /// Cumulative growth increments; absent in V1 recordings.
    #[serde(default)]
    pub ngrw: Option<u64>,
    /// Cumulative shrink increments; absent in V1 recordings.
    #[serde(default)]
    pub nshr: Option<u64>,
    /// Auxiliary field intensities.
    pub cas: [f32; CAS_CHANNELS],
    /// Distance to the plasma membrane.
    pub dist_plm: f32,
    /// Distance to the nuclear membrane.
    pub dist_nuc: f32,
}

/// Column-ized event history of one filament end.
#[derive(Debug, Clone)]
pub struct EventStream {
    pub time: Array1<f64>,
    pub state_fr: Array1<u32>,
    pub state_to: Array1<u32>,
    pub pos: Array2<f32>,
    /// Unit direction vectors; `None` for V1 recordings.
    pub ornt: Option<Array2<f32>>,
    pub length: Array1<u32>,
    pub age: Array1<f64>,
    /// Cumulative growth counters; `None` for V1 recordings.
    pub ngrw: Option<Array1<u64>>,
    /// Cumulative shrink counters; `None` for V1 recordings.
    pub nshr: Option<Array1<u64>>,
    pub cas: Array2<f32>,
    pub dist_plm: Array1<f32>,
    pub dist_nuc: Array1<f32>,
    /// Distance to the cell center in the xy plane, derived from `pos`.
    pub dist0: Array1<f32>,
}

impl EventStream {
    /// Column-ize an in-memory record sequence.
    ///
    /// Under `SchemaVersion::V2` every record must carry orientation and
    /// increment counters; under `V1` those fields are ignored even when
    /// present, so a mixed input degrades uniformly.
    pub fn from_records(records: &[EventRecord], schema: SchemaVersion) -> HistoryResult<Self> {
        let n = records.len();

        let mut time = Vec::with_capacity(n);
        let mut state_fr = Vec::with_capacity(n);
        let mut state_to = Vec::with_capacity(n);
        let mut pos = Vec::with_capacity(n * 3);
        let mut ornt = Vec::with_capacity(if schema.has_orientation() { n * 3 } else { 0 });
        let mut length = Vec::with_capacity(n);
        let mut age = Vec::with_capacity(n);
        let mut ngrw = Vec::with_capacity(if schema.has_counters() { n } else { 0 });
        let mut nshr = Vec::with_capacity(if schema.has_counters() { n } else { 0 });
        let mut cas = Vec::with_capacity(n * CAS_CHANNELS);
        let mut dist_plm = Vec::with_capacity(n);
        let mut dist_nuc = Vec::with_capacity(n);

        for r in records {
            time.push(r.time);
            state_fr.push(r.state_fr.storage_code());
            state_to.push(r.state_to.storage_code());
            pos.extend_from_slice(&r.pos);
            if schema.has_orientation() {
                let o = r.ornt.ok_or_else(|| HistoryError::missing_column("ornt"))?;
                ornt.extend_from_slice(&o);
            }
            length.push(r.length);
            age.push(r.age);
            if schema.has_counters() {
                ngrw.push(r.ngrw.ok_or_else(|| HistoryError::missing_column("ngrw"))?);
                nshr.push(r.nshr.ok_or_else(|| HistoryError::missing_column("nshr"))?);
            }
            cas.extend_from_slice(&r.cas);
            dist_plm.push(r.dist_plm);
            dist_nuc.push(r.dist_nuc);
        }

        let pos =
            Array2::from_shape_vec((n, 3), pos).expect("position rows are built 3 floats at a time");
        let dist0 = pos
            .rows()
            .into_iter()
            .map(|row| row[0].hypot(row[1]))
            .collect::<Array1<f32>>();

        Ok(Self {
            time: Array1::from(time),
            state_fr: Array1::from(state_fr),
            state_to: Array1::from(state_to),
            pos,
            ornt: schema.has_orientation().then(|| {
                Array2::from_shape_vec((n, 3), ornt)
                    .expect("orientation rows are built 3 floats at a time")
            }),
            length: Array1::from(length),
            age: Array1::from(age),
            ngrw: schema.has_counters().then(|| Array1::from(ngrw)),
            nshr: schema.has_counters().then(|| Array1::from(nshr)),
            cas: Array2::from_shape_vec((n, CAS_CHANNELS), cas)
                .expect("cas rows are built CAS_CHANNELS floats at a time"),
            dist_plm: Array1::from(dist_plm),
            dist_nuc: Array1::from(dist_nuc),
            dist0,
        })
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Check the shared-length invariant across every column.
    ///
    /// Useful for streams assembled field-by-field by external loaders.
    pub fn validate(&self) -> HistoryResult<()> {
        let n = self.len();
        let check = |field: &'static str, got: usize| -> HistoryResult<()> {
            if got == n {
                Ok(())
            } else {
                Err(HistoryError::length_mismatch(field, n, got))
            }
        };
        check("state_fr", self.state_fr.len())?;
        check("state_to", self.state_to.len())?;
        check("pos", self.pos.nrows())?;
        if let Some(ornt) = &self.ornt {
            check("ornt", ornt.nrows())?;
        }
        check("length", self.length.len())?;
        check("age", self.age.len())?;
        if let Some(ngrw) = &self.ngrw {
            check("ngrw", ngrw.len())?;
        }
        if let Some(nshr) = &self.nshr {
            check("nshr", nshr.len())?;
        }
        check("cas", self.cas.nrows())?;
        check("dist_plm", self.dist_plm.len())?;
        check("dist_nuc", self.dist_nuc.len())?;
        check("dist0", self.dist0.len())?;
        Ok(())
    }
}
