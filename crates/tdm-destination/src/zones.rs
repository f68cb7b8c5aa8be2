//! Zone layers, size terms, and the land-use context of a run.
//!
//! # Zone layers
//!
//! Zones are dense indices `0..n` within their layer.  In a two-level system
//! every fine zone belongs to exactly one coarse zone:
//!
//! ```text
//! coarse:   0           1
//!          ┌─────────┐ ┌─────┐
//! fine:    │ 0  1  2 │ │ 3 4 │
//!          └─────────┘ └─────┘
//! ```
//!
//! Size terms are attraction weights per (zone, purpose).  A zone whose size
//! term is zero for a trip's purpose is not a destination alternative for
//! that trip.  Coarse size terms are the sums over member fine zones.
//!
//! # CSV formats
//!
//! Size terms, one column per purpose name (unlisted purposes are zero):
//!
//! ```csv
//! zone_id,work,shopping,eatout
//! 0,31.0,0.04,0.26
//! 1,0.0,0.03,0.0
//! ```
//!
//! Zone hierarchy:
//!
//! ```csv
//! zone_id,coarse_zone_id
//! 0,0
//! 1,0
//! ```

use std::io::Read;

use serde::Deserialize;

use tdm_core::{PurposeId, ZoneId};
use tdm_population::Purposes;

use crate::{DestinationError, DestinationResult};

// ── ZoneHierarchy ─────────────────────────────────────────────────────────────

/// Fine → coarse zone mapping.
#[derive(Clone, Debug)]
pub struct ZoneHierarchy {
    coarse_of: Vec<ZoneId>,
    members:   Vec<Vec<ZoneId>>,
}

impl ZoneHierarchy {
    /// `coarse_of[f]` is the coarse zone of fine zone `f`.  Coarse ids must
    /// be dense: every id below the largest one needs at least one member.
    pub fn new(coarse_of: Vec<ZoneId>) -> DestinationResult<Self> {
        if let Some(fine) = coarse_of.iter().position(|c| !c.is_valid()) {
            return Err(DestinationError::Parse(format!("fine zone {fine} has no coarse zone")));
        }
        let n_coarse = coarse_of.iter().map(|c| c.index() + 1).max().unwrap_or(0);
        // Dense coarse ids cannot outnumber the fine zones.
        if n_coarse > coarse_of.len() {
            return Err(DestinationError::Parse(format!(
                "coarse zone {} exceeds the {} fine zones",
                n_coarse - 1,
                coarse_of.len()
            )));
        }
        let mut members = vec![Vec::new(); n_coarse];
        for (fine, coarse) in coarse_of.iter().enumerate() {
            members[coarse.index()].push(ZoneId(fine as u32));
        }
        if let Some(empty) = members.iter().position(Vec::is_empty) {
            return Err(DestinationError::Parse(format!("coarse zone {empty} has no fine zones")));
        }
        Ok(Self { coarse_of, members })
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> DestinationResult<Self> {
        #[derive(Deserialize)]
        struct Row {
            zone_id:        u32,
            coarse_zone_id: u32,
        }

        let mut rows = csv::Reader::from_reader(reader)
            .deserialize::<Row>()
            .collect::<Result<Vec<_>, _>>()?;
        rows.sort_by_key(|r| r.zone_id);
        for (i, r) in rows.iter().enumerate() {
            if r.zone_id as usize != i {
                return Err(DestinationError::Parse(format!(
                    "zone ids must be dense from 0; found {} at position {i}",
                    r.zone_id
                )));
            }
        }
        Self::new(rows.into_iter().map(|r| ZoneId(r.coarse_zone_id)).collect())
    }

    pub fn n_fine(&self) -> usize {
        self.coarse_of.len()
    }

    pub fn n_coarse(&self) -> usize {
        self.members.len()
    }

    pub fn coarse(&self, fine: ZoneId) -> DestinationResult<ZoneId> {
        self.coarse_of.get(fine.index()).copied().ok_or(DestinationError::ZoneOutOfRange {
            zone:  fine,
            layer: "fine",
            len:   self.coarse_of.len(),
        })
    }

    /// Fine zones of `coarse`, ascending.
    pub fn fine_in(&self, coarse: ZoneId) -> DestinationResult<&[ZoneId]> {
        self.members.get(coarse.index()).map(Vec::as_slice).ok_or(DestinationError::ZoneOutOfRange {
            zone:  coarse,
            layer: "coarse",
            len:   self.members.len(),
        })
    }
}

// ── SizeTermMatrix ────────────────────────────────────────────────────────────

/// Zone × purpose attraction weights, row-major by zone.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeTermMatrix {
    n_purposes: usize,
    values:     Vec<f64>,
}

impl SizeTermMatrix {
    /// Values must be finite and non-negative.
    pub fn new(n_zones: usize, n_purposes: usize, values: Vec<f64>) -> DestinationResult<Self> {
        let expected = n_zones * n_purposes;
        if values.len() != expected {
            return Err(DestinationError::ShapeMismatch { what: "size terms", expected, got: values.len() });
        }
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() || v < 0.0 {
                return Err(DestinationError::InvalidSizeTerm {
                    zone:    ZoneId((i / n_purposes) as u32),
                    purpose: PurposeId((i % n_purposes) as u16),
                    value:   v,
                });
            }
        }
        Ok(Self { n_purposes, values })
    }

    /// Load size terms; columns other than `zone_id` are purpose names and
    /// must be registered in `purposes`.
    pub fn from_csv_reader<R: Read>(reader: R, purposes: &Purposes) -> DestinationResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut zone_col = None;
        let mut columns = Vec::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            let h = h.trim();
            if h == "zone_id" {
                zone_col = Some(i);
            } else {
                let purpose = purposes
                    .id(h)
                    .ok_or_else(|| DestinationError::Parse(format!("unknown purpose column {h:?}")))?;
                columns.push((i, purpose));
            }
        }
        let zone_col = zone_col.ok_or_else(|| DestinationError::Parse("missing zone_id column".into()))?;

        let mut rows: Vec<(u32, Vec<f64>)> = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let zone = parse_field::<u32>(&record, zone_col)?;
            let mut row = vec![0.0; purposes.len()];
            for &(col, purpose) in &columns {
                row[purpose.index()] = parse_field::<f64>(&record, col)?;
            }
            rows.push((zone, row));
        }
        rows.sort_by_key(|(z, _)| *z);
        for (i, (z, _)) in rows.iter().enumerate() {
            if *z as usize != i {
                return Err(DestinationError::Parse(format!(
                    "zone ids must be dense from 0; found {z} at position {i}"
                )));
            }
        }
        let n_zones = rows.len();
        Self::new(n_zones, purposes.len(), rows.into_iter().flat_map(|(_, r)| r).collect())
    }

    pub fn n_zones(&self) -> usize {
        if self.n_purposes == 0 { 0 } else { self.values.len() / self.n_purposes }
    }

    pub fn n_purposes(&self) -> usize {
        self.n_purposes
    }

    /// Size term of `zone` for `purpose`; 0 outside the matrix.
    #[inline]
    pub fn get(&self, zone: ZoneId, purpose: PurposeId) -> f64 {
        if purpose.index() >= self.n_purposes {
            return 0.0;
        }
        self.values
            .get(zone.index() * self.n_purposes + purpose.index())
            .copied()
            .unwrap_or(0.0)
    }

    /// Zones with a positive size term for `purpose`, ascending.
    pub fn available(&self, purpose: PurposeId) -> impl Iterator<Item = ZoneId> + '_ {
        (0..self.n_zones() as u32)
            .map(ZoneId)
            .filter(move |&z| self.get(z, purpose) > 0.0)
    }

    /// Sum fine-zone rows into their coarse zones.
    pub fn aggregate(&self, hierarchy: &ZoneHierarchy) -> DestinationResult<SizeTermMatrix> {
        if hierarchy.n_fine() != self.n_zones() {
            return Err(DestinationError::ShapeMismatch {
                what:     "zone hierarchy fine zones",
                expected: self.n_zones(),
                got:      hierarchy.n_fine(),
            });
        }
        let mut values = vec![0.0; hierarchy.n_coarse() * self.n_purposes];
        for fine in 0..self.n_zones() {
            let coarse = hierarchy.coarse(ZoneId(fine as u32))?.index();
            let src = &self.values[fine * self.n_purposes..(fine + 1) * self.n_purposes];
            let dst = &mut values[coarse * self.n_purposes..(coarse + 1) * self.n_purposes];
            for (d, s) in dst.iter_mut().zip(src) {
                *d += s;
            }
        }
        Ok(SizeTermMatrix { n_purposes: self.n_purposes, values })
    }
}

fn parse_field<T: std::str::FromStr>(record: &csv::StringRecord, col: usize) -> DestinationResult<T> {
    let raw = record.get(col).unwrap_or("").trim();
    raw.parse()
        .map_err(|_| DestinationError::Parse(format!("cannot parse {raw:?} in column {col}")))
}

// ── DestinationContext ────────────────────────────────────────────────────────

/// Land use shared by every batch of a trip destination run.
#[derive(Clone, Debug)]
pub struct DestinationContext {
    pub purposes:      Purposes,
    pub size_terms:    SizeTermMatrix,
    hierarchy:         Option<ZoneHierarchy>,
    coarse_size_terms: Option<SizeTermMatrix>,
}

impl DestinationContext {
    /// Single-layer context.
    pub fn new(purposes: Purposes, size_terms: SizeTermMatrix) -> Self {
        Self { purposes, size_terms, hierarchy: None, coarse_size_terms: None }
    }

    /// Two-level context; coarse size terms are aggregated here once.
    pub fn with_hierarchy(
        purposes:   Purposes,
        size_terms: SizeTermMatrix,
        hierarchy:  ZoneHierarchy,
    ) -> DestinationResult<Self> {
        let coarse = size_terms.aggregate(&hierarchy)?;
        Ok(Self {
            purposes,
            size_terms,
            hierarchy: Some(hierarchy),
            coarse_size_terms: Some(coarse),
        })
    }

    pub fn hierarchy(&self) -> Option<&ZoneHierarchy> {
        self.hierarchy.as_ref()
    }

    pub fn coarse_size_terms(&self) -> Option<&SizeTermMatrix> {
        self.coarse_size_terms.as_ref()
    }
}
