use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-event particle identity assigned by the transport stage.
pub type TrackId = u32;

/// Sentinel returned by lineage queries for unknown positions or track ids.
pub const INVALID_TRACK_ID: TrackId = u32::MAX;

/// Mother id carried by primaries.
pub const NO_MOTHER: TrackId = 0;

/// Conversion from input momentum/energy units (GeV) to stored units (MeV).
pub const MOMENTUM_SCALE: f64 = 1.0e3;

/// Four-vector stored as `[x, y, z, t]` or `[px, py, pz, E]`.
pub type FourVector = [f64; 4];

/// Scale every component of a four-vector, time/energy included.
#[inline]
pub fn scale4(v: FourVector, factor: f64) -> FourVector {
    [v[0] * factor, v[1] * factor, v[2] * factor, v[3] * factor]
}

/// A single step of a particle trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub position: FourVector,
    pub momentum: FourVector,
}

impl TrajectoryPoint {
    /// Point from a position and a momentum four-vector.
    pub fn new(position: FourVector, momentum: FourVector) -> Self {
        Self { position, momentum }
    }
}

/// Generator provenance of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Origin {
    #[default]
    Unknown,
    BeamNeutrino,
    CosmicRay,
    SuperNovaNeutrino,
    SingleParticle,
}

impl From<i32> for Origin {
    fn from(code: i32) -> Self {
        match code {
            1 => Origin::BeamNeutrino,
            2 => Origin::CosmicRay,
            3 => Origin::SuperNovaNeutrino,
            4 => Origin::SingleParticle,
            _ => Origin::Unknown,
        }
    }
}

/// Raw particle as handed over by the transport stage, momenta in GeV.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimParticle {
    pub track_id: TrackId,
    pub pdg_code: i32,
    /// Immediate parent, `NO_MOTHER` for primaries.
    pub mother: TrackId,
    pub daughters: Vec<TrackId>,
    pub process: String,
    /// Chronological trajectory; the first point is the start vertex, the last the end vertex.
    pub trajectory: Vec<TrajectoryPoint>,
}

impl SimParticle {
    /// First trajectory point (start vertex), if any.
    pub fn start(&self) -> Option<&TrajectoryPoint> {
        self.trajectory.first()
    }

    /// Last trajectory point (end vertex), if any.
    pub fn end(&self) -> Option<&TrajectoryPoint> {
        self.trajectory.last()
    }
}

/// Write-once cache of a record's ultimate ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ancestor {
    /// Not computed yet.
    #[default]
    Unset,
    /// The climb reached a primary.
    Resolved(TrackId),
    /// The climb stopped on an id with no record and no record claiming it as a daughter.
    Truncated(TrackId),
}

impl Ancestor {
    /// Cached track id, if any, regardless of completeness.
    #[inline]
    pub fn track_id(&self) -> Option<TrackId> {
        match *self {
            Ancestor::Unset => None,
            Ancestor::Resolved(id) | Ancestor::Truncated(id) => Some(id),
        }
    }

    /// True once a climb has stored a result.
    #[inline]
    pub fn is_set(&self) -> bool {
        !matches!(self, Ancestor::Unset)
    }
}

/// Reduced per-particle record kept in a [`PartList`](crate::core::PartList).
///
/// Serialisable so that event storage can persist records, cached ancestor included.
///
/// Momenta and energies are in MeV, positions in cm, times in ns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub track_id: TrackId,
    pub pdg_code: i32,
    pub mother: TrackId,
    pub daughters: BTreeSet<TrackId>,
    pub process: String,
    pub start_vertex: FourVector,
    pub start_momentum: FourVector,
    pub end_vertex: FourVector,
    pub end_momentum: FourVector,
    pub origin: Origin,
    /// In-fiducial trajectory, only filled for configured species that enter the volume.
    pub detector_path: Option<Vec<TrajectoryPoint>>,
    ancestor: Ancestor,
}

impl ParticleRecord {
    /// Bare record with identity and lineage only; kinematics default to zero.
    pub fn new(track_id: TrackId, pdg_code: i32, mother: TrackId) -> Self {
        Self {
            track_id,
            pdg_code,
            mother,
            ..Self::default()
        }
    }

    /// Builder-style daughter list.
    pub fn with_daughters<I: IntoIterator<Item = TrackId>>(mut self, daughters: I) -> Self {
        self.daughters.extend(daughters);
        self
    }

    /// Convert a raw particle, rescaling momenta from GeV to MeV.
    ///
    /// The detector path is left empty; it is filled by the particle list when the
    /// species is configured for path saving.
    pub fn from_sim(p: &SimParticle, origin: Origin) -> Self {
        let zero = TrajectoryPoint::new([0.0; 4], [0.0; 4]);
        let start = p.start().copied().unwrap_or(zero);
        let end = p.end().copied().unwrap_or(zero);
        Self {
            track_id: p.track_id,
            pdg_code: p.pdg_code,
            mother: p.mother,
            daughters: p.daughters.iter().copied().collect(),
            process: p.process.clone(),
            start_vertex: start.position,
            start_momentum: scale4(start.momentum, MOMENTUM_SCALE),
            end_vertex: end.position,
            end_momentum: scale4(end.momentum, MOMENTUM_SCALE),
            origin,
            detector_path: None,
            ancestor: Ancestor::Unset,
        }
    }

    /// True if `track_id` is listed among the daughters.
    #[inline]
    pub fn has_daughter(&self, track_id: TrackId) -> bool {
        self.daughters.contains(&track_id)
    }

    /// True if the record has no mother.
    #[inline]
    pub fn is_primary(&self) -> bool {
        self.mother == NO_MOTHER
    }

    /// Current state of the ancestor cache.
    #[inline]
    pub fn ancestor(&self) -> Ancestor {
        self.ancestor
    }

    /// Store the ancestor unless one is already cached. Returns the cached state.
    pub(crate) fn cache_ancestor(&mut self, value: Ancestor) -> Ancestor {
        if !self.ancestor.is_set() {
            self.ancestor = value;
        }
        self.ancestor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SimParticle {
        SimParticle {
            track_id: 7,
            pdg_code: 13,
            mother: 2,
            daughters: vec![9, 8, 9],
            process: "muIoni".into(),
            trajectory: vec![
                TrajectoryPoint::new([1.0, 2.0, 3.0, 0.5], [0.1, 0.2, 0.3, 0.4]),
                TrajectoryPoint::new([4.0, 5.0, 6.0, 1.5], [0.0, 0.0, 0.01, 0.106]),
            ],
        }
    }

    #[test]
    fn from_sim_scales_momentum_not_position() {
        let r = ParticleRecord::from_sim(&sample(), Origin::CosmicRay);
        assert_eq!(r.start_vertex, [1.0, 2.0, 3.0, 0.5]);
        assert_eq!(r.end_vertex, [4.0, 5.0, 6.0, 1.5]);
        assert!((r.start_momentum[0] - 100.0).abs() < 1e-9);
        assert!((r.start_momentum[3] - 400.0).abs() < 1e-9);
        assert!((r.end_momentum[3] - 106.0).abs() < 1e-9);
        assert_eq!(r.origin, Origin::CosmicRay);
        assert_eq!(r.process, "muIoni");
    }

    #[test]
    fn daughters_are_deduplicated() {
        let r = ParticleRecord::from_sim(&sample(), Origin::Unknown);
        assert_eq!(r.daughters.len(), 2);
        assert!(r.has_daughter(8));
        assert!(r.has_daughter(9));
        assert!(!r.has_daughter(7));
    }

    #[test]
    fn empty_trajectory_gives_zero_vectors() {
        let p = SimParticle {
            track_id: 1,
            ..SimParticle::default()
        };
        let r = ParticleRecord::from_sim(&p, Origin::Unknown);
        assert_eq!(r.start_vertex, [0.0; 4]);
        assert_eq!(r.end_momentum, [0.0; 4]);
        assert!(r.is_primary());
    }

    #[test]
    fn ancestor_cache_is_write_once() {
        let mut r = ParticleRecord::new(5, 11, 3);
        assert_eq!(r.ancestor(), Ancestor::Unset);
        assert_eq!(r.cache_ancestor(Ancestor::Resolved(1)), Ancestor::Resolved(1));
        assert_eq!(r.cache_ancestor(Ancestor::Truncated(3)), Ancestor::Resolved(1));
        assert_eq!(r.ancestor().track_id(), Some(1));
    }

    #[test]
    fn record_survives_json_round_trip() -> serde_json::Result<()> {
        let mut r = ParticleRecord::new(12, -13, 4).with_daughters([20, 21]);
        r.process = "muMinusCaptureAtRest".into();
        r.origin = Origin::CosmicRay;
        r.start_vertex = [1.5, -2.0, 30.0, 0.25];
        r.start_momentum = [0.0, 0.0, 250.0, 275.5];
        r.detector_path = Some(vec![TrajectoryPoint::new(
            [1.5, -2.0, 30.0, 0.25],
            [0.0, 0.0, 250.0, 275.5],
        )]);
        r.cache_ancestor(Ancestor::Resolved(1));

        let text = serde_json::to_string(&r)?;
        let back: ParticleRecord = serde_json::from_str(&text)?;
        assert_eq!(back, r);
        assert_eq!(back.ancestor(), Ancestor::Resolved(1));
        Ok(())
    }

    #[test]
    fn origin_from_code() {
        assert_eq!(Origin::from(1), Origin::BeamNeutrino);
        assert_eq!(Origin::from(4), Origin::SingleParticle);
        assert_eq!(Origin::from(-3), Origin::Unknown);
        assert_eq!(Origin::from(99), Origin::Unknown);
    }
}
