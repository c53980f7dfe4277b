//! Particle lineage and fiducial-path core.
//!
//! Records are stored in a flat, track-id indexed collection ([`PartList`]); lineage
//! is resolved lazily through the index, with a linear daughter-list fallback for
//! mothers that were pruned from the event record.

pub mod fiducial;
pub mod part_list;
pub mod particle;
pub mod path;

pub use fiducial::{BoundingBox, FiducialVolume, GeometrySource};
pub use part_list::{IngestSummary, PartList};
pub use particle::{
    Ancestor, FourVector, Origin, ParticleRecord, SimParticle, TrackId, TrajectoryPoint,
    INVALID_TRACK_ID, MOMENTUM_SCALE, NO_MOTHER,
};
pub use path::reduce_path;
