//! Truth-level particle bookkeeping for detector simulation.
//!
//! [`core::PartList`] holds one event's simulated particles, resolves each particle's
//! mother and primary ancestor through a track-id index, and keeps the portion of a
//! particle's trajectory that crosses the fiducial volume for configured species.
//!
//! ```
//! use mcreco::config::PartListConfig;
//! use mcreco::core::{BoundingBox, FiducialVolume, Origin, PartList, SimParticle};
//!
//! # fn main() -> mcreco::error::Result<()> {
//! let fv = FiducialVolume::from_sub_volumes([BoundingBox { min: [0.0; 3], max: [10.0; 3] }])?;
//! let mut list = PartList::new(PartListConfig::new([13]), fv);
//! let primary = SimParticle { track_id: 1, daughters: vec![2], ..Default::default() };
//! let muon = SimParticle { track_id: 2, mother: 1, pdg_code: 13, ..Default::default() };
//! list.add_particles(&[primary, muon], &[Origin::CosmicRay; 2], &[])?;
//! assert_eq!(list.ancestor_track_id(1), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;
