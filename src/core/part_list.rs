use crate::config::PartListConfig;
use crate::core::fiducial::FiducialVolume;
use crate::core::particle::{
    Ancestor, Origin, ParticleRecord, SimParticle, TrackId, INVALID_TRACK_ID, NO_MOTHER,
};
use crate::core::path::reduce_path;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Counts reported by [`PartList::add_particles`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records built from the full particle batch.
    pub full: usize,
    /// Records with a detector path attached.
    pub with_path: usize,
    /// Dropped-particle records appended.
    pub dropped_added: usize,
    /// Records skipped because their track id was already indexed.
    pub duplicates_skipped: usize,
}

/// Per-event particle collection with a track-id index and lineage queries.
///
/// Records live in a flat vector; lineage is expressed through track ids and resolved
/// through `track_index`, so missing mothers stay visible as unresolved ids instead of
/// dangling references.
///
/// The collection is replaced wholesale on every [`add_particles`](Self::add_particles).
/// The fiducial volume and configuration persist for the lifetime of the list.
#[derive(Debug, Clone)]
pub struct PartList {
    config: PartListConfig,
    pdg_set: BTreeSet<i32>,
    fiducial: FiducialVolume,
    particles: Vec<ParticleRecord>,
    track_index: HashMap<TrackId, usize>,
    climb_steps: u64,
}

impl PartList {
    /// Empty list bound to a species configuration and a fiducial volume.
    pub fn new(config: PartListConfig, fiducial: FiducialVolume) -> Self {
        let pdg_set = config.pdg_set();
        Self {
            config,
            pdg_set,
            fiducial,
            particles: Vec::new(),
            track_index: HashMap::new(),
            climb_steps: 0,
        }
    }

    /// Replace the event content with a new particle batch.
    ///
    /// `origins` must be positionally aligned with `particles`. `dropped` holds reduced
    /// records for particles pruned upstream; they are appended only for track ids not
    /// already present, so full records always win over dropped ones.
    ///
    /// Errors:
    /// - `Error::InputContract` if `particles` and `origins` differ in length. The
    ///   previous event content is left untouched.
    pub fn add_particles(
        &mut self,
        particles: &[SimParticle],
        origins: &[Origin],
        dropped: &[ParticleRecord],
    ) -> Result<IngestSummary> {
        if particles.len() != origins.len() {
            return Err(Error::InputContract {
                particles: particles.len(),
                origins: origins.len(),
            });
        }

        let mut summary = IngestSummary::default();
        let mut records: Vec<ParticleRecord> =
            Vec::with_capacity(particles.len() + dropped.len());
        let mut index: HashMap<TrackId, usize> = HashMap::with_capacity(records.capacity());

        for (p, &origin) in particles.iter().zip(origins) {
            if index.contains_key(&p.track_id) {
                warn!(
                    "track id {} repeated in particle batch; keeping first record",
                    p.track_id
                );
                summary.duplicates_skipped += 1;
                continue;
            }
            let mut record = ParticleRecord::from_sim(p, origin);
            if self.pdg_set.contains(&p.pdg_code) {
                record.detector_path = reduce_path(&p.trajectory, &self.fiducial);
                if record.detector_path.is_some() {
                    summary.with_path += 1;
                }
            }
            index.insert(p.track_id, records.len());
            records.push(record);
            summary.full += 1;
        }

        for d in dropped {
            if index.contains_key(&d.track_id) {
                summary.duplicates_skipped += 1;
                continue;
            }
            index.insert(d.track_id, records.len());
            records.push(d.clone());
            summary.dropped_added += 1;
        }

        debug!(
            "ingested {} full ({} with detector path), {} dropped, {} duplicates skipped",
            summary.full, summary.with_path, summary.dropped_added, summary.duplicates_skipped
        );

        self.particles = records;
        self.track_index = index;
        self.climb_steps = 0;
        Ok(summary)
    }

    /// Drop all event content; geometry and configuration are kept.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.track_index.clear();
        self.climb_steps = 0;
    }

    /// Number of records, dropped ones included.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when no event content is loaded.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// All records in ingestion order.
    pub fn particles(&self) -> &[ParticleRecord] {
        &self.particles
    }

    /// Record at `position`.
    pub fn get(&self, position: usize) -> Option<&ParticleRecord> {
        self.particles.get(position)
    }

    /// Track id to position map.
    pub fn track_index(&self) -> &HashMap<TrackId, usize> {
        &self.track_index
    }

    /// Position of `track_id` in the collection.
    #[inline]
    pub fn index_of(&self, track_id: TrackId) -> Option<usize> {
        self.track_index.get(&track_id).copied()
    }

    /// Record carrying `track_id`.
    pub fn particle(&self, track_id: TrackId) -> Option<&ParticleRecord> {
        self.index_of(track_id).and_then(|i| self.particles.get(i))
    }

    /// Fiducial volume used for path reduction.
    pub fn fiducial(&self) -> &FiducialVolume {
        &self.fiducial
    }

    /// Configuration the list was built with.
    pub fn config(&self) -> &PartListConfig {
        &self.config
    }

    /// Closed-box test against the fiducial volume.
    #[inline]
    pub fn in_detector(&self, x: f64, y: f64, z: f64) -> bool {
        self.fiducial.contains(x, y, z)
    }

    /// Records stepped onto by ancestor climbs since the last ingestion.
    pub fn climb_steps(&self) -> u64 {
        self.climb_steps
    }

    /// Immediate mother of the record at `position`.
    ///
    /// - Primaries return their own track id.
    /// - A mother that is indexed is returned directly.
    /// - A mother missing from the list is replaced by whichever record claims this
    ///   particle as a daughter; failing that, the unresolved mother id is returned.
    ///
    /// Returns `INVALID_TRACK_ID` for an out-of-range position.
    pub fn mother_track_id(&self, position: usize) -> TrackId {
        let Some(part) = self.particles.get(position) else {
            return INVALID_TRACK_ID;
        };
        if part.mother == NO_MOTHER {
            return part.track_id;
        }
        if self.track_index.contains_key(&part.mother) {
            return part.mother;
        }
        debug!(
            "mother {} of track {} not in particle list; searching daughter lists",
            part.mother, part.track_id
        );
        self.find_claiming_parent(part.track_id).unwrap_or(part.mother)
    }

    /// Primary at the root of the lineage of the record at `position`.
    ///
    /// The result is cached on the record, so only the first call walks the chain.
    /// A chain broken beyond repair yields the last id reached; use
    /// [`ancestor_resolution`](Self::ancestor_resolution) to tell the two apart.
    ///
    /// Returns `INVALID_TRACK_ID` for an out-of-range position.
    pub fn ancestor_track_id(&mut self, position: usize) -> TrackId {
        self.ancestor_resolution(position)
            .and_then(|a| a.track_id())
            .unwrap_or(INVALID_TRACK_ID)
    }

    /// Cached or freshly computed ancestor state; `None` for an out-of-range position.
    pub fn ancestor_resolution(&mut self, position: usize) -> Option<Ancestor> {
        let cached = self.particles.get(position)?.ancestor();
        if cached.is_set() {
            return Some(cached);
        }
        let (state, steps) = self.climb(position);
        self.climb_steps += steps;
        Some(self.particles[position].cache_ancestor(state))
    }

    /// Ancestor lookup by track id.
    pub fn ancestor_of(&mut self, track_id: TrackId) -> TrackId {
        match self.index_of(track_id) {
            Some(i) => self.ancestor_track_id(i),
            None => INVALID_TRACK_ID,
        }
    }

    /// Record of the resolved mother of `track_id`; `None` for primaries and for
    /// mothers that cannot be found in the list.
    pub fn mother_particle(&self, track_id: TrackId) -> Option<&ParticleRecord> {
        let i = self.index_of(track_id)?;
        let mother = self.mother_track_id(i);
        if mother == track_id {
            return None;
        }
        self.particle(mother)
    }

    /// All track ids in the list.
    pub fn track_ids(&self) -> BTreeSet<TrackId> {
        self.track_index.keys().copied().collect()
    }

    /// Distinct ancestors over the whole list, resolving any uncached records.
    pub fn ancestor_ids(&mut self) -> BTreeSet<TrackId> {
        (0..self.particles.len())
            .map(|i| self.ancestor_track_id(i))
            .collect()
    }

    // ============ Internal helpers ============

    /// Linear scan for a record listing `daughter` among its daughters.
    fn find_claiming_parent(&self, daughter: TrackId) -> Option<TrackId> {
        self.particles
            .iter()
            .find(|p| p.has_daughter(daughter))
            .map(|p| p.track_id)
    }

    /// Walk up from `position` until a primary is reached or the chain cannot be
    /// extended. Returns the final state and the number of records stepped onto.
    ///
    /// Every id is visited at most once, so the walk stops on cyclic input and never
    /// steps onto more records than the list holds.
    fn climb(&self, position: usize) -> (Ancestor, u64) {
        let own = self.particles[position].track_id;
        let mut result = self.mother_track_id(position);
        if result == own {
            return (Ancestor::Resolved(own), 0);
        }

        let mut visited: HashSet<TrackId> = HashSet::from([own]);
        let mut hops = 0u64;
        loop {
            if !visited.insert(result) {
                warn!("lineage of track {own} loops back to track {result}");
                return (Ancestor::Truncated(result), hops);
            }
            match self.index_of(result) {
                Some(idx) => {
                    hops += 1;
                    let next = self.mother_track_id(idx);
                    if next == result {
                        return (Ancestor::Resolved(result), hops);
                    }
                    result = next;
                }
                None => match self.find_claiming_parent(result) {
                    Some(parent) => result = parent,
                    None => {
                        warn!("lineage of track {own} stops at unresolved track {result}");
                        return (Ancestor::Truncated(result), hops);
                    }
                },
            }
        }
    }
}
