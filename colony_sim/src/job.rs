// Job board: units of work that robots, drones and starships pull from.
//
// When a structure is committed, the session posts one job per
// `JobTemplate` on its definition (construction, farming, water extraction,
// and so on), sited at the structure's origin tile. The host drives the
// worker units; it asks the board for the next job a unit can take, reports
// completion, and the board keeps the bookkeeping.
//
// Jobs are stored in a `BTreeMap` keyed by a monotonically increasing
// `JobId`, so "next available job" is always the oldest compatible one.
// Demolishing a structure cancels every job still attached to it.
//
// See also: `structure.rs` for `JobTemplate`, `colony.rs` for the commands
// that claim and complete jobs, `types.rs` for `JobId` and `UnitKind`.

use crate::error::JobError;
use crate::types::{EntryId, JobId, TileCoord, UnitKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The type of work a job represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    /// Assemble a freshly placed structure.
    Construct,
    /// Plant and harvest a farm plot.
    TendFarm,
    /// Pump water from an ice deposit.
    ExtractWater,
    /// Dig ore around a mining station.
    MineOre,
    /// Move cargo in or out of storage.
    HaulCargo,
}

/// Lifecycle state of a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Waiting for a unit.
    Available,
    /// A unit has taken it.
    Claimed,
    /// Finished. Kept until the entry is demolished.
    Complete,
}

/// A unit of work attached to a placed structure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub state: JobState,
    /// Where the unit goes to do the work.
    pub site: TileCoord,
    /// The structure this job belongs to.
    pub entry: EntryId,
    /// If set, only this unit kind can claim the job.
    pub required_unit: Option<UnitKind>,
    pub claimed_by: Option<UnitKind>,
    pub posted_tick: u64,
}

impl Job {
    fn accepts(&self, unit: UnitKind) -> bool {
        self.state == JobState::Available && self.required_unit.is_none_or(|u| u == unit)
    }
}

/// Registry of all jobs, oldest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JobBoard {
    jobs: BTreeMap<JobId, Job>,
    next_id: u64,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a new available job and return its id.
    pub fn post(
        &mut self,
        kind: JobKind,
        site: TileCoord,
        entry: EntryId,
        required_unit: Option<UnitKind>,
        tick: u64,
    ) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;
        self.jobs.insert(
            id,
            Job {
                id,
                kind,
                state: JobState::Available,
                site,
                entry,
                required_unit,
                claimed_by: None,
                posted_tick: tick,
            },
        );
        id
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// The oldest job this unit kind could take, without claiming it.
    pub fn next_available(&self, unit: UnitKind) -> Option<&Job> {
        self.jobs.values().find(|j| j.accepts(unit))
    }

    /// Claim the oldest job this unit kind can take.
    pub fn claim_next(&mut self, unit: UnitKind) -> Option<&Job> {
        let id = self.next_available(unit)?.id;
        self.claim(id, unit).ok()
    }

    /// Claim a specific job.
    pub fn claim(&mut self, id: JobId, unit: UnitKind) -> Result<&Job, JobError> {
        let job = self.jobs.get_mut(&id).ok_or(JobError::UnknownJob(id))?;
        if !job.accepts(unit) {
            return Err(JobError::NotClaimable { job: id, unit });
        }
        job.state = JobState::Claimed;
        job.claimed_by = Some(unit);
        Ok(&*job)
    }

    /// Mark a claimed job finished.
    pub fn complete(&mut self, id: JobId) -> Result<&Job, JobError> {
        let job = self.jobs.get_mut(&id).ok_or(JobError::UnknownJob(id))?;
        if job.state != JobState::Claimed {
            return Err(JobError::NotClaimed(id));
        }
        job.state = JobState::Complete;
        Ok(&*job)
    }

    /// Remove every job attached to an entry. Returns the removed ids.
    pub fn cancel_for_entry(&mut self, entry: EntryId) -> Vec<JobId> {
        let ids: Vec<JobId> = self
            .jobs
            .values()
            .filter(|j| j.entry == entry)
            .map(|j| j.id)
            .collect();
        for id in &ids {
            self.jobs.remove(id);
        }
        ids
    }

    /// Jobs still waiting for a unit, oldest first.
    pub fn available(&self) -> impl Iterator<Item = &Job> {
        self.jobs
            .values()
            .filter(|j| j.state == JobState::Available)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
