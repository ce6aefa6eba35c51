// Colony events: everything the host renders or announces.
//
// The placement core never touches engine objects. Instead, every state
// change that the player should see is emitted as a `ColonyEvent`: the
// renderer instantiates a sprite on `StructurePlaced`, destroys it on
// `StructureRemoved`, and the HUD shows a transient message for rejections
// whose reason is user-visible (conflicts and missing resources).
//
// Events are returned from `ColonyState::poll_frame()` and
// `ColonyState::apply()`, tagged with the poll tick they happened on.
//
// See also: `colony.rs` which collects and returns events, `session.rs`
// which emits the placement events, `error.rs` for `PlacementError`.

use crate::error::PlacementError;
use crate::job::JobKind;
use crate::ledger::Costs;
use crate::types::{EntryId, Footprint, JobId, StructureKind, TileCoord, UnitKind};
use serde::{Deserialize, Serialize};

/// An event emitted for the renderer / HUD.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyEvent {
    pub tick: u64,
    pub kind: ColonyEventKind,
}

/// Types of events visible to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColonyEventKind {
    /// The player picked a structure; the preview should appear.
    PlacementStarted { kind: StructureKind },
    /// A placement committed. `adjoins` names an edge-sharing entry of the
    /// same kind, for hosts that merge contiguous structures visually.
    StructurePlaced {
        entry: EntryId,
        kind: StructureKind,
        origin: TileCoord,
        footprint: Footprint,
        adjoins: Option<EntryId>,
    },
    /// A commit attempt failed. The session stays armed.
    PlacementRejected {
        kind: StructureKind,
        reason: PlacementError,
    },
    /// The player backed out of a placement.
    PlacementCancelled { kind: StructureKind },
    /// A structure was demolished and part of its cost refunded.
    StructureRemoved {
        entry: EntryId,
        kind: StructureKind,
        origin: TileCoord,
        footprint: Footprint,
        refund: Costs,
    },
    JobPosted {
        job: JobId,
        kind: JobKind,
        site: TileCoord,
    },
    JobClaimed { job: JobId, unit: UnitKind },
    JobCompleted { job: JobId },
    /// Jobs dropped because their structure was demolished.
    JobsCancelled { entry: EntryId, jobs: Vec<JobId> },
}

impl ColonyEvent {
    /// Whether the HUD should flash a message for this event.
    pub fn is_user_message(&self) -> bool {
        match &self.kind {
            ColonyEventKind::PlacementRejected { reason, .. } => reason.is_user_visible(),
            _ => false,
        }
    }
}
