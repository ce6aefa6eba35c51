// Commands that mutate colony state outside the per-frame poll.
//
// Pointer movement and presses flow through `ColonyState::poll_frame()`
// every frame. Everything else the player (or the host's unit AI) does goes
// through a `ColonyCommand`:
//
// - `BeginPlacement`: arm the placement session for a structure kind.
// - `CancelPlacement`: back out of the current placement.
// - `Demolish`: remove the structure covering a tile, refund part of its
//   cost and cancel its jobs.
// - `ClaimJob`: a worker unit takes the oldest job it is allowed to do.
// - `CompleteJob`: a worker unit finished its job.
//
// Commands are plain data (serde), so a host can log or replay them.
//
// See also: `colony.rs` for `ColonyState::apply()` which dispatches these,
// `event.rs` for what each command emits.

use crate::types::{JobId, StructureKind, TileCoord, UnitKind};
use serde::{Deserialize, Serialize};

/// A discrete mutation of colony state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColonyCommand {
    BeginPlacement { kind: StructureKind },
    CancelPlacement,
    Demolish { tile: TileCoord },
    ClaimJob { unit: UnitKind },
    CompleteJob { job: JobId },
}
