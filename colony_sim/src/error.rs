// Error types for placement and the job board.
//
// Placement failures are mostly advisory: the session re-runs the validator
// every poll and only surfaces the reason so the renderer can tint the
// preview. Only commit-time conflicts and insufficient resources become
// user-visible `PlacementRejected` events. Nothing here is fatal; the player
// simply tries again.
//
// `ErrorKind` groups the variants into the coarse categories the HUD cares
// about (silent out-of-bounds, conflict advisories, resource messages,
// session misuse).

use crate::types::{EntryId, Footprint, JobId, StructureKind, TerrainFeature, TileCoord, UnitKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a placement candidate or commit was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("tile {tile} is outside the map")]
    OutOfBounds { tile: TileCoord },

    #[error("tile {tile} is already occupied by {occupant}")]
    TileOccupied { tile: TileCoord, occupant: EntryId },

    #[error("too close to {kind} {entry}")]
    ExclusionZone { entry: EntryId, kind: StructureKind },

    #[error("tile {tile} has no {feature}")]
    MissingTerrain {
        tile: TileCoord,
        feature: TerrainFeature,
    },

    #[error("no tiles selected")]
    EmptyCandidate,

    #[error("selection must be at least {minimum}")]
    TooSmall { minimum: Footprint },

    #[error("not enough resources to build {kind}")]
    InsufficientResources { kind: StructureKind },

    #[error("{kind} is not in the structure catalog")]
    UnknownStructure { kind: StructureKind },

    #[error("no placement in progress")]
    NoActiveSession,
}

/// Coarse error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Candidate off the map. Treated as invalid, never shown.
    OutOfBounds,
    /// Occupied tiles or a violated exclusion zone. Shown as an advisory.
    Conflict,
    /// Candidate ground lacks a required feature. Shown only as the
    /// preview tint.
    Unsuitable,
    /// Cost cannot be paid at commit time. Shown as a message.
    InsufficientResources,
    /// Operation needs a session (or catalog entry) that does not exist.
    /// Silently ignored.
    SessionState,
}

impl PlacementError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlacementError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            PlacementError::TileOccupied { .. } | PlacementError::ExclusionZone { .. } => {
                ErrorKind::Conflict
            }
            PlacementError::MissingTerrain { .. }
            | PlacementError::EmptyCandidate
            | PlacementError::TooSmall { .. } => ErrorKind::Unsuitable,
            PlacementError::InsufficientResources { .. } => ErrorKind::InsufficientResources,
            PlacementError::UnknownStructure { .. } | PlacementError::NoActiveSession => {
                ErrorKind::SessionState
            }
        }
    }

    /// Whether the HUD should show a transient message for this error.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Conflict | ErrorKind::InsufficientResources
        )
    }
}

/// Job board failures.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum JobError {
    #[error("{0} does not exist")]
    UnknownJob(JobId),

    #[error("{job} cannot be taken by a {unit:?}")]
    NotClaimable { job: JobId, unit: UnitKind },

    #[error("{0} is not claimed")]
    NotClaimed(JobId),
}
