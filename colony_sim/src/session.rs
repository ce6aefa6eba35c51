// Placement session: the per-frame placement state machine.
//
// A `PlacementSession` tracks the placement gesture in progress. The host
// calls `poll_frame()` once per rendered frame with the pointer's world
// position and pressed state. The session maps the pointer to a tile,
// re-runs the validator over the candidate footprint, and returns a
// `FrameReport` the renderer uses to draw the preview in valid or invalid
// colors.
//
// States:
//
//   Idle ──begin──▶ SingleTileArmed ──press (settled, valid)──▶ commit ─▶ Idle
//        └─begin──▶ RangeArmed ──press (settled)──▶ RangeDragging
//                       ▲                               │
//                       └──── release, commit failed ◀──┤
//                                                       └─ release, committed ─▶ Idle
//
// `cancel_placement()` returns any armed or dragging state to `Idle` without
// touching the index. `begin_placement()` while armed re-arms with the new
// kind.
//
// Presses and releases are edges: the session compares the pointer's
// pressed state against the previous poll, so a button held across polls
// is one press. After arming, the first `settle_polls` polls ignore
// presses, so the click that picked the structure from a menu is never
// read as a placement.
//
// ## Commit transaction
//
// A commit re-validates the candidate, checks and deducts the cost from the
// injected `ResourceLedger`, then inserts into the `OccupancyIndex`. If the
// insert fails the deduction is credited back. Either everything happens or
// nothing does. On failure the session stays armed (a drag falls back to
// `RangeArmed`) and emits `PlacementRejected`. On success it posts the
// structure's jobs, emits `StructurePlaced`, and returns to `Idle`.
//
// Validation failures during hover are never errors. They are reported in
// `FrameReport::valid` / `reason` every poll and the player just moves on.
//
// **Critical constraint: no hidden state.** Everything the session mutates
// on commit arrives through `PlacementContext`. The session itself holds
// only the gesture and is never serialized.
//
// See also: `validator.rs` for the rules checked each poll, `colony.rs`
// which owns the session and builds the context, `event.rs` for the emitted
// events.

use crate::error::PlacementError;
use crate::event::{ColonyEvent, ColonyEventKind};
use crate::grid::{GridMapper, TileRect};
use crate::job::JobBoard;
use crate::ledger::ResourceLedger;
use crate::occupancy::{OccupancyEntry, OccupancyIndex};
use crate::structure::{StructureCatalog, StructureDefinition};
use crate::terrain::TerrainMap;
use crate::types::{StructureKind, TileCoord};
use crate::validator::PlacementValidator;
use log::{debug, info, warn};

/// Pointer state for one poll, in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub world_x: f32,
    pub world_y: f32,
    pub down: bool,
}

impl PointerInput {
    pub fn new(world_x: f32, world_y: f32, down: bool) -> Self {
        Self {
            world_x,
            world_y,
            down,
        }
    }
}

/// Coarse session state, for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    SingleTileArmed,
    RangeArmed,
    RangeDragging,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum SessionState {
    #[default]
    Idle,
    SingleTileArmed {
        kind: StructureKind,
    },
    RangeArmed {
        kind: StructureKind,
    },
    RangeDragging {
        kind: StructureKind,
        anchor: TileCoord,
        current: TileCoord,
    },
}

/// Everything a poll may read or, on commit, mutate.
pub struct PlacementContext<'a> {
    pub grid: GridMapper,
    pub catalog: &'a StructureCatalog,
    pub terrain: &'a TerrainMap,
    pub occupancy: &'a mut OccupancyIndex,
    pub ledger: &'a mut dyn ResourceLedger,
    pub jobs: &'a mut JobBoard,
    pub tick: u64,
}

impl PlacementContext<'_> {
    fn validator(&self) -> PlacementValidator<'_> {
        PlacementValidator::new(self.terrain, &*self.occupancy)
    }

    fn event(&self, kind: ColonyEventKind) -> ColonyEvent {
        ColonyEvent {
            tick: self.tick,
            kind,
        }
    }
}

/// What the renderer needs after one poll.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub phase: SessionPhase,
    /// Advisory: whether the current preview could be placed.
    pub valid: bool,
    /// The candidate rectangle, if a placement is armed.
    pub preview: Option<TileRect>,
    /// Why the preview is invalid, or why a commit failed.
    pub reason: Option<PlacementError>,
    pub events: Vec<ColonyEvent>,
}

impl FrameReport {
    fn idle() -> Self {
        Self {
            phase: SessionPhase::Idle,
            valid: false,
            preview: None,
            reason: None,
            events: Vec::new(),
        }
    }

    fn preview(phase: SessionPhase, rect: TileRect, check: Result<(), PlacementError>) -> Self {
        Self {
            phase,
            valid: check.is_ok(),
            preview: Some(rect),
            reason: check.err(),
            events: Vec::new(),
        }
    }
}

/// The in-progress placement gesture.
#[derive(Clone, Debug, Default)]
pub struct PlacementSession {
    state: SessionState,
    settle_polls: u32,
    settle_remaining: u32,
    pointer_was_down: bool,
}

impl PlacementSession {
    pub fn new(settle_polls: u32) -> Self {
        Self {
            settle_polls,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::SingleTileArmed { .. } => SessionPhase::SingleTileArmed,
            SessionState::RangeArmed { .. } => SessionPhase::RangeArmed,
            SessionState::RangeDragging { .. } => SessionPhase::RangeDragging,
        }
    }

    /// The structure kind being placed, if any.
    pub fn kind(&self) -> Option<StructureKind> {
        match self.state {
            SessionState::Idle => None,
            SessionState::SingleTileArmed { kind }
            | SessionState::RangeArmed { kind }
            | SessionState::RangeDragging { kind, .. } => Some(kind),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// `(anchor, current)` tiles of the drag in progress.
    pub fn drag_corners(&self) -> Option<(TileCoord, TileCoord)> {
        match self.state {
            SessionState::RangeDragging {
                anchor, current, ..
            } => Some((anchor, current)),
            _ => None,
        }
    }

    /// Arm the session for `kind`. Replaces any placement already armed.
    pub fn begin_placement(
        &mut self,
        kind: StructureKind,
        catalog: &StructureCatalog,
        tick: u64,
    ) -> Result<ColonyEvent, PlacementError> {
        let def = catalog
            .get(&kind)
            .ok_or(PlacementError::UnknownStructure { kind })?;
        self.state = if def.is_range_select() {
            SessionState::RangeArmed { kind }
        } else {
            SessionState::SingleTileArmed { kind }
        };
        self.settle_remaining = self.settle_polls;
        debug!("placement armed: {kind} ({:?})", self.phase());
        Ok(ColonyEvent {
            tick,
            kind: ColonyEventKind::PlacementStarted { kind },
        })
    }

    /// Drop the current placement. Fails with `NoActiveSession` when idle.
    pub fn cancel_placement(&mut self, tick: u64) -> Result<ColonyEvent, PlacementError> {
        let kind = self.kind().ok_or(PlacementError::NoActiveSession)?;
        self.state = SessionState::Idle;
        debug!("placement cancelled: {kind}");
        Ok(ColonyEvent {
            tick,
            kind: ColonyEventKind::PlacementCancelled { kind },
        })
    }

    /// Advance the session by one poll.
    pub fn poll_frame(&mut self, input: PointerInput, ctx: &mut PlacementContext<'_>) -> FrameReport {
        let pressed = input.down && !self.pointer_was_down;
        let released = !input.down && self.pointer_was_down;
        self.pointer_was_down = input.down;

        let settled = self.settle_remaining == 0;
        self.settle_remaining = self.settle_remaining.saturating_sub(1);

        let Some(kind) = self.kind() else {
            return FrameReport::idle();
        };
        let catalog = ctx.catalog;
        let Some(def) = catalog.get(&kind) else {
            // The catalog changed under an armed session.
            self.state = SessionState::Idle;
            let mut report = FrameReport::idle();
            report.reason = Some(PlacementError::UnknownStructure { kind });
            return report;
        };

        let hovered = ctx.grid.to_tile(input.world_x, input.world_y);

        match self.state {
            SessionState::Idle => FrameReport::idle(),
            SessionState::SingleTileArmed { .. } => {
                let rect = def.rect_at(hovered);
                let check = check_candidate(def, rect, ctx.validator());
                if pressed && settled && check.is_ok() {
                    self.commit(def, rect, ctx)
                } else {
                    FrameReport::preview(SessionPhase::SingleTileArmed, rect, check)
                }
            }
            SessionState::RangeArmed { .. } => {
                if pressed && settled {
                    self.state = SessionState::RangeDragging {
                        kind,
                        anchor: hovered,
                        current: hovered,
                    };
                    debug!("drag started for {kind} at {hovered}");
                    let rect = TileRect::single(hovered);
                    let check = check_candidate(def, rect, ctx.validator());
                    FrameReport::preview(SessionPhase::RangeDragging, rect, check)
                } else {
                    let rect = def.rect_at(hovered);
                    let check = check_candidate(def, rect, ctx.validator());
                    FrameReport::preview(SessionPhase::RangeArmed, rect, check)
                }
            }
            SessionState::RangeDragging { anchor, .. } => {
                let rect = TileRect::from_corners(anchor, hovered);
                if released {
                    self.commit(def, rect, ctx)
                } else {
                    self.state = SessionState::RangeDragging {
                        kind,
                        anchor,
                        current: hovered,
                    };
                    let check = check_candidate(def, rect, ctx.validator());
                    FrameReport::preview(SessionPhase::RangeDragging, rect, check)
                }
            }
        }
    }

    /// Run the commit transaction and move to `Idle` or back to armed.
    fn commit(
        &mut self,
        def: &StructureDefinition,
        rect: TileRect,
        ctx: &mut PlacementContext<'_>,
    ) -> FrameReport {
        match place(def, rect, ctx) {
            Ok((entry, mut events)) => {
                self.state = SessionState::Idle;
                info!(
                    "placed {} {} at {} ({})",
                    def.kind, entry.id, entry.origin, entry.footprint
                );
                let adjoins = ctx
                    .occupancy
                    .find_adjacent_to_rect(rect, def.kind)
                    .map(|e| e.id);
                events.insert(
                    0,
                    ctx.event(ColonyEventKind::StructurePlaced {
                        entry: entry.id,
                        kind: def.kind,
                        origin: entry.origin,
                        footprint: entry.footprint,
                        adjoins,
                    }),
                );
                FrameReport {
                    phase: SessionPhase::Idle,
                    valid: true,
                    preview: None,
                    reason: None,
                    events,
                }
            }
            Err(reason) => {
                if let SessionState::RangeDragging { kind, .. } = self.state {
                    self.state = SessionState::RangeArmed { kind };
                }
                warn!("placement of {} at {} rejected: {reason}", def.kind, rect.origin);
                let event = ctx.event(ColonyEventKind::PlacementRejected {
                    kind: def.kind,
                    reason: reason.clone(),
                });
                FrameReport {
                    phase: self.phase(),
                    valid: false,
                    preview: Some(rect),
                    reason: Some(reason),
                    events: vec![event],
                }
            }
        }
    }
}

/// The validator rules plus the minimum drag size for range placements.
fn check_candidate(
    def: &StructureDefinition,
    rect: TileRect,
    validator: PlacementValidator<'_>,
) -> Result<(), PlacementError> {
    if def.is_range_select() && !def.fits_minimum(rect) {
        return Err(PlacementError::TooSmall {
            minimum: def.footprint,
        });
    }
    validator.check_rect(rect, &def.requirement)
}

/// Deduct the cost, then insert. A failed insert credits the cost back.
fn pay_and_insert(
    def: &StructureDefinition,
    rect: TileRect,
    ledger: &mut dyn ResourceLedger,
    occupancy: &mut OccupancyIndex,
    tick: u64,
) -> Result<OccupancyEntry, PlacementError> {
    let cost = def.cost_for(rect);
    if !ledger.has_sufficient(&cost) || !ledger.deduct(&cost) {
        return Err(PlacementError::InsufficientResources { kind: def.kind });
    }

    occupancy.insert(def.kind, rect, tick).inspect_err(|_| {
        ledger.credit(&cost);
    })
}

/// Validate, pay, insert, post jobs. Leaves the ledger and index untouched
/// on failure.
fn place(
    def: &StructureDefinition,
    rect: TileRect,
    ctx: &mut PlacementContext<'_>,
) -> Result<(OccupancyEntry, Vec<ColonyEvent>), PlacementError> {
    check_candidate(def, rect, ctx.validator())?;
    let entry = pay_and_insert(def, rect, &mut *ctx.ledger, &mut *ctx.occupancy, ctx.tick)?;

    let mut events = Vec::with_capacity(def.jobs.len());
    for template in &def.jobs {
        let job = ctx
            .jobs
            .post(template.kind, entry.origin, entry.id, template.unit, ctx.tick);
        events.push(ctx.event(ColonyEventKind::JobPosted {
            job,
            kind: template.kind,
            site: entry.origin,
        }));
    }
    Ok((entry, events))
}
