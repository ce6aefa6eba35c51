// Top-level colony state.
//
// `ColonyState` owns everything one colony needs for building placement:
// the game config, the terrain map, the occupancy index, the resource
// inventory, the job board, and the placement session. The host drives it
// two ways:
//
// - `poll_frame(input)` once per rendered frame. This advances the
//   placement session (see `session.rs`) and the colony tick.
// - `apply(command)` for discrete actions: arming or cancelling a
//   placement, demolishing a structure, and worker units claiming or
//   finishing jobs.
//
// Both return `ColonyEvent`s for the renderer and HUD.
//
// ## Demolition
//
// `Demolish { tile }` removes the structure covering `tile`, frees all of
// its tiles, cancels every job posted for it, and credits
// `demolish_refund_percent` of what it cost back to the inventory (each
// amount rounded down). The cost is recomputed from the current catalog and
// the entry's footprint. Demolishing a free tile is a silent no-op.
//
// ## Save/load
//
// `ColonyState` derives `Serialize`/`Deserialize`. Two fields are
// `#[serde(skip)]` and rebuilt by `rebuild_transient_state()`: the terrain
// (repainted from `config.deposits`) and the placement session (always
// `Idle` after a load). The occupancy index's tile map is rebuilt at the
// same time. `to_json()` and `from_json()` wrap the full cycle.
//
// See also: `session.rs` for the placement state machine, `command.rs` for
// `ColonyCommand`, `event.rs` for `ColonyEvent`, `config.rs` for
// `GameConfig`.
//
// **Critical constraint: no singletons.** A `ColonyState` owns its
// collaborators and lends them to the session per poll, so any number of
// colonies can coexist.

use crate::command::ColonyCommand;
use crate::config::GameConfig;
use crate::error::PlacementError;
use crate::event::{ColonyEvent, ColonyEventKind};
use crate::job::JobBoard;
use crate::ledger::{Costs, Inventory, ResourceLedger, percent_of};
use crate::occupancy::OccupancyIndex;
use crate::session::{FrameReport, PlacementContext, PlacementSession, PointerInput};
use crate::terrain::TerrainMap;
use crate::types::{JobId, StructureKind, TileCoord, UnitKind};
use crate::validator::PlacementValidator;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// All state for one colony.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColonyState {
    /// Poll counter. Advances once per `poll_frame()`.
    pub tick: u64,

    pub config: GameConfig,

    pub occupancy: OccupancyIndex,

    pub inventory: Inventory,

    pub jobs: JobBoard,

    /// Terrain features. Painted from `config.deposits`, not serialized.
    #[serde(skip)]
    pub terrain: TerrainMap,

    /// The placement gesture in progress. Never serialized.
    #[serde(skip)]
    session: PlacementSession,
}

impl ColonyState {
    /// A fresh colony: terrain painted, nothing placed, starting inventory.
    pub fn new(config: GameConfig) -> Self {
        let terrain = config.build_terrain();
        let inventory = Inventory::from_amounts(config.starting_resources.clone());
        let session = PlacementSession::new(config.settle_polls);
        Self {
            tick: 0,
            config,
            occupancy: OccupancyIndex::new(),
            inventory,
            jobs: JobBoard::new(),
            terrain,
            session,
        }
    }

    pub fn session(&self) -> &PlacementSession {
        &self.session
    }

    /// A validator over the current terrain and occupancy.
    pub fn validator(&self) -> PlacementValidator<'_> {
        PlacementValidator::new(&self.terrain, &self.occupancy)
    }

    pub fn begin_placement(&mut self, kind: StructureKind) -> Result<ColonyEvent, PlacementError> {
        self.session
            .begin_placement(kind, &self.config.structures, self.tick)
    }

    /// Drop the current placement. `None` if nothing was armed.
    pub fn cancel_placement(&mut self) -> Option<ColonyEvent> {
        match self.session.cancel_placement(self.tick) {
            Ok(event) => Some(event),
            Err(err) => {
                debug!("cancel ignored: {err}");
                None
            }
        }
    }

    /// Advance one frame with the pointer's current state.
    pub fn poll_frame(&mut self, input: PointerInput) -> FrameReport {
        self.tick += 1;
        let mut ctx = PlacementContext {
            grid: self.config.grid(),
            catalog: &self.config.structures,
            terrain: &self.terrain,
            occupancy: &mut self.occupancy,
            ledger: &mut self.inventory,
            jobs: &mut self.jobs,
            tick: self.tick,
        };
        self.session.poll_frame(input, &mut ctx)
    }

    /// Apply one command and return the events it produced.
    pub fn apply(&mut self, command: &ColonyCommand) -> Vec<ColonyEvent> {
        let mut events = Vec::new();
        match command {
            ColonyCommand::BeginPlacement { kind } => match self.begin_placement(*kind) {
                Ok(event) => events.push(event),
                Err(reason) => events.push(self.event(ColonyEventKind::PlacementRejected {
                    kind: *kind,
                    reason,
                })),
            },
            ColonyCommand::CancelPlacement => events.extend(self.cancel_placement()),
            ColonyCommand::Demolish { tile } => self.demolish(*tile, &mut events),
            ColonyCommand::ClaimJob { unit } => self.claim_job(*unit, &mut events),
            ColonyCommand::CompleteJob { job } => self.complete_job(*job, &mut events),
        }
        events
    }

    fn event(&self, kind: ColonyEventKind) -> ColonyEvent {
        ColonyEvent {
            tick: self.tick,
            kind,
        }
    }

    /// What demolishing the entry at `tile` would return.
    pub fn refund_for(&self, tile: TileCoord) -> Option<Costs> {
        let entry = self.occupancy.query(tile)?;
        let def = self.config.definition(entry.kind)?;
        let cost = def.cost_for(entry.rect());
        Some(percent_of(&cost, self.config.demolish_refund_percent))
    }

    fn demolish(&mut self, tile: TileCoord, events: &mut Vec<ColonyEvent>) {
        let refund = self.refund_for(tile).unwrap_or_default();
        let Some(entry) = self.occupancy.remove(tile) else {
            debug!("demolish at {tile}: nothing there");
            return;
        };
        self.inventory.credit(&refund);
        info!("demolished {} {} at {}", entry.kind, entry.id, entry.origin);
        events.push(self.event(ColonyEventKind::StructureRemoved {
            entry: entry.id,
            kind: entry.kind,
            origin: entry.origin,
            footprint: entry.footprint,
            refund,
        }));

        let cancelled = self.jobs.cancel_for_entry(entry.id);
        if !cancelled.is_empty() {
            events.push(self.event(ColonyEventKind::JobsCancelled {
                entry: entry.id,
                jobs: cancelled,
            }));
        }
    }

    fn claim_job(&mut self, unit: UnitKind, events: &mut Vec<ColonyEvent>) {
        let Some(job) = self.jobs.claim_next(unit).map(|j| j.id) else {
            debug!("no job available for {unit:?}");
            return;
        };
        events.push(self.event(ColonyEventKind::JobClaimed { job, unit }));
    }

    fn complete_job(&mut self, job: JobId, events: &mut Vec<ColonyEvent>) {
        match self.jobs.complete(job) {
            Ok(_) => events.push(self.event(ColonyEventKind::JobCompleted { job })),
            Err(err) => debug!("complete ignored: {err}"),
        }
    }

    /// Rebuild all transient (`#[serde(skip)]`) state after deserialization.
    pub fn rebuild_transient_state(&mut self) {
        self.terrain = self.config.build_terrain();
        self.occupancy.rebuild_tile_map();
        self.session = PlacementSession::new(self.config.settle_polls);
    }

    /// Serialize the colony to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a colony from JSON and rebuild its transient state.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut state: ColonyState = serde_json::from_str(json)?;
        state.rebuild_transient_state();
        Ok(state)
    }
}
