// colony_sim: engine-independent building placement core.
//
// This crate contains the placement logic for the colony game: the tile
// grid, terrain features, the occupancy index of placed structures, the
// placement validator, the poll-driven placement session, the resource
// ledger, and the job board that worker units pull from. It has zero engine
// dependencies and can be tested and benchmarked headless. The host engine
// feeds pointer input once per frame and renders whatever the returned
// `FrameReport` and `ColonyEvent`s describe.
//
// Module overview:
// - `colony.rs`:     Top-level ColonyState, command application, save/load.
// - `session.rs`:    PlacementSession: the per-frame placement state machine.
// - `validator.rs`:  PlacementValidator: bounds, occupancy, terrain, exclusion zones.
// - `occupancy.rs`:  OccupancyIndex: which structure owns which tile.
// - `grid.rs`:       GridMapper (world pixels <-> tiles) and TileRect.
// - `terrain.rs`:    Dense per-tile terrain feature grid; defines map bounds.
// - `structure.rs`:  StructureDefinition records and the catalog type.
// - `ledger.rs`:     ResourceLedger trait + Inventory.
// - `job.rs`:        Job board for robots, drones and starships.
// - `command.rs`:    ColonyCommand: discrete mutations outside the poll loop.
// - `event.rs`:      ColonyEvent: everything the renderer / HUD reacts to.
// - `config.rs`:     GameConfig: tile size, map size, catalog, deposits.
// - `error.rs`:      PlacementError / JobError.
// - `types.rs`:      TileCoord, Footprint, IDs, and the shared enums.
//
// **Critical constraint: no singletons.** Every collaborator (occupancy
// index, ledger, catalog, terrain) is passed in by reference. Several
// `ColonyState`s can live side by side in one process.

pub mod colony;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod job;
pub mod ledger;
pub mod occupancy;
pub mod session;
pub mod structure;
pub mod terrain;
pub mod types;
pub mod validator;
